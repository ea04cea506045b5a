use crate::models::TransferRecord;

/// In-memory transfer history: the last synced window plus provisional
/// records for transfers this session submitted that no sync has seen yet.
/// Nothing here survives a restart.
#[derive(Debug, Default)]
pub struct History {
    synced: Vec<TransferRecord>,
    provisional: Vec<TransferRecord>,
}

impl History {
    /// Record a locally-submitted transfer ahead of the next sync.
    pub fn append_provisional(&mut self, record: TransferRecord) {
        self.provisional.insert(0, record);
    }

    /// Replace the synced window. A provisional record is superseded (and
    /// dropped) once the synced window reports the same transaction hash,
    /// so the two paths never produce duplicate rows.
    pub fn apply_sync(&mut self, records: Vec<TransferRecord>) {
        self.provisional.retain(|provisional| {
            !records
                .iter()
                .any(|r| r.tx_hash.eq_ignore_ascii_case(&provisional.tx_hash))
        });
        self.synced = records;
    }

    /// Newest-first view: provisional records sit above the synced window
    /// since they are at or beyond its tip.
    pub fn snapshot(&self) -> Vec<TransferRecord> {
        let mut out = self.provisional.clone();
        out.extend(self.synced.iter().cloned());
        out
    }
}
