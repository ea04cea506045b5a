use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::error::WalletError;
use crate::models::{TransferRecord, TransferRequest};
use crate::qr;
use crate::session::Session;

#[derive(Deserialize)]
struct ScanRequest {
    payload: String,
}

#[derive(Serialize)]
struct RecordResponse {
    #[serde(flatten)]
    record: TransferRecord,
    explorer_link: String,
}

impl RecordResponse {
    fn new(record: TransferRecord, session: &Session) -> Self {
        let explorer_link = record.explorer_link(session.explorer_url());
        Self {
            record,
            explorer_link,
        }
    }
}

pub async fn serve(port: u16, session: Arc<Session>) -> eyre::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(|| async { "Raaskoin wallet API running" }))
        .route("/connect", post(connect))
        .route("/balance", get(balance))
        .route("/history", get(history))
        .route("/send", post(send))
        .route("/receive", get(receive))
        .route("/scan", post(scan))
        .layer(cors)
        .with_state(session);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn connect(State(session): State<Arc<Session>>) -> Result<Json<Value>, WalletError> {
    let address = session.connect().await?;
    Ok(Json(json!({ "address": address.to_string() })))
}

async fn balance(State(session): State<Arc<Session>>) -> Result<Json<Value>, WalletError> {
    let account = session.account().ok_or(WalletError::NotConnected)?;
    let balance = session.balance().await?;
    Ok(Json(json!({
        "address": account.to_string(),
        "balance": balance.to_string()
    })))
}

async fn history(
    State(session): State<Arc<Session>>,
) -> Result<Json<Vec<RecordResponse>>, WalletError> {
    let records = session.sync_history().await?;
    let response = records
        .into_iter()
        .map(|record| RecordResponse::new(record, &session))
        .collect();
    Ok(Json(response))
}

async fn send(
    State(session): State<Arc<Session>>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<RecordResponse>, WalletError> {
    let record = session.send_payment(&request).await?;
    Ok(Json(RecordResponse::new(record, &session)))
}

// Camera decoding happens client-side; this validates the scanned text
// into a recipient address the dashboard can drop into the send form.
async fn scan(Json(request): Json<ScanRequest>) -> Result<Json<Value>, WalletError> {
    let address = qr::parse_scanned(&request.payload)?;
    Ok(Json(json!({ "address": address.to_string() })))
}

async fn receive(State(session): State<Arc<Session>>) -> Result<Json<Value>, WalletError> {
    let account = session.account().ok_or(WalletError::NotConnected)?;
    let uri = qr::payment_uri(account);
    let qr_art = qr::render_qr(&uri)?;
    Ok(Json(json!({
        "address": account.to_string(),
        "uri": uri,
        "qr": qr_art
    })))
}
