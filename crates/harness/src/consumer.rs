use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::info;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot bind the consumer listener to {1}")]
    Bind(#[source] std::io::Error, String),
    #[error("consumer listener failed")]
    Serve(#[source] std::io::Error),
}

/// Receive time per (req_id, data_id) pair, shared with the stats side.
pub type ReceiveLog = Arc<Mutex<HashMap<(String, String), DateTime<Utc>>>>;

#[derive(Clone)]
struct AppState {
    received: ReceiveLog,
    receipt_tx: UnboundedSender<()>,
}

async fn record(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> &'static str {
    let req_id = params.get("req_id").cloned().unwrap_or_default();
    let data_id = params.get("data_id").cloned().unwrap_or_default();

    state
        .received
        .lock()
        .await
        .insert((req_id, data_id), Utc::now());
    let _ = state.receipt_tx.send(());

    "ok"
}

/// Serves the local delivery endpoint. Every request stamps its
/// (req_id, data_id) pair into `received` and signals `receipt_tx` so the
/// caller can count down the expected deliveries.
pub async fn serve(
    listen_addr: &str,
    received: ReceiveLog,
    receipt_tx: UnboundedSender<()>,
) -> Result<(), Error> {
    let app = Router::new()
        .route("/", get(record))
        .with_state(AppState {
            received,
            receipt_tx,
        });

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .map_err(|e| Error::Bind(e, listen_addr.to_string()))?;
    info!(addr = %listen_addr, "consumer listening for deliveries");

    axum::serve(listener, app).await.map_err(Error::Serve)
}
