use postflow_harness::consumer::{self, ReceiveLog};
use postflow_harness::{config, producer, stats};
use postflow_queue::client;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("cannot open/read the config file at path {1}")]
    OpenFile(#[source] std::io::Error, PathBuf),
    #[error("cannot parse config file")]
    ParseConfig(#[source] serde_json::Error),
    #[error("cannot connect to the queue backend")]
    Queue(#[source] postflow_queue::Error),
    #[error("cannot seed the queue")]
    Produce(#[source] producer::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().init();

    let config_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "harness.json".to_string()),
    );
    let raw = std::fs::read_to_string(&config_path)
        .map_err(|e| Error::OpenFile(e, config_path.clone()))?;
    let config: config::Config = serde_json::from_str(&raw).map_err(Error::ParseConfig)?;

    let queue = client::Builder::new(config.redis_url.clone())
        .build()
        .await
        .map_err(Error::Queue)?;

    let received: ReceiveLog = Default::default();
    let (receipt_tx, mut receipt_rx) = mpsc::unbounded_channel();

    let listen_addr = config.listen_addr.clone();
    let receive_log = Arc::clone(&received);
    tokio::spawn(async move {
        if let Err(err) = consumer::serve(&listen_addr, receive_log, receipt_tx).await {
            error!(error = %err, "consumer stopped");
        }
    });

    let sent = producer::produce(
        &queue,
        &config.arrival_list,
        &config.listen_addr,
        config.request_count,
        config.data_count,
    )
    .await
    .map_err(Error::Produce)?;
    info!(
        "producer: just sent {} tasks with {} data records each",
        config.request_count, config.data_count,
    );

    let expected = config.request_count * config.data_count;
    for _ in 0..expected {
        if receipt_rx.recv().await.is_none() {
            break;
        }
    }

    let received = received.lock().await;
    match stats::average_latency(&sent, &received) {
        Some(average) => info!(
            "consumer: just received {} deliveries taking on average {:?}",
            received.len(),
            average,
        ),
        None => error!("consumer: no deliveries arrived"),
    }

    Ok(())
}
