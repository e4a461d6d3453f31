use postflow_delivery::{config::Config, subscriber};
use postflow_queue::client;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("cannot open/read the config file at path {1}")]
    OpenFile(#[source] std::io::Error, PathBuf),
    #[error("cannot parse config file")]
    ParseConfig(#[source] serde_json::Error),
    #[error("cannot connect to the queue backend")]
    Queue(#[source] postflow_queue::Error),
    #[error("cannot build the task subscriber")]
    Subscriber(#[source] subscriber::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().init();

    let config_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| "postflow.json".to_string()),
    );
    let raw = std::fs::read_to_string(&config_path)
        .map_err(|e| Error::OpenFile(e, config_path.clone()))?;
    let config: Config = serde_json::from_str(&raw).map_err(Error::ParseConfig)?;

    info!(redis = %config.redis_url, list = %config.arrival_list, "starting delivery agent");

    let queue = client::Builder::new(config.redis_url.clone())
        .build()
        .await
        .map_err(Error::Queue)?;

    let subscriber = subscriber::Builder::new(config)
        .queue(Arc::new(queue))
        .build()
        .map_err(Error::Subscriber)?;

    subscriber.run().await;

    Ok(())
}
