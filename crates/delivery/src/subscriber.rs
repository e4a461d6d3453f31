use crate::listener::{DataListener, ListenStatus};
use crate::{config, loader};
use futures_util::future::TryJoinAll;
use postflow_queue::Queue;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("queue handle is missing / not initialized properly")]
    MissingQueue(),
}

/// The outer queue listener: blocks on the task-arrival list forever and
/// spawns one processing unit per arriving task key. Every task-level
/// failure is logged and the loop keeps consuming; nothing here is fatal.
pub struct Subscriber {
    queue: Arc<dyn Queue>,
    arrival_list: String,
    max_in_flight: Option<usize>,
    client: reqwest::Client,
}

impl Subscriber {
    pub async fn run(self) {
        info!(list = %self.arrival_list, "watching queue for task arrivals");

        loop {
            let key = match self.queue.pop_front(&self.arrival_list).await {
                Ok(key) => key,
                Err(err) => {
                    error!(error = %err, "queue failed while waiting for tasks");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            // Each key was popped exactly once, so this unit owns the task.
            let queue = Arc::clone(&self.queue);
            let client = self.client.clone();
            let max_in_flight = self.max_in_flight;
            tokio::spawn(async move {
                if let Err(err) = process(queue, client, &key, max_in_flight).await {
                    error!(error = %err, key = %key, "task aborted");
                }
            });
        }
    }
}

/// Processes one task end to end: load, listen, fan out deliveries.
async fn process(
    queue: Arc<dyn Queue>,
    client: reqwest::Client,
    key: &str,
    max_in_flight: Option<usize>,
) -> Result<(), loader::Error> {
    let task = loader::load(queue.as_ref(), key).await?;
    info!(key = %key, method = %task.method, count = task.count, "task accepted");

    let data_list = format!("{}:data", key);
    let data_listener = DataListener::new(queue, Arc::new(task), client, max_in_flight);
    let (status, handle_list) = data_listener.listen(&data_list).await;

    match status {
        ListenStatus::Done => info!(key = %key, "all data records handed to workers"),
        ListenStatus::Aborted => error!(key = %key, "task stopped before all data records arrived"),
    }

    // Detach the in-flight deliveries; workers log their own outcomes.
    tokio::spawn(async move {
        let _ = handle_list.into_iter().collect::<TryJoinAll<_>>().await;
    });

    Ok(())
}

/// A builder of the task subscriber.
pub struct Builder {
    config: config::Config,
    queue: Option<Arc<dyn Queue>>,
}

impl Builder {
    /// Creates a new instance of a Builder.
    pub fn new(config: config::Config) -> Builder {
        Builder {
            config,
            queue: None,
        }
    }

    pub fn queue(mut self, queue: Arc<dyn Queue>) -> Builder {
        self.queue = Some(queue);
        self
    }

    pub fn build(self) -> Result<Subscriber, Error> {
        let queue = self.queue.ok_or_else(Error::MissingQueue)?;
        Ok(Subscriber {
            queue,
            arrival_list: self.config.arrival_list,
            max_in_flight: self.config.max_in_flight,
            client: reqwest::Client::new(),
        })
    }
}
