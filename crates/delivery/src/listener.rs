use crate::worker::{self, DeliveryRecord};
use postflow_core::task::Task;
use postflow_queue::Queue;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Terminal state of a data listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenStatus {
    /// Every promised data record was popped and handed to a worker.
    Done,
    /// A queue error stopped the listener early; records not yet received
    /// are never delivered.
    Aborted,
}

/// Listens on one task's data list, spawning a delivery worker per record.
pub struct DataListener {
    queue: Arc<dyn Queue>,
    task: Arc<Task>,
    client: reqwest::Client,
    limit: Option<Arc<Semaphore>>,
}

impl DataListener {
    /// Creates a listener for `task`. `max_in_flight` caps concurrently
    /// running workers for this task; `None` leaves the fan-out unbounded.
    pub fn new(
        queue: Arc<dyn Queue>,
        task: Arc<Task>,
        client: reqwest::Client,
        max_in_flight: Option<usize>,
    ) -> DataListener {
        DataListener {
            queue,
            task,
            client,
            limit: max_in_flight.map(|permits| Arc::new(Semaphore::new(permits))),
        }
    }

    /// Pops up to `task.count` records from `list`. Each pop spawns one
    /// worker without waiting for it, so deliveries overlap. Returns the
    /// terminal status plus the handles of every worker spawned; a worker
    /// failure never affects its siblings.
    pub async fn listen(
        &self,
        list: &str,
    ) -> (
        ListenStatus,
        Vec<JoinHandle<Result<DeliveryRecord, worker::Error>>>,
    ) {
        let mut handle_list = Vec::with_capacity(self.task.count as usize);

        for _ in 0..self.task.count {
            let payload = match self.queue.pop_front(list).await {
                Ok(payload) => payload,
                Err(err) => {
                    warn!(
                        error = %err,
                        list,
                        spawned = handle_list.len(),
                        "queue failed while waiting for data, dropping this task's remaining records",
                    );
                    return (ListenStatus::Aborted, handle_list);
                }
            };

            let task = Arc::clone(&self.task);
            let client = self.client.clone();
            let limit = self.limit.clone();

            let handle = tokio::spawn(async move {
                // The permit is taken inside the worker so the listener
                // keeps popping while deliveries wait for capacity.
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                match worker::deliver(&client, &task, &payload).await {
                    Ok(record) => {
                        info!(
                            url = %record.url,
                            delivered = %record.delivered_at,
                            status = record.status,
                            body = %record.body,
                            "delivered",
                        );
                        Ok(record)
                    }
                    Err(err) => {
                        warn!(error = %err, "delivery failed");
                        Err(err)
                    }
                }
            });
            handle_list.push(handle);
        }

        (ListenStatus::Done, handle_list)
    }
}
