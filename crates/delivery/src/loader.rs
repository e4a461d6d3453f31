use postflow_core::task::{self, Task};
use postflow_queue::Queue;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to fetch or delete the task key")]
    Queue(#[source] postflow_queue::Error),
    #[error("failed to decode, validate, or parse the task")]
    Task(#[from] task::Error),
}

/// Fetches the serialized task stored under `key`, deletes the key, then
/// decodes, validates, and parses it.
///
/// The delete happens before decoding so no other consumer can pick up the
/// same task; exclusivity rests on the backend's per-key atomicity.
pub async fn load(queue: &dyn Queue, key: &str) -> Result<Task, Error> {
    let raw = queue.get(key).await.map_err(Error::Queue)?;
    queue.delete(key).await.map_err(Error::Queue)?;

    let mut task = Task::decode(&raw)?;
    task.validate()?;
    task.parse(&HashMap::new())?;

    Ok(task)
}
