use async_trait::async_trait;

pub mod client;
pub mod memory;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("queue backend connection/protocol failure")]
    Backend(#[source] redis::RedisError),
    #[error("no value stored under key: {0}")]
    MissingKey(String),
    #[error("queue is closed")]
    Closed(),
}

/// A blocking list-style queue. Any backend with atomic per-key pop, get,
/// and delete operations satisfies the delivery agent's needs; the producer
/// side additionally pushes list entries and sets keys.
#[async_trait]
pub trait Queue: Send + Sync {
    /// Pops the head of `list`, blocking indefinitely until a value
    /// arrives.
    async fn pop_front(&self, list: &str) -> Result<String, Error>;

    /// Fetches the value stored under `key`. A missing key is an error.
    async fn get(&self, key: &str) -> Result<Vec<u8>, Error>;

    /// Deletes `key`. Paired with [`Queue::get`] this gives a consumer
    /// exclusive ownership of the key's payload.
    async fn delete(&self, key: &str) -> Result<(), Error>;

    /// Appends `value` to the tail of `list`.
    async fn push_back(&self, list: &str, value: &str) -> Result<(), Error>;

    /// Stores `value` under `key`.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error>;
}
