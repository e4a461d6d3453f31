use crate::{Error, Queue};
use async_trait::async_trait;
use redis::AsyncCommands;

/// Redis-backed [`Queue`]. All operations run over one multiplexed
/// connection, which is cheap to clone per command; BLPOP uses a zero
/// timeout so pops block until the server has a value.
#[derive(Clone)]
pub struct RedisQueue {
    connection: redis::aio::MultiplexedConnection,
}

/// A builder of the Redis queue client.
pub struct Builder {
    url: String,
}

impl Builder {
    /// Creates a new instance of a Builder.
    pub fn new(url: impl Into<String>) -> Builder {
        Builder { url: url.into() }
    }

    pub async fn build(self) -> Result<RedisQueue, Error> {
        let client = redis::Client::open(self.url.as_str()).map_err(Error::Backend)?;
        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(Error::Backend)?;
        Ok(RedisQueue { connection })
    }
}

#[async_trait]
impl Queue for RedisQueue {
    async fn pop_front(&self, list: &str) -> Result<String, Error> {
        let mut connection = self.connection.clone();
        let (_, value): (String, String) = connection
            .blpop(list, 0.0)
            .await
            .map_err(Error::Backend)?;
        Ok(value)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let mut connection = self.connection.clone();
        let value: Option<Vec<u8>> = connection.get(key).await.map_err(Error::Backend)?;
        value.ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        let _: () = connection.del(key).await.map_err(Error::Backend)?;
        Ok(())
    }

    async fn push_back(&self, list: &str, value: &str) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        let _: () = connection.rpush(list, value).await.map_err(Error::Backend)?;
        Ok(())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        let mut connection = self.connection.clone();
        let _: () = connection.set(key, value).await.map_err(Error::Backend)?;
        Ok(())
    }
}
