use crate::{Error, Queue};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::{Mutex, Notify};

#[derive(Default)]
struct Inner {
    lists: HashMap<String, VecDeque<String>>,
    keys: HashMap<String, Vec<u8>>,
    closed: bool,
}

/// In-process [`Queue`] used by tests and local runs. Pops block on a
/// [`Notify`] until a value is pushed; [`MemoryQueue::close`] fails every
/// blocked and future pop, standing in for a backend connection loss.
#[derive(Default)]
pub struct MemoryQueue {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl MemoryQueue {
    pub fn new() -> MemoryQueue {
        MemoryQueue::default()
    }

    /// Simulates losing the backend: blocked pops wake with an error and
    /// later operations on lists fail too.
    pub async fn close(&self) {
        self.inner.lock().await.closed = true;
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl Queue for MemoryQueue {
    async fn pop_front(&self, list: &str) -> Result<String, Error> {
        loop {
            // Register for a wakeup before checking, so a push between the
            // check and the await isn't missed.
            let notified = self.notify.notified();
            {
                let mut inner = self.inner.lock().await;
                if let Some(value) = inner.lists.get_mut(list).and_then(VecDeque::pop_front) {
                    return Ok(value);
                }
                if inner.closed {
                    return Err(Error::Closed());
                }
            }
            notified.await;
        }
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let inner = self.inner.lock().await;
        inner
            .keys
            .get(key)
            .cloned()
            .ok_or_else(|| Error::MissingKey(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.inner.lock().await.keys.remove(key);
        Ok(())
    }

    async fn push_back(&self, list: &str, value: &str) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(Error::Closed());
        }
        inner
            .lists
            .entry(list.to_string())
            .or_default()
            .push_back(value.to_string());
        self.notify.notify_waiters();
        Ok(())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), Error> {
        self.inner
            .lock()
            .await
            .keys
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
