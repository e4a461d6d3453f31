use chrono::{DateTime, Utc};
use postflow_queue::Queue;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to seed the queue")]
    Queue(#[from] postflow_queue::Error),
    #[error("failed to encode a payload")]
    Encode(#[source] serde_json::Error),
}

/// Send time per (req_id, data_id) pair.
pub type SendLog = HashMap<(String, String), DateTime<Utc>>;

/// Seeds the queue the way the ingestion side would: the serialized task
/// under `postback:latency-{req}`, exactly `data_count` records on the
/// task's data list, then the key on the arrival list. The data records go
/// in before the key so the agent never races an empty data list.
///
/// Every task points at the harness consumer with `req_id`/`data_id`
/// placeholders; the returned log records when each pair was enqueued.
pub async fn produce(
    queue: &dyn Queue,
    arrival_list: &str,
    listen_addr: &str,
    request_count: u32,
    data_count: u32,
) -> Result<SendLog, Error> {
    let mut sent = SendLog::new();

    for req in 0..request_count {
        let key = format!("postback:latency-{}", req);
        let task = serde_json::json!({
            "method": "GET",
            "url": format!("http://{}/?req_id={{req_id}}&data_id={{data_id}}", listen_addr),
            "count": data_count,
        });
        let raw = serde_json::to_vec(&task).map_err(Error::Encode)?;
        queue.set(&key, &raw).await?;

        for data in 0..data_count {
            let record = serde_json::json!({
                "req_id": req.to_string(),
                "data_id": data.to_string(),
            });
            queue
                .push_back(&format!("{}:data", key), &record.to_string())
                .await?;
            sent.insert((req.to_string(), data.to_string()), Utc::now());
        }

        queue.push_back(arrival_list, &key).await?;
    }

    Ok(sent)
}
