use chrono::{DateTime, Utc};
use postflow_core::task::Task;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot decode data record payload")]
    Decode(#[source] serde_json::Error),
    #[error("delivery request failed")]
    Delivery(#[source] reqwest::Error),
    #[error("method can't be used for an HTTP request: {0}")]
    Method(String),
}

/// The observable outcome of one successful delivery.
#[derive(Debug, Clone)]
pub struct DeliveryRecord {
    pub url: String,
    pub delivered_at: DateTime<Utc>,
    pub status: u16,
    pub body: String,
}

/// Delivers one data record: decodes the payload, fills the task's url
/// pattern, and executes the request with the task's method, no body, and
/// default transport settings. Nothing is retried; any failure stops this
/// record only.
pub async fn deliver(
    client: &reqwest::Client,
    task: &Task,
    payload: &str,
) -> Result<DeliveryRecord, Error> {
    let values: HashMap<String, String> =
        serde_json::from_str(payload).map_err(Error::Decode)?;

    let url = task.fill(&values);
    let method = reqwest::Method::from_bytes(task.method.as_bytes())
        .map_err(|_| Error::Method(task.method.clone()))?;

    let response = client
        .request(method, url.as_str())
        .send()
        .await
        .map_err(Error::Delivery)?;

    let status = response.status().as_u16();
    let body = response.text().await.map_err(Error::Delivery)?;

    Ok(DeliveryRecord {
        url,
        delivered_at: Utc::now(),
        status,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::Router;
    use std::collections::HashMap;

    fn task(method: &str, url: &str) -> Task {
        let mut task = Task {
            method: method.to_string(),
            url: url.to_string(),
            count: 1,
            params: Default::default(),
        };
        task.parse(&HashMap::new()).unwrap();
        task
    }

    async fn echo_server() -> std::net::SocketAddr {
        let app = Router::new().route(
            "/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                format!("a={}", params.get("a").cloned().unwrap_or_default())
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn deliver_fills_escapes_and_reports_the_outcome() {
        let addr = echo_server().await;
        let task = task("GET", &format!("http://{}/?a={{a}}", addr));
        let client = reqwest::Client::new();

        let record = deliver(&client, &task, r#"{"a":"1 2"}"#).await.unwrap();
        assert_eq!(record.url, format!("http://{}/?a=1+2", addr));
        assert_eq!(record.status, 200);
        assert_eq!(record.body, "a=1 2");
    }

    #[tokio::test]
    async fn deliver_falls_back_to_defaults_for_missing_values() {
        let addr = echo_server().await;
        let task = task("GET", &format!("http://{}/?a={{a}}", addr));
        let client = reqwest::Client::new();

        let record = deliver(&client, &task, "{}").await.unwrap();
        assert_eq!(record.url, format!("http://{}/?a=", addr));
        assert_eq!(record.status, 200);
    }

    #[tokio::test]
    async fn deliver_stops_on_malformed_records_without_a_request() {
        let task = task("GET", "http://127.0.0.1:1/unroutable");
        let client = reqwest::Client::new();

        assert!(matches!(
            deliver(&client, &task, "not json").await,
            Err(Error::Decode(_))
        ));
    }

    #[tokio::test]
    async fn deliver_reports_transport_failures() {
        // Port 1 refuses connections, so the request itself fails.
        let task = task("GET", "http://127.0.0.1:1/unroutable");
        let client = reqwest::Client::new();

        assert!(matches!(
            deliver(&client, &task, "{}").await,
            Err(Error::Delivery(_))
        ));
    }
}
