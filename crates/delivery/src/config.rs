use serde::Deserialize;

fn default_arrival_list() -> String {
    "postbacks".to_string()
}

/// Delivery agent configuration, read from a JSON config file.
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// Address of the Redis server holding task and data lists.
    pub redis_url: String,

    /// The well-known list the producer pushes task keys onto.
    #[serde(default = "default_arrival_list")]
    pub arrival_list: String,

    /// Per-task ceiling on concurrently running delivery workers. `None`
    /// keeps the historical unbounded fan-out.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}
