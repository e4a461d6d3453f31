use serde::Deserialize;

fn default_arrival_list() -> String {
    "postbacks".to_string()
}

fn default_request_count() -> u32 {
    10
}

fn default_data_count() -> u32 {
    1
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

/// Harness configuration, read from a JSON config file.
#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    /// Address of the Redis server shared with the delivery agent.
    pub redis_url: String,

    /// The arrival list the agent under test is watching.
    #[serde(default = "default_arrival_list")]
    pub arrival_list: String,

    /// Number of tasks to seed.
    #[serde(default = "default_request_count")]
    pub request_count: u32,

    /// Number of data records per task.
    #[serde(default = "default_data_count")]
    pub data_count: u32,

    /// Address the consumer listens on for deliveries.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}
