pub mod config;
pub mod listener;
pub mod loader;
pub mod subscriber;
pub mod worker;
