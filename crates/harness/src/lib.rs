//! Latency test harness for the delivery agent.
//!
//! An independent producer/consumer pair: the producer seeds tasks and data
//! records through the queue protocol with `req_id`/`data_id` placeholders
//! pointing back at a local HTTP listener; the consumer records when each
//! delivery lands. The difference between send and receive time per record
//! is the round-trip latency through the agent.

pub mod config;
pub mod consumer;
pub mod producer;
pub mod stats;
