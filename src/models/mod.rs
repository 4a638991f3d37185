//! Database models and runtime configuration of the sales service.

pub mod client;
pub mod config;
