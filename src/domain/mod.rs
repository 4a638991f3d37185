//! Domain aggregates exposed by the sales service layer.

pub mod auth;
pub mod client;
pub mod types;
