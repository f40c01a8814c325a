//! Checkout gateway: thin HTTP transport in front of the risk core

pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod session;
