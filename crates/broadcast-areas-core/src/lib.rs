//! Broadcast Areas Core - Domain records, configuration, and error types
//!
//! This crate contains the shared domain types and port definitions used by the
//! geometry, library, and broadcast message crates.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{BroadcastAreasError, Result};
