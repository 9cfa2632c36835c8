//! Broadcast Areas Message - The broadcast message facade
//!
//! Wraps one persisted broadcast message and derives its broadcast-ready shape,
//! phone estimates and lifecycle status from the area libraries.

pub mod memory;
pub mod message;
pub mod rounding;

pub use memory::{InMemoryMessageApi, RecordedUpdate};
pub use message::{BroadcastMessage, BroadcastSettings};
pub use rounding::round_to_significant_figures;
