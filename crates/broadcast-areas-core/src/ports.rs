//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod messages;

pub use messages::BroadcastMessageApi;
