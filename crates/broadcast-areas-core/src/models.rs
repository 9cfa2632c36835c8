pub mod area;
pub mod geometry;
pub mod message;

pub use area::AreaKind;
pub use geometry::{AxisOrder, CoordinatePair, Ring};
pub use message::{
    BroadcastAreaSelection, BroadcastMessageRecord, BroadcastMessageUpdate, BroadcastStatus,
};
