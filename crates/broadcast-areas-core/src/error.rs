//! Error types for broadcast areas

use std::path::PathBuf;
use thiserror::Error;

use crate::models::BroadcastStatus;

#[derive(Debug, Error)]
pub enum BroadcastAreasError {
    // Geometry construction errors
    #[error("Invalid geometry at {location}: {reason}")]
    InvalidGeometry { location: String, reason: String },

    // Reference data errors
    #[error("Duplicate area identifier: {id}")]
    DuplicateAreaId { id: String },

    #[error("Feature {feature} has none of the name properties {candidates:?}")]
    MissingAreaName { feature: String, candidates: Vec<String> },

    #[error("Feature {feature} has no identifier (tried {candidates:?} and the feature id)")]
    MissingAreaId { feature: String, candidates: Vec<String> },

    #[error("Area {id} refers to unknown parent {parent}")]
    UnknownParentArea { id: String, parent: String },

    #[error("Area {id} is its own ancestor")]
    ParentCycle { id: String },

    #[error("Unsupported geometry for feature {feature}: expected Polygon or MultiPolygon, found {found}")]
    UnsupportedGeometry { feature: String, found: String },

    #[error("Area library not found: {id}")]
    LibraryNotFound { id: String },

    #[error("Reference data not found at {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Invalid {format} data: {reason}")]
    Format { format: String, reason: String },

    // Request errors
    #[error("Requested {requested} areas but found {found}")]
    AreaCountMismatch { requested: usize, found: usize },

    // Broadcast lifecycle errors
    #[error("Cannot move broadcast from {from} to {to}")]
    InvalidStatusTransition { from: BroadcastStatus, to: BroadcastStatus },

    #[error("Broadcast message update failed: {reason}")]
    MessageUpdate { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BroadcastAreasError>;
