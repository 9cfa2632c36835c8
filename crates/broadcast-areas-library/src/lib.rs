//! Broadcast Areas Library - Reference area datasets and selection summaries
//!
//! Loads administrative boundaries described by a `libraries.toml` manifest,
//! resolves area identifiers, and summarises selections into the named
//! regions they cover.

pub mod aggregate;
pub mod area;
pub mod formats;
pub mod library;
pub mod manifest;

pub use aggregate::{aggregate_areas, summarised_area_names};
pub use area::{BroadcastArea, CustomBroadcastArea, ReferenceArea, SharedArea};
pub use library::{AreaLibraries, AreaLibrary};
pub use manifest::{DatasetDefinition, LibraryDefinition, LibraryManifest};
