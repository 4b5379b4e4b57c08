//! Artifact storage for the texture pipeline.
//!
//! Provides:
//! - A disk store holding encoded artifacts under their cache key
//! - An in-flight registry collapsing concurrent builds of one key

pub mod disk;
pub mod inflight;

pub use disk::{BuiltArtifact, DiskArtifactStore};
pub use inflight::{InFlightRegistry, RegistryStats};
