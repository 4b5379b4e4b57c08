//! Common types shared across the GFS texture pipeline.

pub mod cache_key;
pub mod error;
pub mod grid;
pub mod params;
pub mod product;
pub mod time;

pub use cache_key::CacheKey;
pub use error::{ForecastError, ForecastResult};
pub use grid::GridField;
pub use params::{FetchParameters, ForecastQuery, Resolution};
pub use product::{ArtifactKind, Level, Product, Variable, VariableSelector};
pub use time::{ModelRun, RunSlot};
