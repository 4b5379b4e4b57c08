//! GFS texture service.
//!
//! Serves forecast fields as PNG textures with JSON statistics, building
//! them on first request and caching them on disk.

pub mod config;
pub mod fetcher;
pub mod handlers;
pub mod metrics;
pub mod registry;
pub mod state;

pub use config::Config;
pub use fetcher::{FetchedArtifact, ProductFetcher};
pub use handlers::router;
pub use registry::FetcherRegistry;
pub use state::AppState;
