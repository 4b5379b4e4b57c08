//! Grid projection for texture output.
//!
//! Implements the column wraparound and row resampling used to turn a
//! decoded global grid into a client texture.

pub mod latitude;
pub mod longitude;
pub mod projector;

pub use latitude::{LatitudeResampling, RowSample};
pub use longitude::source_column;
pub use projector::GridProjector;
