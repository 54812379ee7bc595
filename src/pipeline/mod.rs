//! Pipeline module - cleaning, feature engineering, training and scoring

pub mod cleaner;
pub mod columns;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod features;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod scoring;
pub mod split;
pub mod training;

pub use cleaner::*;
pub use dataset::*;
pub use encoding::*;
pub use error::PipelineError;
pub use features::*;
pub use loader::*;
pub use metrics::*;
pub use model::*;
pub use scoring::*;
pub use split::*;
pub use training::*;
