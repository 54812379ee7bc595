//! Report generation - summary tables and JSON exports

mod dashboard;
mod metrics_export;
mod summary;

pub use dashboard::*;
pub use metrics_export::*;
pub use summary::*;
