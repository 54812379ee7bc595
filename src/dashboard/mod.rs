//! Dashboard collaborator contract - load-once context, KPIs, filters, scoring

mod context;

pub use context::*;
