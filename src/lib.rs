//! churnlens: Customer Churn Pipeline Library
//!
//! Cleans raw customer tables, engineers churn features, trains a logistic
//! regression classifier and scores individual customers against it.

pub mod cli;
pub mod dashboard;
pub mod pipeline;
pub mod report;
pub mod utils;
