pub mod config;
pub mod metrics;
pub mod models;
pub mod report;
pub mod scoring;
pub mod usage;
