pub mod maturity;
pub mod models;
pub mod scorer;
pub mod tracker;
pub mod usage;

pub use maturity::compute_maturity_report;
pub use models::compare_models;
pub use tracker::IncrementalRateTracker;
pub use usage::compute_recommendations;
