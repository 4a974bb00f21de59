pub mod chart;
pub mod errors;
pub mod invoke;
pub mod report;
pub mod stats;
pub mod types;
