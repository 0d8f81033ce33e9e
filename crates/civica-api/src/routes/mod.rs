pub mod analytics;
pub mod politicians;
pub mod polls;
