// Library exports for testing
pub mod classify;
pub mod error;
pub mod export;
pub mod logging;
pub mod stats;
pub mod stats_builder;
pub mod timefmt;
