pub mod config;
pub mod error;
pub mod maintenance;
pub mod telemetry;
