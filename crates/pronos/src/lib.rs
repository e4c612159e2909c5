pub mod config;
pub mod contest;
pub mod error;
pub mod import;
pub mod telemetry;
