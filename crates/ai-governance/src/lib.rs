pub mod config;
pub mod error;
pub mod governance;
pub mod telemetry;
