//! Configuration and logging setup for the `octofhir-book` command.

pub mod config;
pub mod observability;

pub use config::loader::{load_config, load_config_with_overrides};
pub use config::{BookingConfig, ConfigOverrides};
pub use observability::init_tracing_with_level;
