//! Process-wide runtime concerns shared by every binary in the workspace:
//! layered configuration, logging bootstrap and shutdown signalling.

pub mod config;
pub mod home_dir;
pub mod logging;
pub mod shutdown;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig};
pub use shutdown::wait_for_shutdown;
