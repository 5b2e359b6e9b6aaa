pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use crate::config::{AppConfig, LoggingConfig, ServerConfig, StorageBackend, StorageConfig};
pub use observability::{apply_logging_level, init_tracing, init_tracing_with_level};
pub use server::{PortalServer, ServerBuilder, build_app, build_store};
