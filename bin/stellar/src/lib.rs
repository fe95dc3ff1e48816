//! Stellar CLI Library
//!
//! Command implementations for the `stellar` binary, exposed as a library so
//! they can be driven from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, list, schema, new)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use stellar::cmd;
//!
//! // Validate a site's content
//! cmd::check::run(Path::new("stellar.toml"), false).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use stellar_content::{BuildStats, ContentBuild, ContentBuilder};
pub use stellar_core::Config;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
