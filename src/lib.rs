//! Electronic ballot core for an association voting portal
//!
//! Three operations make up the public surface: resolve a voter identity,
//! cast a one-time secret ballot, and disclose aggregated results once a
//! quorum and a time delay have passed. The presentation layer and the
//! relational store are external collaborators; the store is reached
//! through the [`store::VoteStore`] seam.

pub mod ballot;
pub mod config;
pub mod errors;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the voting core with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "urna=info".into()),
        )
        .init();

    tracing::info!("🗳️  Voting core v{} initialized", VERSION);
    Ok(())
}
