//! Error taxonomy
//!
//! Every failure in a run maps to one of four kinds, each with its own
//! process exit code so callers (scripts, CI) can tell a bad invocation
//! apart from a cloud-side failure.

use thiserror::Error;

/// Exit code for configuration/usage errors (same code clap uses).
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for authentication failures.
pub const EXIT_AUTH: i32 = 3;
/// Exit code for management API failures.
pub const EXIT_API: i32 = 4;
/// Exit code for selection failures (no candidate VM).
pub const EXIT_SELECTION: i32 = 5;

/// Fatal error aborting the run. No variant is retried.
#[derive(Debug, Error)]
pub enum ChaosError {
    /// Invalid or contradictory input, detected before any network call.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The identity endpoint rejected the credentials or was unreachable.
    #[error("authentication failed: {source:#}")]
    Auth {
        #[source]
        source: anyhow::Error,
    },

    /// A management API call (listing or power operation) failed.
    #[error("management API call failed: {source:#}")]
    Api {
        #[source]
        source: anyhow::Error,
    },

    /// No virtual machine was available or matched the filter.
    #[error("resource selection failed: {0}")]
    Selection(String),
}

impl ChaosError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(source: anyhow::Error) -> Self {
        Self::Auth { source }
    }

    pub fn api(source: anyhow::Error) -> Self {
        Self::Api { source }
    }

    pub fn selection(msg: impl Into<String>) -> Self {
        Self::Selection(msg.into())
    }

    /// Process exit code for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::Auth { .. } => EXIT_AUTH,
            Self::Api { .. } => EXIT_API,
            Self::Selection(_) => EXIT_SELECTION,
        }
    }
}

pub type Result<T, E = ChaosError> = std::result::Result<T, E>;
