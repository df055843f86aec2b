// ── Core error types ──
//
// Errors crossing the plugin boundary. Controller-level failures are
// joined into `Joined` so a partial poll still carries every failure
// detail to the log line.

use thiserror::Error;

/// Unified error type for the plugin runtime.
#[derive(Debug, Error)]
pub enum PollerError {
    // ── Startup ──────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("no config file found among: {0}")]
    NoConfigFile(String),

    #[error("no input plugins registered")]
    NoInputPlugins,

    #[error("no output plugins registered")]
    NoOutputPlugins,

    // ── Collection ───────────────────────────────────────────────────
    #[error("Controller error: {0}")]
    Controller(#[from] unipoll_api::Error),

    #[error("input {input}: {message}")]
    Input { input: String, message: String },

    /// Several collectors failed; every message is preserved.
    #[error("{}", .0.join(", "))]
    Joined(Vec<String>),

    // ── Emission ─────────────────────────────────────────────────────
    #[error("Sink error: {0}")]
    Sink(String),

    // ── Lifecycle ────────────────────────────────────────────────────
    /// Every output returned cleanly; nothing left to supervise.
    #[error("all output plugins have stopped, or none enabled")]
    AllStopped,

    #[error("{0}")]
    Internal(String),
}

impl PollerError {
    /// Join error messages into one error, or `None` when the list is empty.
    pub fn join(errs: Vec<String>) -> Option<Self> {
        if errs.is_empty() {
            None
        } else {
            Some(Self::Joined(errs))
        }
    }
}
