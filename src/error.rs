//! Error types for Parley

use thiserror::Error;

/// Main error type for Parley
#[derive(Error, Debug)]
pub enum ParleyError {
    // Dialogue errors
    #[error("Invalid counterparty: {0}")]
    InvalidCounterparty(String),

    #[error("No dialogue for correlation id: {0}")]
    UnknownDialogue(String),

    #[error("Protocol violation: {performative} not legal in state {state}")]
    ProtocolViolation { state: String, performative: String },

    #[error("Terms already attached to dialogue: {0}")]
    TermsAlreadyAttached(String),

    // Message errors
    #[error("PROPOSE message carries no proposal values: {0}")]
    MissingProposal(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Parley operations
pub type Result<T> = std::result::Result<T, ParleyError>;
