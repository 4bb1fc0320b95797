//! AI tuning errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// A tuning value the selector cannot run with
    #[error("Invalid boss tuning: {0}")]
    InvalidTuning(String),
}

pub type Result<T> = std::result::Result<T, AiError>;
