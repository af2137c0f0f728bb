//! Error types for move selection
//!
//! Selection failures are ordinary values: callers decide how to degrade
//! (the HTTP service falls back to a random legal move).

use thiserror::Error;

/// Errors returned by a [`crate::MoveSelector`]
#[derive(Error, Debug)]
pub enum SelectError {
    /// Position has no legal moves to choose from
    #[error("no legal moves in position")]
    NoLegalMoves,

    /// Evaluator failed while scoring a position
    #[error("evaluator failed: {0}")]
    Evaluator(#[from] EvaluatorError),

    /// Search finished without visiting any root move
    #[error("search produced no move after {searches} searches")]
    EmptySearch { searches: u32 },
}

/// Errors raised by an [`crate::Evaluator`]
#[derive(Error, Debug)]
pub enum EvaluatorError {
    /// Policy length does not match the number of legal moves
    #[error("policy has {got} entries for {expected} legal moves")]
    PolicyShape { expected: usize, got: usize },

    /// Evaluation produced NaN or infinity
    #[error("non-finite evaluation output")]
    NonFinite,
}

/// Errors that can occur while loading evaluator weights
#[derive(Error, Debug)]
pub enum WeightsError {
    /// Weights file could not be read
    #[error("failed to read weights: {0}")]
    Io(#[from] std::io::Error),

    /// Weights file is not valid JSON for [`crate::EvaluatorWeights`]
    #[error("failed to parse weights: {0}")]
    Parse(#[from] serde_json::Error),

    /// A weight is out of its accepted range
    #[error("invalid weight `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for move selection
pub type SelectResult<T> = Result<T, SelectError>;
