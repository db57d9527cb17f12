//! Error types for the spin wheel

use thiserror::Error;

use sw_stage::SpinStage;

/// Wheel error type
///
/// Every variant is recoverable: the machine stays in the state it was in
/// before the rejected call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WheelError {
    #[error("cannot {operation} while {stage}")]
    InvalidTransition {
        operation: &'static str,
        stage: SpinStage,
    },

    #[error("no candidates to spin in {stage}")]
    EmptyCandidateList { stage: SpinStage },

    #[error("a spin is already in progress")]
    SpinInProgress,

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("category already exists: {0}")]
    DuplicateCategory(String),

    #[error("item already exists in {category}: {item}")]
    DuplicateItem { category: String, item: String },

    #[error("name must not be blank")]
    BlankName,

    #[error("item index {index} out of range for {category} ({len} items)")]
    ItemIndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },

    #[error("spin task failed: {0}")]
    SpinTask(String),

    #[error("result sink error: {0}")]
    Sink(String),
}

/// Result type alias
pub type WheelResult<T> = Result<T, WheelError>;
