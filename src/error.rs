//! Custom error types and handling
//!
//! Every failure the engine can report is an [`ExecError`]. Runners return
//! them, the dispatcher folds them into an [`ExecutionResult`]; the `Display`
//! text of each variant is exactly the `error` string the caller sees.

use crate::constants::messages;
use crate::models::{ExecutionResult, Verdict};

/// Engine-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    // Rejected before anything runs
    #[error("{0}")]
    SecurityViolation(String),

    #[error("Language {0} not supported")]
    UnsupportedLanguage(String),

    #[error("{0} execution not yet implemented")]
    BackendUnavailable(&'static str),

    // Toolchain errors
    #[error("{0}")]
    ToolMissing(&'static str),

    #[error("Compilation Error:\n{0}")]
    CompileError(String),

    #[error("{}", messages::COMPILE_TIME_LIMIT_EXCEEDED)]
    CompileTimeLimitExceeded,

    // Run phase errors
    #[error("{message}")]
    Runtime { output: String, message: String },

    #[error("{}", messages::TIME_LIMIT_EXCEEDED)]
    TimeLimitExceeded,

    /// Spawn-level failure that a runner reports with its own wording
    #[error("{0}")]
    Execution(String),

    // Internal errors
    #[error("{}", messages::INTERNAL_ERROR)]
    Internal(#[from] anyhow::Error),
}

impl ExecError {
    /// Build a runtime error from the captured streams of a failed run.
    ///
    /// An empty stderr falls back to the generic "Runtime Error" label.
    pub fn runtime(output: String, stderr: String) -> Self {
        let message = if stderr.is_empty() {
            messages::RUNTIME_ERROR.to_string()
        } else {
            stderr
        };
        Self::Runtime { output, message }
    }

    /// Get the verdict for this error type
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::SecurityViolation(_) => Verdict::SecurityViolation,
            Self::UnsupportedLanguage(_) => Verdict::UnsupportedLanguage,
            Self::BackendUnavailable(_) => Verdict::BackendUnavailable,
            Self::ToolMissing(_) => Verdict::ToolMissing,
            Self::CompileError(_) => Verdict::CompilationError,
            Self::CompileTimeLimitExceeded | Self::TimeLimitExceeded => {
                Verdict::TimeLimitExceeded
            }
            Self::Runtime { .. } => Verdict::RuntimeError,
            Self::Execution(_) | Self::Internal(_) => Verdict::InternalError,
        }
    }
}

impl From<ExecError> for ExecutionResult {
    fn from(err: ExecError) -> Self {
        let verdict = err.verdict();
        let error = err.to_string();
        let output = match err {
            ExecError::Runtime { output, .. } => output,
            _ => String::new(),
        };
        ExecutionResult::failure(verdict, output, error)
    }
}

/// Result type alias using ExecError
pub type ExecResult<T> = Result<T, ExecError>;
