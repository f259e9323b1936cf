//! CodeJudge - Code Execution & Security Validation Engine
//!
//! This library runs untrusted contest submissions: it screens the source
//! against a denylist, compiles it when the language needs it, and runs it
//! against the supplied input under wall-clock limits.
//!
//! # Features
//!
//! - Python, C, C++, Java and JavaScript (Node.js)
//! - Per-invocation temporary workspaces, removed on every exit path
//! - Process-group kill on timeout
//! - A single result shape for every outcome; no error escapes `execute`
//!
//! # Architecture
//!
//! - **Dispatcher**: entry point and backend selection
//! - **Runners**: per-language compile/run protocols
//! - **Models**: request, result and language types

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{EngineConfig, ExecutionMode, Limits};
pub use engine::Dispatcher;
pub use error::{ExecError, ExecResult};
pub use models::{ExecutionRequest, ExecutionResult, Language, Verdict};
