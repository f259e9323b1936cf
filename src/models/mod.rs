//! Domain models
//!
//! This module contains the request, result and language types shared by
//! the dispatcher and every runner.

pub mod execution;
pub mod language;

pub use execution::*;
pub use language::*;
