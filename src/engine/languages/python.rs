//! Python language runner
//!
//! The source is passed inline (`-c`) to an unbuffered interpreter; there is
//! no compile step and no isolation scope.

use async_trait::async_trait;

use super::{LanguageRunner, RunContext, run_result};
use crate::constants::{messages, toolchains};
use crate::engine::process::{self, CommandSpec, SpawnError};
use crate::engine::toolchain;
use crate::error::{ExecError, ExecResult};
use crate::models::{ExecutionResult, Language};

#[derive(Debug, Clone, Copy)]
pub struct PythonRunner {
    interpreter: &'static [&'static str],
}

impl PythonRunner {
    /// Runner that looks for the interpreter among `interpreter`, in order
    pub fn with_candidates(interpreter: &'static [&'static str]) -> Self {
        Self { interpreter }
    }
}

impl Default for PythonRunner {
    fn default() -> Self {
        Self::with_candidates(toolchains::PYTHON)
    }
}

#[async_trait]
impl LanguageRunner for PythonRunner {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn run(&self, code: &str, input: &str, ctx: &RunContext) -> ExecResult<ExecutionResult> {
        let interpreter = toolchain::resolve(self.interpreter)
            .ok_or(ExecError::ToolMissing(messages::PYTHON_NOT_FOUND))?;

        let spec = CommandSpec::new(interpreter).arg("-u").arg("-c").arg(code);
        let outcome = process::run_with_timeout(
            &spec,
            input,
            ctx.limits.run_timeout,
            ctx.limits.max_output_bytes,
        )
        .await
        .map_err(|e| match e {
            SpawnError::NotFound(_) => ExecError::ToolMissing(messages::PYTHON_NOT_FOUND),
            e => ExecError::Execution(format!("Python Execution Error: {}", e)),
        })?;

        Ok(run_result(outcome))
    }
}
