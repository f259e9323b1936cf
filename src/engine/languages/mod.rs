//! Language-specific runners for compilation and execution

pub mod java;
pub mod javascript;
pub mod native;
pub mod python;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Limits;
use crate::engine::process::ProcessOutcome;
use crate::engine::workspace::IsolationScope;
use crate::error::{ExecError, ExecResult};
use crate::models::{ExecutionResult, Language};

pub use java::JavaRunner;
pub use javascript::JavaScriptRunner;
pub use native::NativeRunner;
pub use python::PythonRunner;

/// Per-invocation settings handed to a runner
#[derive(Debug, Clone)]
pub struct RunContext {
    pub limits: Limits,
    /// Parent directory for isolation scopes
    pub scope_root: Option<PathBuf>,
}

impl RunContext {
    /// Create a fresh isolation scope for this invocation
    pub async fn scope(&self) -> ExecResult<IsolationScope> {
        Ok(IsolationScope::create(self.scope_root.as_deref()).await?)
    }
}

/// Compile/execute protocol for one language.
///
/// `Ok` carries any complete verdict, including runtime errors and timeouts.
/// `Err` ends the invocation early (missing tools, compile errors, internal
/// faults) and is folded into a result by the dispatcher.
#[async_trait]
pub trait LanguageRunner: Send + Sync {
    fn language(&self) -> Language;

    async fn run(&self, code: &str, input: &str, ctx: &RunContext) -> ExecResult<ExecutionResult>;
}

/// Output of a successful compile phase
#[derive(Debug, Clone)]
pub struct Compiled<A> {
    /// What the run phase executes (binary path, entry class, ...)
    pub artifact: A,
    /// Compiler stderr from a successful compile
    pub warnings: Option<String>,
}

/// Runners with a separate compile phase inside an isolation scope
#[async_trait]
pub trait CompiledLanguage: LanguageRunner {
    type Artifact: Send;

    async fn compile(
        &self,
        code: &str,
        scope: &IsolationScope,
        limits: &Limits,
    ) -> ExecResult<Compiled<Self::Artifact>>;
}

/// Runners for every supported language
pub fn default_runners() -> Vec<Arc<dyn LanguageRunner>> {
    vec![
        Arc::new(PythonRunner::default()),
        Arc::new(NativeRunner::c()),
        Arc::new(NativeRunner::cpp()),
        Arc::new(JavaRunner::default()),
        Arc::new(JavaScriptRunner::default()),
    ]
}

/// Map a finished run phase onto a result.
///
/// Timeouts discard whatever was captured before the kill.
pub(crate) fn run_result(outcome: ProcessOutcome) -> ExecutionResult {
    match outcome {
        ProcessOutcome::TimedOut => ExecError::TimeLimitExceeded.into(),
        ProcessOutcome::Exited(output) if output.success => {
            ExecutionResult::accepted(output.stdout)
        }
        ProcessOutcome::Exited(output) => ExecError::runtime(output.stdout, output.stderr).into(),
    }
}

/// Map a finished compile phase onto warnings or a compile error
pub(crate) fn compile_result(outcome: ProcessOutcome) -> ExecResult<Option<String>> {
    match outcome {
        ProcessOutcome::TimedOut => Err(ExecError::CompileTimeLimitExceeded),
        ProcessOutcome::Exited(output) if output.success => {
            Ok(Some(output.stderr).filter(|w| !w.trim().is_empty()))
        }
        ProcessOutcome::Exited(output) => Err(ExecError::CompileError(output.stderr)),
    }
}

/// Context with default limits and scopes under `root`
#[cfg(test)]
pub(crate) fn test_context(root: &std::path::Path) -> RunContext {
    RunContext {
        limits: Limits::default(),
        scope_root: Some(root.to_path_buf()),
    }
}
