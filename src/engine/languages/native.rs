//! C and C++ language runner
//!
//! Two phases inside one isolation scope: compile `main.c`/`main.cpp` into
//! `main`, then run the binary. Compiler warnings from a successful compile
//! are attached to the run result.

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;

use super::{Compiled, CompiledLanguage, LanguageRunner, RunContext, compile_result, run_result};
use crate::config::Limits;
use crate::constants::{messages, toolchains};
use crate::engine::process::{self, CommandSpec, ProcessOutcome};
use crate::engine::toolchain;
use crate::engine::workspace::IsolationScope;
use crate::error::{ExecError, ExecResult};
use crate::models::{ExecutionResult, Language};

/// Name of the produced executable inside the scope
const BINARY_NAME: &str = "main";

/// Compile-then-run runner for gcc/g++
#[derive(Debug, Clone)]
pub struct NativeRunner {
    language: Language,
    compiler: &'static [&'static str],
    source_file: &'static str,
}

impl NativeRunner {
    pub fn c() -> Self {
        Self {
            language: Language::C,
            compiler: toolchains::GCC,
            source_file: "main.c",
        }
    }

    pub fn cpp() -> Self {
        Self {
            language: Language::Cpp,
            compiler: toolchains::GXX,
            source_file: "main.cpp",
        }
    }
}

#[async_trait]
impl CompiledLanguage for NativeRunner {
    type Artifact = PathBuf;

    async fn compile(
        &self,
        code: &str,
        scope: &IsolationScope,
        limits: &Limits,
    ) -> ExecResult<Compiled<PathBuf>> {
        let compiler = toolchain::resolve(self.compiler)
            .ok_or(ExecError::ToolMissing(messages::COMPILER_NOT_FOUND))?;

        let source = scope.write_file(self.source_file, code).await?;
        let binary = scope.path().join(BINARY_NAME);

        let spec = CommandSpec::new(compiler)
            .arg(&source)
            .arg("-o")
            .arg(&binary)
            .current_dir(scope.path());
        let outcome = process::run_with_timeout(
            &spec,
            "",
            limits.native_compile_timeout,
            limits.max_output_bytes,
        )
        .await
        .map_err(|e| {
            tracing::debug!("Failed to start compiler: {}", e);
            ExecError::ToolMissing(messages::COMPILER_NOT_FOUND)
        })?;

        let warnings = compile_result(outcome)?;
        Ok(Compiled {
            artifact: binary,
            warnings,
        })
    }
}

#[async_trait]
impl LanguageRunner for NativeRunner {
    fn language(&self) -> Language {
        self.language
    }

    async fn run(&self, code: &str, input: &str, ctx: &RunContext) -> ExecResult<ExecutionResult> {
        let scope = ctx.scope().await?;
        let compiled = self.compile(code, &scope, &ctx.limits).await?;

        let spec = CommandSpec::new(&compiled.artifact).current_dir(scope.path());
        let outcome = process::run_with_timeout(
            &spec,
            input,
            ctx.limits.run_timeout,
            ctx.limits.max_output_bytes,
        )
        .await
        .context("Failed to start compiled program")?;

        // A killed run reports nothing but the time limit
        let timed_out = matches!(outcome, ProcessOutcome::TimedOut);
        let result = run_result(outcome);
        Ok(if timed_out {
            result
        } else {
            result.with_warnings(compiled.warnings)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::languages::test_context;
    use crate::models::Verdict;

    #[test]
    fn test_language_settings() {
        let c = NativeRunner::c();
        assert_eq!(c.language(), Language::C);
        assert_eq!(c.source_file, "main.c");
        assert_eq!(c.compiler, toolchains::GCC);

        let cpp = NativeRunner::cpp();
        assert_eq!(cpp.language(), Language::Cpp);
        assert_eq!(cpp.source_file, "main.cpp");
        assert_eq!(cpp.compiler, toolchains::GXX);
    }

    #[tokio::test]
    async fn test_missing_compiler() {
        let root = tempfile::tempdir().unwrap();
        let runner = NativeRunner {
            compiler: &["/nonexistent/gcc", "no-such-gcc-5e21"],
            ..NativeRunner::c()
        };

        let err = runner
            .run("int main(void) { return 0; }", "", &test_context(root.path()))
            .await
            .unwrap_err();
        assert_eq!(err.verdict(), Verdict::ToolMissing);
        assert_eq!(err.to_string(), "Compiler not found or failed.");
        // The scope created for the compile is gone again
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
