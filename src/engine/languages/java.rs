//! Java language runner
//!
//! javac requires the file name to match the public class, so the class name
//! is extracted from the source before anything is written.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{Compiled, CompiledLanguage, LanguageRunner, RunContext, compile_result, run_result};
use crate::config::Limits;
use crate::constants::{DEFAULT_JAVA_CLASS, messages, toolchains};
use crate::engine::process::{self, CommandSpec, SpawnError};
use crate::engine::toolchain;
use crate::engine::workspace::IsolationScope;
use crate::error::{ExecError, ExecResult};
use crate::models::{ExecutionResult, Language};

static PUBLIC_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"public\s+class\s+([A-Za-z0-9_$]+)").expect("public class pattern is valid")
});

/// Name of the first public class, or `Main` when none is declared
pub fn class_name(code: &str) -> &str {
    PUBLIC_CLASS
        .captures(code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_JAVA_CLASS)
}

#[derive(Debug, Clone, Copy)]
pub struct JavaRunner {
    javac: &'static [&'static str],
    java: &'static [&'static str],
}

impl JavaRunner {
    pub fn with_candidates(javac: &'static [&'static str], java: &'static [&'static str]) -> Self {
        Self { javac, java }
    }
}

impl Default for JavaRunner {
    fn default() -> Self {
        Self::with_candidates(toolchains::JAVAC, toolchains::JAVA)
    }
}

#[async_trait]
impl CompiledLanguage for JavaRunner {
    /// Entry class name
    type Artifact = String;

    async fn compile(
        &self,
        code: &str,
        scope: &IsolationScope,
        limits: &Limits,
    ) -> ExecResult<Compiled<String>> {
        let class = class_name(code).to_string();
        let javac = toolchain::resolve(self.javac)
            .ok_or(ExecError::ToolMissing(messages::JAVAC_NOT_FOUND))?;
        tracing::debug!(javac = %javac.display(), class = %class, "Compiling Java source");

        let source = scope.write_file(&format!("{}.java", class), code).await?;

        let spec = CommandSpec::new(javac).arg(&source).current_dir(scope.path());
        let outcome = process::run_with_timeout(
            &spec,
            "",
            limits.java_compile_timeout,
            limits.max_output_bytes,
        )
        .await
        .map_err(|e| match e {
            SpawnError::NotFound(_) => ExecError::ToolMissing(messages::JAVAC_NOT_FOUND),
            e => ExecError::Execution(format!("Internal Compiler Error: {}", e)),
        })?;

        // javac warnings are not surfaced
        compile_result(outcome)?;
        Ok(Compiled {
            artifact: class,
            warnings: None,
        })
    }
}

#[async_trait]
impl LanguageRunner for JavaRunner {
    fn language(&self) -> Language {
        Language::Java
    }

    async fn run(&self, code: &str, input: &str, ctx: &RunContext) -> ExecResult<ExecutionResult> {
        let scope = ctx.scope().await?;
        let compiled = self.compile(code, &scope, &ctx.limits).await?;

        let java = toolchain::resolve(self.java)
            .ok_or(ExecError::ToolMissing(messages::JAVA_NOT_FOUND))?;

        let spec = CommandSpec::new(java)
            .arg("-cp")
            .arg(scope.path())
            .arg(&compiled.artifact)
            .current_dir(scope.path());
        let outcome = process::run_with_timeout(
            &spec,
            input,
            ctx.limits.run_timeout,
            ctx.limits.max_output_bytes,
        )
        .await
        .map_err(|e| match e {
            SpawnError::NotFound(_) => ExecError::ToolMissing(messages::JAVA_NOT_FOUND),
            e => ExecError::Execution(format!("Internal Execution Error: {}", e)),
        })?;

        Ok(run_result(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::languages::test_context;
    use crate::models::Verdict;

    const HELLO: &str = "public class Hello {\n    public static void main(String[] a) {}\n}\n";

    #[test]
    fn test_class_name_extraction() {
        assert_eq!(class_name("public class Solution {\n}"), "Solution");
        assert_eq!(class_name("public   class\tFoo_Bar$1 extends X {}"), "Foo_Bar$1");
        assert_eq!(class_name("class Hidden {}"), "Main");
        assert_eq!(class_name(""), "Main");
    }

    #[test]
    fn test_first_public_class_wins() {
        let code = "public class First {}\npublic class Second {}";
        assert_eq!(class_name(code), "First");
    }

    #[tokio::test]
    async fn test_missing_javac() {
        let root = tempfile::tempdir().unwrap();
        let runner = JavaRunner::with_candidates(&["/nonexistent/javac"], toolchains::JAVA);

        let err = runner
            .run(HELLO, "", &test_context(root.path()))
            .await
            .unwrap_err();
        assert_eq!(err.verdict(), Verdict::ToolMissing);
        assert_eq!(
            err.to_string(),
            "Java Compiler (javac) not found. Please ensure JDK is installed."
        );
    }

    #[tokio::test]
    async fn test_missing_java_runtime_after_compile() {
        // `true` stands in for a javac that compiles cleanly
        if toolchain::resolve(&["true"]).is_none() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let runner = JavaRunner::with_candidates(&["true"], &["no-such-java-3a9d"]);

        let err = runner
            .run(HELLO, "", &test_context(root.path()))
            .await
            .unwrap_err();
        assert_eq!(err.verdict(), Verdict::ToolMissing);
        assert_eq!(err.to_string(), "Java Runtime (java) not found.");
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_default_candidates() {
        let runner = JavaRunner::default();
        assert_eq!(runner.javac, toolchains::JAVAC);
        assert_eq!(runner.java, toolchains::JAVA);
    }
}
