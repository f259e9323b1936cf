//! JavaScript (Node.js) language runner

use async_trait::async_trait;

use super::{LanguageRunner, RunContext, run_result};
use crate::constants::{messages, toolchains};
use crate::engine::process::{self, CommandSpec};
use crate::engine::toolchain;
use crate::error::{ExecError, ExecResult};
use crate::models::{ExecutionResult, Language};

#[derive(Debug, Clone, Copy)]
pub struct JavaScriptRunner {
    node: &'static [&'static str],
}

impl JavaScriptRunner {
    pub fn with_candidates(node: &'static [&'static str]) -> Self {
        Self { node }
    }
}

impl Default for JavaScriptRunner {
    fn default() -> Self {
        Self::with_candidates(toolchains::NODE)
    }
}

#[async_trait]
impl LanguageRunner for JavaScriptRunner {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    async fn run(&self, code: &str, input: &str, ctx: &RunContext) -> ExecResult<ExecutionResult> {
        let node = toolchain::resolve(self.node)
            .ok_or(ExecError::ToolMissing(messages::NODE_NOT_FOUND))?;

        let spec = CommandSpec::new(node).arg("-e").arg(code);
        // Any spawn failure is reported as a missing engine
        let outcome = process::run_with_timeout(
            &spec,
            input,
            ctx.limits.run_timeout,
            ctx.limits.max_output_bytes,
        )
        .await
        .map_err(|e| {
            tracing::debug!("Failed to start node: {}", e);
            ExecError::ToolMissing(messages::NODE_NOT_FOUND)
        })?;

        Ok(run_result(outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::languages::test_context;
    use crate::models::Verdict;

    #[tokio::test]
    async fn test_missing_node() {
        let root = tempfile::tempdir().unwrap();
        let runner = JavaScriptRunner::with_candidates(&["no-such-node-81c0"]);

        let err = runner
            .run("console.log(1)", "", &test_context(root.path()))
            .await
            .unwrap_err();
        assert_eq!(err.verdict(), Verdict::ToolMissing);
        assert_eq!(err.to_string(), "Node.js not found.");
    }

    #[tokio::test]
    async fn test_unstartable_node_is_reported_missing() {
        let root = tempfile::tempdir().unwrap();
        // Resolves as a file but cannot be executed
        let fake = root.path().join("node");
        std::fs::write(&fake, b"not a binary").unwrap();
        let fake: &'static str = Box::leak(fake.to_string_lossy().into_owned().into_boxed_str());
        let candidates: &'static [&'static str] = Box::leak(vec![fake].into_boxed_slice());

        let err = JavaScriptRunner::with_candidates(candidates)
            .run("console.log(1)", "", &test_context(root.path()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Node.js not found.");
    }
}
