//! Execution dispatcher - the single entry point of the engine
//!
//! Screens the source, selects the backend configured for this process and
//! routes to the runner for the language. Whatever happens inside a runner,
//! the caller gets a well-formed [`ExecutionResult`].

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

use super::languages::{LanguageRunner, RunContext, default_runners};
use super::security;
use crate::config::{EngineConfig, ExecutionMode};
use crate::error::ExecError;
use crate::models::{ExecutionRequest, ExecutionResult, Language};

/// Routes submissions to language runners.
///
/// Cheap to clone; holds no mutable state, so one instance can serve any
/// number of concurrent invocations.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<EngineConfig>,
    runners: Arc<HashMap<Language, Arc<dyn LanguageRunner>>>,
}

impl Dispatcher {
    /// Create a dispatcher with the runner for every supported language
    pub fn new(config: EngineConfig) -> Self {
        Self::with_runners(config, default_runners())
    }

    /// Create a dispatcher with an explicit runner table
    pub fn with_runners(config: EngineConfig, runners: Vec<Arc<dyn LanguageRunner>>) -> Self {
        let runners = runners
            .into_iter()
            .map(|runner| (runner.language(), runner))
            .collect();
        Self {
            config: Arc::new(config),
            runners: Arc::new(runners),
        }
    }

    pub async fn execute_request(&self, request: &ExecutionRequest) -> ExecutionResult {
        self.execute(&request.code, &request.language, &request.input)
            .await
    }

    /// Execute `code` written in `language` with `input` on stdin
    pub async fn execute(&self, code: &str, language: &str, input: &str) -> ExecutionResult {
        let execution_id = Uuid::new_v4();
        let span = tracing::info_span!("execute", %execution_id, language = %language);
        self.dispatch(code, language, input).instrument(span).await
    }

    async fn dispatch(&self, code: &str, language: &str, input: &str) -> ExecutionResult {
        let parsed = language.parse::<Language>().ok();

        let verdict = security::check(code, parsed);
        if !verdict.is_safe {
            let violation = verdict
                .violation
                .unwrap_or_else(|| "Security Violation".to_string());
            tracing::warn!(%violation, "Rejected submission");
            return ExecError::SecurityViolation(violation).into();
        }

        let result = match self.config.mode {
            ExecutionMode::LocalSecure => self.execute_local(code, language, parsed, input).await,
            ExecutionMode::Docker => ExecError::BackendUnavailable("Docker").into(),
            ExecutionMode::Judge0 => ExecError::BackendUnavailable("Judge0").into(),
        };

        tracing::info!(
            mode = %self.config.mode,
            verdict = %result.verdict,
            success = result.success,
            "Execution finished"
        );
        result
    }

    async fn execute_local(
        &self,
        code: &str,
        raw_language: &str,
        language: Option<Language>,
        input: &str,
    ) -> ExecutionResult {
        let Some(runner) = language.and_then(|l| self.runners.get(&l)) else {
            return ExecError::UnsupportedLanguage(raw_language.to_string()).into();
        };

        let ctx = RunContext {
            limits: self.config.limits,
            scope_root: self.config.scope_root.clone(),
        };

        match AssertUnwindSafe(runner.run(code, input, &ctx))
            .catch_unwind()
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(err)) => {
                if let ExecError::Internal(ref e) = err {
                    tracing::error!("Execution Error: {:#}", e);
                }
                err.into()
            }
            Err(panic) => {
                tracing::error!("Runner panicked: {}", panic_message(panic.as_ref()));
                ExecError::Internal(anyhow::anyhow!("runner panicked")).into()
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecResult;
    use crate::models::Verdict;
    use async_trait::async_trait;

    struct EchoRunner;

    #[async_trait]
    impl LanguageRunner for EchoRunner {
        fn language(&self) -> Language {
            Language::Python
        }

        async fn run(
            &self,
            code: &str,
            input: &str,
            _ctx: &RunContext,
        ) -> ExecResult<ExecutionResult> {
            Ok(ExecutionResult::accepted(format!("{}|{}", code, input)))
        }
    }

    struct PanickingRunner;

    #[async_trait]
    impl LanguageRunner for PanickingRunner {
        fn language(&self) -> Language {
            Language::C
        }

        async fn run(
            &self,
            _code: &str,
            _input: &str,
            _ctx: &RunContext,
        ) -> ExecResult<ExecutionResult> {
            panic!("boom");
        }
    }

    struct FailingRunner;

    #[async_trait]
    impl LanguageRunner for FailingRunner {
        fn language(&self) -> Language {
            Language::Java
        }

        async fn run(
            &self,
            _code: &str,
            _input: &str,
            _ctx: &RunContext,
        ) -> ExecResult<ExecutionResult> {
            Err(anyhow::anyhow!("disk full").into())
        }
    }

    fn dispatcher(mode: ExecutionMode) -> Dispatcher {
        let config = EngineConfig {
            mode,
            ..EngineConfig::default()
        };
        Dispatcher::with_runners(
            config,
            vec![
                Arc::new(EchoRunner),
                Arc::new(PanickingRunner),
                Arc::new(FailingRunner),
            ],
        )
    }

    #[tokio::test]
    async fn test_routes_to_runner() {
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("print(1)", "python", "in")
            .await;
        assert!(result.success);
        assert_eq!(result.output, "print(1)|in");
    }

    #[tokio::test]
    async fn test_security_check_runs_first() {
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("import os", "python", "")
            .await;
        assert!(!result.success);
        assert_eq!(result.verdict, Verdict::SecurityViolation);
        assert_eq!(result.output, "");
        assert_eq!(
            result.error.as_deref(),
            Some("Security Violation: usage of 'import os' is prohibited.")
        );

        // Even stub backends and unknown languages are screened
        let result = dispatcher(ExecutionMode::Docker)
            .execute("wget x", "ruby", "")
            .await;
        assert_eq!(result.verdict, Verdict::SecurityViolation);
    }

    #[tokio::test]
    async fn test_unsupported_language() {
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("puts 1", "ruby", "")
            .await;
        assert!(!result.success);
        assert_eq!(result.verdict, Verdict::UnsupportedLanguage);
        assert_eq!(result.error.as_deref(), Some("Language ruby not supported"));

        // Known language without a registered runner
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("console.log(1)", "node", "")
            .await;
        assert_eq!(result.error.as_deref(), Some("Language node not supported"));
    }

    #[tokio::test]
    async fn test_stub_backends_fail_clearly() {
        let result = dispatcher(ExecutionMode::Docker)
            .execute("print(1)", "python", "")
            .await;
        assert!(!result.success);
        assert_eq!(result.verdict, Verdict::BackendUnavailable);
        assert_eq!(
            result.error.as_deref(),
            Some("Docker execution not yet implemented")
        );

        let result = dispatcher(ExecutionMode::Judge0)
            .execute("print(1)", "python", "")
            .await;
        assert_eq!(
            result.error.as_deref(),
            Some("Judge0 execution not yet implemented")
        );
    }

    #[tokio::test]
    async fn test_runner_panic_becomes_internal_error() {
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("int main(){}", "c", "")
            .await;
        assert!(!result.success);
        assert_eq!(result.verdict, Verdict::InternalError);
        assert_eq!(result.error.as_deref(), Some("Internal Execution Error"));
    }

    #[tokio::test]
    async fn test_runner_error_is_not_exposed() {
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute("class A {}", "java", "")
            .await;
        assert_eq!(result.error.as_deref(), Some("Internal Execution Error"));
        assert_eq!(result.output, "");
    }

    #[tokio::test]
    async fn test_execute_request() {
        let request = ExecutionRequest::new("x", "python", "");
        let result = dispatcher(ExecutionMode::LocalSecure)
            .execute_request(&request)
            .await;
        assert_eq!(result.output, "x|");
    }
}
