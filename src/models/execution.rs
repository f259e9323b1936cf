//! Execution request/result models

use serde::{Deserialize, Serialize};

/// A single submission to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub code: String,
    /// Language identifier as sent by the caller (validated by the dispatcher)
    pub language: String,
    /// Standard input; a missing field is treated as empty input
    #[serde(default)]
    pub input: String,
}

impl ExecutionRequest {
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            input: input.into(),
        }
    }
}

/// Typed outcome of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// Program ran and exited zero
    Accepted,
    /// Denylist hit, nothing was spawned
    SecurityViolation,
    /// Language outside the supported set
    UnsupportedLanguage,
    /// Interpreter, compiler or runtime binary missing
    ToolMissing,
    /// Compiler exited non-zero
    CompilationError,
    /// Program exited non-zero
    RuntimeError,
    /// Compile or run phase exceeded its wall-clock bound
    TimeLimitExceeded,
    /// Unexpected fault inside the engine
    InternalError,
    /// Selected execution mode has no implementation
    BackendUnavailable,
}

impl Verdict {
    /// Get short code for verdict
    pub fn code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::SecurityViolation => "SV",
            Verdict::UnsupportedLanguage => "UL",
            Verdict::ToolMissing => "TM",
            Verdict::CompilationError => "CE",
            Verdict::RuntimeError => "RE",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::InternalError => "IE",
            Verdict::BackendUnavailable => "BU",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Result returned for every execution, successful or not.
///
/// `error` is `None` exactly when `success` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<String>,
    pub verdict: Verdict,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn accepted(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
            warnings: None,
            verdict: Verdict::Accepted,
        }
    }

    /// Create a failed result; an empty message is replaced by the verdict code
    pub fn failure(verdict: Verdict, output: String, error: String) -> Self {
        let error = if error.is_empty() {
            verdict.code().to_string()
        } else {
            error
        };
        Self {
            success: false,
            output,
            error: Some(error),
            warnings: None,
            verdict,
        }
    }

    /// Attach compiler warnings; empty text is dropped
    pub fn with_warnings(mut self, warnings: Option<String>) -> Self {
        self.warnings = warnings.filter(|w| !w.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_input_defaults_to_empty() {
        let request: ExecutionRequest =
            serde_json::from_str(r#"{"code":"print(1)","language":"python"}"#).unwrap();
        assert_eq!(request.input, "");
    }

    #[test]
    fn test_result_json_omits_absent_fields() {
        let json = serde_json::to_value(ExecutionResult::accepted("42\n".to_string())).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["output"], "42\n");
        assert_eq!(json["verdict"], "ACCEPTED");
        assert!(json.get("error").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_failure_always_carries_error() {
        let result = ExecutionResult::failure(Verdict::RuntimeError, String::new(), String::new());
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("RE"));
    }

    #[test]
    fn test_blank_warnings_are_dropped() {
        let result =
            ExecutionResult::accepted(String::new()).with_warnings(Some("  \n".to_string()));
        assert_eq!(result.warnings, None);

        let result = ExecutionResult::accepted(String::new())
            .with_warnings(Some("warning: unused variable".to_string()));
        assert_eq!(result.warnings.as_deref(), Some("warning: unused variable"));
    }
}
