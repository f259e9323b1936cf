//! Source denylist screening
//!
//! Every submission is scanned before anything is spawned. Matching is plain
//! substring search over the raw source text:
//!
//! 1. a small cross-language list, checked against the lower-cased source;
//! 2. a per-language list, checked against the source as submitted, so that
//!    e.g. `import os` only matches that exact spelling.
//!
//! The first hit wins and ends the scan.
//!
//! # Limitations
//!
//! This is static pattern matching and is trivially bypassed with string
//! concatenation, aliasing or reflection. It is a pre-filter that rejects
//! obviously hostile submissions early, not a security boundary. Real
//! isolation (unprivileged user, seccomp, containers, cgroups) has to be
//! provided by the host.

use serde::{Deserialize, Serialize};

use crate::models::Language;

/// Checked against the lower-cased source for every language
pub const GLOBAL_DENYLIST: &[&str] = &["rm -rf", "wget", "curl", "shutdown", "reboot"];

pub const PYTHON_DENYLIST: &[&str] = &[
    "import os",
    "from os",
    "import subprocess",
    "import sys",
    "import pty",
    "import shutil",
    "import requests",
    "import urllib",
    "import socket",
    "import multiprocessing",
    "import threading",
    "open(",
    "exec(",
    "eval(",
    "__import__",
    "os.system",
    "os.popen",
    "os.walk",
    "os.remove",
    "subprocess.run",
    "subprocess.Popen",
    "sys.modules",
];

pub const JAVASCRIPT_DENYLIST: &[&str] = &[
    r#"require("child_process")"#,
    "require('child_process')",
    r#"require("fs")"#,
    "require('fs')",
    r#"require("net")"#,
    "require('net')",
    r#"require("http")"#,
    "require('http')",
    "process.env",
    "process.kill",
    "process.exit",
    "exec(",
    "spawn(",
];

pub const NATIVE_DENYLIST: &[&str] = &[
    "system(", "fork(", "popen(", "execl(", "execv(", "remove(", "rename(", "fopen(", "socket(",
];

/// Outcome of a denylist scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityVerdict {
    pub is_safe: bool,
    /// Full "Security Violation: ..." message for the first matched term
    pub violation: Option<String>,
}

impl SecurityVerdict {
    fn safe() -> Self {
        Self {
            is_safe: true,
            violation: None,
        }
    }

    fn violation(message: String) -> Self {
        Self {
            is_safe: false,
            violation: Some(message),
        }
    }
}

/// Language-specific denylist; empty for languages that only get the global list
pub fn denylist_for(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => PYTHON_DENYLIST,
        Language::JavaScript => JAVASCRIPT_DENYLIST,
        Language::C | Language::Cpp => NATIVE_DENYLIST,
        Language::Java => &[],
    }
}

fn language_message(language: Language, term: &str) -> String {
    match language {
        Language::C | Language::Cpp => {
            format!("Security Violation: system call '{}' is prohibited.", term)
        }
        _ => format!("Security Violation: usage of '{}' is prohibited.", term),
    }
}

/// Scan `code` for denylisted terms.
///
/// `language` is `None` when the caller's language is unknown; only the
/// global list applies then.
pub fn check(code: &str, language: Option<Language>) -> SecurityVerdict {
    let lowered = code.to_lowercase();
    if let Some(term) = GLOBAL_DENYLIST.iter().find(|term| lowered.contains(*term)) {
        return SecurityVerdict::violation(format!(
            "Security Violation: '{}' is prohibited.",
            term
        ));
    }

    let Some(language) = language else {
        return SecurityVerdict::safe();
    };

    match denylist_for(language).iter().find(|term| code.contains(*term)) {
        Some(term) => SecurityVerdict::violation(language_message(language, term)),
        None => SecurityVerdict::safe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_code_passes() {
        let verdict = check("print(input())", Some(Language::Python));
        assert!(verdict.is_safe);
        assert_eq!(verdict.violation, None);
    }

    #[test]
    fn test_global_terms_are_case_insensitive() {
        let verdict = check("# CURL http://example.com", Some(Language::Python));
        assert!(!verdict.is_safe);
        assert_eq!(
            verdict.violation.as_deref(),
            Some("Security Violation: 'curl' is prohibited.")
        );
    }

    #[test]
    fn test_language_terms_are_case_sensitive() {
        assert!(!check("import os", Some(Language::Python)).is_safe);
        assert!(check("IMPORT OS", Some(Language::Python)).is_safe);
    }

    #[test]
    fn test_every_term_is_rejected() {
        for language in Language::ALL {
            for term in denylist_for(language) {
                let code = format!("x = 1\n{}\n", term);
                let verdict = check(&code, Some(language));
                assert!(!verdict.is_safe, "{} should reject {}", language, term);
                assert!(verdict.violation.unwrap().contains(term));
            }
        }
        for term in GLOBAL_DENYLIST {
            let verdict = check(term, None);
            assert!(!verdict.is_safe);
            assert!(verdict.violation.unwrap().contains(term));
        }
    }

    #[test]
    fn test_first_match_wins() {
        let verdict = check("import sys\nimport os\n", Some(Language::Python));
        // list order decides, not position in the source
        assert_eq!(
            verdict.violation.as_deref(),
            Some("Security Violation: usage of 'import os' is prohibited.")
        );

        let verdict = check("wget\nimport os\n", Some(Language::Python));
        assert_eq!(
            verdict.violation.as_deref(),
            Some("Security Violation: 'wget' is prohibited.")
        );
    }

    #[test]
    fn test_native_message_wording() {
        let verdict = check("int main() { system(\"ls\"); }", Some(Language::Cpp));
        assert_eq!(
            verdict.violation.as_deref(),
            Some("Security Violation: system call 'system(' is prohibited.")
        );
    }

    #[test]
    fn test_lists_are_language_specific() {
        // Python terms mean nothing to Java or an unknown language
        assert!(check("import os;", Some(Language::Java)).is_safe);
        assert!(check("exec(", None).is_safe);
        assert!(!check("exec(", Some(Language::JavaScript)).is_safe);
    }
}
