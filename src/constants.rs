//! Engine-wide constants
//!
//! This module contains all constant values used throughout the engine.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// EXECUTION DEFAULTS
// =============================================================================

/// Wall-clock limit for the run phase of every language, in milliseconds
pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 2_000;

/// Wall-clock limit for gcc/g++, in milliseconds
pub const DEFAULT_NATIVE_COMPILE_TIMEOUT_MS: u64 = 5_000;

/// Wall-clock limit for javac, in milliseconds (JVM cold starts are slow)
pub const DEFAULT_JAVA_COMPILE_TIMEOUT_MS: u64 = 15_000;

/// Maximum number of bytes kept from each of stdout and stderr (1 MB)
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

/// Prefix of every isolation scope directory
pub const SCOPE_PREFIX: &str = "codejudge-";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "codejudge=info";

// =============================================================================
// EXECUTION MODES
// =============================================================================

/// Execution mode identifiers (`EXECUTION_MODE`)
pub mod modes {
    pub const LOCAL_SECURE: &str = "local_secure";
    pub const DOCKER: &str = "docker";
    pub const JUDGE0: &str = "judge0";

    /// All recognised execution modes
    pub const ALL: &[&str] = &[LOCAL_SECURE, DOCKER, JUDGE0];
}

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const JAVA: &str = "java";
    pub const JAVASCRIPT: &str = "javascript";

    /// Aliases accepted for JavaScript
    pub const JAVASCRIPT_ALIASES: &[&str] = &["node", "nodejs"];

    /// All canonical language identifiers
    pub const ALL: &[&str] = &[PYTHON, C, CPP, JAVA, JAVASCRIPT];
}

// =============================================================================
// TOOLCHAINS
// =============================================================================

/// Candidate binaries, tried in order; the first one found wins.
pub mod toolchains {
    pub const PYTHON: &[&str] = &["python3", "python"];
    pub const GCC: &[&str] = &["gcc"];
    pub const GXX: &[&str] = &["g++"];
    pub const JAVAC: &[&str] = &[
        "javac",
        "/usr/bin/javac",
        "/usr/lib/jvm/java-11-openjdk-amd64/bin/javac",
        "/usr/lib/jvm/java-8-openjdk-amd64/bin/javac",
        "/usr/lib/jvm/java-11-amazon-corretto.x86_64/bin/javac",
        "/usr/local/bin/javac",
    ];
    pub const JAVA: &[&str] = &["java"];
    pub const NODE: &[&str] = &["node"];
}

/// Class name used when a Java source declares no public class
pub const DEFAULT_JAVA_CLASS: &str = "Main";

// =============================================================================
// RESULT MESSAGES
// =============================================================================

/// User-visible `error` texts
pub mod messages {
    pub const TIME_LIMIT_EXCEEDED: &str = "Time Limit Exceeded";
    pub const COMPILE_TIME_LIMIT_EXCEEDED: &str = "Compilation Time Limit Exceeded";
    pub const RUNTIME_ERROR: &str = "Runtime Error";
    pub const INTERNAL_ERROR: &str = "Internal Execution Error";
    pub const PYTHON_NOT_FOUND: &str = "Python interpreter (python3/python) not found.";
    pub const COMPILER_NOT_FOUND: &str = "Compiler not found or failed.";
    pub const JAVAC_NOT_FOUND: &str =
        "Java Compiler (javac) not found. Please ensure JDK is installed.";
    pub const JAVA_NOT_FOUND: &str = "Java Runtime (java) not found.";
    pub const NODE_NOT_FOUND: &str = "Node.js not found.";
}
