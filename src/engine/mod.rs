//! Code execution engine
//!
//! Turns `(source code, language, stdin)` into a bounded run and a typed
//! result:
//!
//! 1. **Security** (`security.rs`): denylist screening before anything runs.
//! 2. **Dispatcher** (`dispatcher.rs`): entry point, backend selection and
//!    routing to a language runner.
//! 3. **Runners** (`languages/`): per-language compile/execute protocols.
//! 4. **Process** (`process.rs`) and **Workspace** (`workspace.rs`): bounded
//!    child processes and per-invocation temporary directories.

pub mod dispatcher;
pub mod languages;
pub mod process;
pub mod security;
pub mod toolchain;
pub mod workspace;

pub use dispatcher::Dispatcher;
pub use languages::{CompiledLanguage, LanguageRunner, RunContext};
pub use security::SecurityVerdict;
pub use workspace::IsolationScope;
