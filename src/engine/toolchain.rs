//! Toolchain discovery
//!
//! Each tool is described by an ordered list of candidates. A bare name is
//! looked up on `PATH`; an absolute path is accepted if it exists. The first
//! candidate that resolves wins.

use std::path::{Path, PathBuf};

use which::which;

/// Resolve the first available candidate
pub fn resolve(candidates: &[&str]) -> Option<PathBuf> {
    candidates.iter().find_map(|candidate| {
        let path = Path::new(candidate);
        if path.is_absolute() {
            path.is_file().then(|| path.to_path_buf())
        } else {
            which(candidate).ok()
        }
    })
}
