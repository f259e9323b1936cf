//! Per-invocation isolation scope
//!
//! A scope is a freshly created temporary directory owned by exactly one
//! execution. It is removed when the scope is dropped, on every exit path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tokio::fs;

use crate::constants::SCOPE_PREFIX;

/// Exclusively owned temporary build/run directory
#[derive(Debug)]
pub struct IsolationScope {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl IsolationScope {
    /// Create a uniquely named scope under `root`, or the system temp dir
    pub async fn create(root: Option<&Path>) -> Result<Self> {
        if let Some(root) = root {
            fs::create_dir_all(root)
                .await
                .with_context(|| format!("Failed to create scope root {}", root.display()))?;
        }

        let root = root.map(Path::to_path_buf);
        let dir = tokio::task::spawn_blocking(move || {
            let mut builder = tempfile::Builder::new();
            builder.prefix(SCOPE_PREFIX);
            match &root {
                Some(root) => builder.tempdir_in(root),
                None => builder.tempdir(),
            }
        })
        .await
        .context("Scope creation task failed")?
        .context("Failed to create isolation scope")?;

        let path = dir.path().to_path_buf();
        tracing::debug!(scope = %path.display(), "Created isolation scope");

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the scope and return the full path
    pub async fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path.join(name);
        fs::write(&path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Drop for IsolationScope {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take()
            && let Err(e) = dir.close()
        {
            tracing::warn!(scope = %self.path.display(), "Failed to cleanup scope: {}", e);
        }
    }
}
