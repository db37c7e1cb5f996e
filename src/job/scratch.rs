use std::path::{Path, PathBuf};

use anyhow::Context as _;
use uuid::Uuid;

use crate::foundation::error::TuneframeResult;

/// Directory prefix for per-job scratch directories.
pub const SCRATCH_PREFIX: &str = "tuneframe-";

/// A job-private directory for intermediate files, removed on drop unless `keep` is set.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    keep: bool,
}

impl ScratchDir {
    /// Create `<root>/tuneframe-<job_id>`.
    ///
    /// Fails if the directory already exists, so two jobs never share one.
    pub fn create(root: &Path, job_id: Uuid, keep: bool) -> TuneframeResult<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("create scratch root '{}'", root.display()))?;
        let path = root.join(format!("{SCRATCH_PREFIX}{job_id}"));
        std::fs::create_dir(&path)
            .with_context(|| format!("create scratch dir '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "created scratch dir");
        Ok(Self { path, keep })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if self.keep {
            tracing::info!(path = %self.path.display(), "keeping scratch dir");
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch dir");
        }
    }
}
