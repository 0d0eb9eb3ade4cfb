//! Per-request working directory.
//!
//! Every request writes its uploads and its report under
//! `<work_dir>/<request id>/`, so concurrent requests never touch each
//! other's files. The directory is created on first write and removed by
//! [`RequestWorkspace::cleanup`].

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::report::REPORT_FILENAME;

#[derive(Debug)]
pub struct RequestWorkspace {
    id: Uuid,
    dir: PathBuf,
    keep: bool,
}

impl RequestWorkspace {
    pub fn new(root: &Path, keep: bool) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            dir: root.join(id.to_string()),
            keep,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Storage path for an upload; the slot prefix keeps equal filenames apart
    pub fn upload_path(&self, slot: usize, sanitized_name: &str) -> PathBuf {
        self.dir.join(format!("{}_{}", slot, sanitized_name))
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.join(REPORT_FILENAME)
    }

    pub async fn cleanup(self) {
        if self.keep {
            debug!(dir = %self.dir.display(), "Keeping request artifacts");
            return;
        }
        match fs::remove_dir_all(&self.dir).await {
            Ok(()) => debug!(dir = %self.dir.display(), "Removed request directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(dir = %self.dir.display(), error = %e, "Failed to remove request directory"),
        }
    }
}
