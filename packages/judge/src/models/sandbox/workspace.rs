use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use super::error::SandboxError;

const REMOVE_ATTEMPTS: u32 = 3;

/// Uniquely named working directory for one sandbox run.
///
/// The directory tree is removed when the value is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub async fn create(base_dir: &Path) -> Result<Self, SandboxError> {
        tokio::fs::create_dir_all(base_dir)
            .await
            .map_err(SandboxError::Workspace)?;

        let path = base_dir.join(format!("judge-{}", Uuid::new_v4()));
        tokio::fs::create_dir(&path)
            .await
            .map_err(SandboxError::Workspace)?;

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write_file(&self, name: &str, contents: &str) -> Result<PathBuf, SandboxError> {
        let path = self.path.join(name);
        tokio::fs::write(&path, contents)
            .await
            .map_err(SandboxError::Workspace)?;
        Ok(path)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        // A killed writer can still land one last file while the tree is being removed.
        for attempt in 1..=REMOVE_ATTEMPTS {
            match std::fs::remove_dir_all(&self.path) {
                Ok(()) => return,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
                Err(e) if attempt < REMOVE_ATTEMPTS => {
                    debug!(
                        path = %self.path.display(),
                        error = %e,
                        attempt,
                        "Retrying workspace removal"
                    );
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Failed to remove workspace")
                }
            }
        }
    }
}
