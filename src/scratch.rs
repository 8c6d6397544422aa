//! Local staging of downloaded bytes.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::scratch_path_in;

/// Scratch copy of a download that is deleted when dropped.
///
/// Call [`ScratchFile::remove`] on the success path to observe removal errors;
/// every other path relies on `Drop`.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
    armed: bool,
}

impl ScratchFile {
    /// Write `contents` to `<dir>/<key>`, creating `dir` if needed.
    pub async fn write(dir: &Path, key: &str, contents: &[u8]) -> io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;

        // Armed before the write so a partial file is removed on failure
        let scratch = Self::claim(scratch_path_in(dir, key));
        tokio::fs::write(&scratch.path, contents).await?;
        debug!("Wrote {} bytes to {}", contents.len(), scratch.path.display());

        Ok(scratch)
    }

    /// Take ownership of `path`; it is deleted when the guard drops.
    fn claim(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, returning its former path.
    pub fn remove(mut self) -> io::Result<PathBuf> {
        self.armed = false;
        std::fs::remove_file(&self.path)?;
        Ok(std::mem::take(&mut self.path))
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed scratch file {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove scratch file {}: {}", self.path.display(), e),
        }
    }
}
