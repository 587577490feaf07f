//! Scoped staging area for the downloaded asset.
//!
//! A [`StagingArtifact`] owns a fresh `tempfile::TempDir`; dropping the
//! artifact removes the directory. Because an interrupt terminates the
//! process without running destructors, every live staging directory is
//! also recorded in a process-wide registry that the signal handler
//! installed by [`install_interrupt_cleanup`] empties before exiting.

use crate::{log_debug, log_warn};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use tempfile::TempDir;

/// Prefix of staging directory names inside the system temp dir.
pub const STAGING_PREFIX: &str = "tengok-install.";

/// Exit code used after an interrupt (128 + SIGINT).
pub const INTERRUPT_EXIT_CODE: i32 = 130;

static LIVE_STAGING_DIRS: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());
static HANDLER_INSTALLED: Once = Once::new();

/// A downloaded asset waiting to be installed.
#[derive(Debug)]
pub struct StagingArtifact {
    binary_path: PathBuf,
    dir: TempDir,
}

impl StagingArtifact {
    /// Creates a uniquely named staging directory below `parent`.
    /// The staged file will be `<dir>/<file_name>`.
    pub fn create_in(parent: &Path, file_name: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)?;
        let binary_path = dir.path().join(file_name);

        register(dir.path());
        log_debug!("[Download] Staging directory {}", dir.path().display().to_string().dimmed());

        Ok(Self { binary_path, dir })
    }

    /// The staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the fetched asset lives while staged.
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

impl Drop for StagingArtifact {
    fn drop(&mut self) {
        // The TempDir field removes the directory right after this runs.
        unregister(self.dir.path());
        log_debug!("[Download] Releasing staging directory {}", self.dir.path().display());
    }
}

fn register(path: &Path) {
    if let Ok(mut dirs) = LIVE_STAGING_DIRS.lock() {
        dirs.push(path.to_path_buf());
    }
}

fn unregister(path: &Path) {
    if let Ok(mut dirs) = LIVE_STAGING_DIRS.lock() {
        dirs.retain(|p| p != path);
    }
}

/// Removes every staging directory still registered. Returns how many were removed.
pub fn remove_live_staging_dirs() -> usize {
    remove_registered(|_| true)
}

/// Unregisters and removes the live staging directories accepted by `selected`.
fn remove_registered(selected: impl Fn(&Path) -> bool) -> usize {
    let dirs: Vec<PathBuf> = {
        let mut live = match LIVE_STAGING_DIRS.lock() {
            Ok(live) => live,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (taken, kept) = std::mem::take(&mut *live).into_iter().partition(|p| selected(p));
        *live = kept;
        taken
    };

    let mut removed = 0;
    for dir in dirs {
        match fs::remove_dir_all(&dir) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log_warn!("[Download] Could not remove {}: {}", dir.display().to_string().purple(), e),
        }
    }
    removed
}

/// Installs the SIGINT/SIGTERM/SIGHUP handler that clears staging before exiting.
/// Safe to call more than once; only the first call installs the handler.
pub fn install_interrupt_cleanup() {
    HANDLER_INSTALLED.call_once(|| {
        let result = ctrlc::set_handler(|| {
            remove_live_staging_dirs();
            eprintln!();
            log_warn!("Interrupted, installation aborted");
            std::process::exit(INTERRUPT_EXIT_CODE);
        });
        if let Err(e) = result {
            log_warn!("Could not install interrupt handler: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_registered(path: &Path) -> bool {
        LIVE_STAGING_DIRS.lock().unwrap().iter().any(|p| p == path)
    }

    #[test]
    fn drop_removes_directory_and_registration() {
        let scratch = tempfile::tempdir().unwrap();
        let artifact = StagingArtifact::create_in(scratch.path(), "tengok-linux-x86_64").unwrap();
        let dir = artifact.path().to_path_buf();

        assert!(dir.is_dir());
        assert!(is_registered(&dir));
        assert!(artifact.binary_path().starts_with(&dir));
        assert!(dir.file_name().unwrap().to_string_lossy().starts_with(STAGING_PREFIX));

        drop(artifact);
        assert!(!dir.exists());
        assert!(!is_registered(&dir));
    }

    #[test]
    fn sweep_removes_directories_whose_artifact_was_never_dropped() {
        let scratch = tempfile::tempdir().unwrap();
        let artifact = StagingArtifact::create_in(scratch.path(), "tengok-linux-x86_64").unwrap();
        let dir = artifact.path().to_path_buf();
        std::fs::write(artifact.binary_path(), b"partial download").unwrap();
        // An interrupt exits without running destructors.
        std::mem::forget(artifact);

        // Only this test's directories: other tests stage concurrently.
        let removed = remove_registered(|p| p.starts_with(scratch.path()));

        assert_eq!(removed, 1);
        assert!(!dir.exists());
        assert!(!is_registered(&dir));
    }

    #[test]
    fn each_artifact_gets_a_unique_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let a = StagingArtifact::create_in(scratch.path(), "x").unwrap();
        let b = StagingArtifact::create_in(scratch.path(), "x").unwrap();
        assert_ne!(a.path(), b.path());
    }
}
