// Places the staged binary at `<target_dir>/tengok`.
//
// Order matters: the directory is ensured first, overwrite consent is
// obtained before anything touches the final path, and the move itself
// either lands the complete file or leaves the previous one as it was.

use crate::libs::elevation::{Elevation, ElevationError};
use crate::libs::file_operations::{is_executable, make_executable, move_binary};
use crate::libs::prompt::Prompter;
use crate::schemas::errors::{InstallerError, Result};
use crate::schemas::install::BINARY_NAME;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const INSTALL_STAGE: &str = "Install";

/// Knobs for one install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallOptions {
    /// Replace an existing tengok without asking.
    pub force: bool,
    /// `target_dir` is the protected system location.
    pub protected: bool,
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub target_path: PathBuf,
    pub overwritten: bool,
    pub elevated: bool,
}

/// Installs `staged_binary` into `target_dir`.
///
/// # Errors
/// * `InstallDirUnavailable` if `target_dir` cannot be created.
/// * `InstallationCancelled` if an existing tengok is present, `force` is
///   off, and the operator does not answer affirmatively.
/// * `PrivilegeDenied` if the protected location needs elevation that
///   cannot be obtained.
/// * `InstallMoveFailed` if the move itself fails.
pub fn install(
    staged_binary: &Path,
    target_dir: &Path,
    options: InstallOptions,
    prompter: &mut dyn Prompter,
    elevation: &mut dyn Elevation,
) -> Result<InstallReport> {
    // Step 1: the directory.
    ensure_target_dir(target_dir, options.protected, elevation)?;

    // Step 2: consent to overwrite.
    let target_path = target_dir.join(BINARY_NAME);
    let exists = fs::symlink_metadata(&target_path).is_ok();
    if exists && !options.force {
        confirm_overwrite(&target_path, prompter)?;
    } else if exists {
        log_debug!("[Install] --force set, replacing {}", target_path.display());
    }

    // Step 3: the move.
    let elevated = options.protected && elevation.required_for(target_dir);
    if elevated {
        elevated_move(staged_binary, &target_path, elevation)?;
    } else {
        move_binary(staged_binary, &target_path).map_err(|e| move_failed(&target_path, e.to_string()))?;
        if !is_executable(&target_path) {
            make_executable(&target_path).map_err(|e| move_failed(&target_path, e.to_string()))?;
        }
    }

    if !is_executable(&target_path) {
        return Err(move_failed(&target_path, "installed file is not executable".to_string()));
    }

    log_info!("[Install] Installed {}", target_path.display().to_string().green());
    Ok(InstallReport {
        target_path,
        overwritten: exists,
        elevated,
    })
}

fn ensure_target_dir(dir: &Path, protected: bool, elevation: &mut dyn Elevation) -> Result<()> {
    let unavailable = |reason: String| InstallerError::InstallDirUnavailable {
        path: dir.to_path_buf(),
        reason,
    };

    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(unavailable("path exists but is not a directory".to_string()));
    }

    log_debug!("[Install] Creating {}", dir.display());
    match fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied && protected => {
            log_debug!("[Install] {} needs elevation to create ({})", dir.display(), e);
            elevation
                .create_dir_all(dir)
                .map_err(|e| unavailable(format!("elevated mkdir failed: {e}")))?;
            if dir.is_dir() {
                Ok(())
            } else {
                Err(unavailable("directory still missing after elevated mkdir".to_string()))
            }
        }
        Err(e) => Err(unavailable(e.to_string())),
    }
}

fn confirm_overwrite(target_path: &Path, prompter: &mut dyn Prompter) -> Result<()> {
    let question = format!(
        "{} already exists at {}. Overwrite it? [y/N] ",
        BINARY_NAME.bold(),
        target_path.display()
    );
    let answer = prompter
        .ask(&question)
        .map_err(|e| InstallerError::cancelled(INSTALL_STAGE, format!("cannot ask for overwrite confirmation: {e} (use --force)")))?;

    match answer.as_deref().map(|a| a.trim().to_lowercase()) {
        Some(a) if a == "y" || a == "yes" => Ok(()),
        Some(_) => Err(InstallerError::cancelled(INSTALL_STAGE, format!(
            "kept the existing {}",
            target_path.display()
        ))),
        None => Err(InstallerError::cancelled(INSTALL_STAGE, "input ended before overwrite was confirmed")),
    }
}

fn elevated_move(from: &Path, to: &Path, elevation: &mut dyn Elevation) -> Result<()> {
    elevation.authorize().map_err(|e| InstallerError::PrivilegeDenied {
        target: to.to_path_buf(),
        reason: e.to_string(),
    })?;

    elevation.move_file(from, to).map_err(|e| match e {
        ElevationError::Denied(reason) => InstallerError::PrivilegeDenied {
            target: to.to_path_buf(),
            reason,
        },
        ElevationError::Failed(reason) => move_failed(to, reason),
    })
}

fn move_failed(target: &Path, reason: String) -> InstallerError {
    InstallerError::InstallMoveFailed {
        target: target.to_path_buf(),
        reason,
    }
}
