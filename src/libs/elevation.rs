//! Privilege escalation for the protected install location.
//!
//! The install executor first checks whether elevation is needed at all
//! ([`can_write_dir`]); only then does it go through an [`Elevation`]. The
//! real implementation shells out to `sudo`, which reads its password from
//! the controlling terminal just like our own prompts do.

use crate::log_info;
use colored::Colorize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Why an elevated operation did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElevationError {
    /// Privileges could not be obtained (no `sudo`, wrong password, not a sudoer).
    Denied(String),
    /// Privileges were granted but the command itself failed.
    Failed(String),
}

impl std::fmt::Display for ElevationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElevationError::Denied(reason) | ElevationError::Failed(reason) => f.write_str(reason),
        }
    }
}

/// Runs filesystem operations with escalated privileges.
pub trait Elevation {
    /// Capability check: whether writing into `dir` needs elevation.
    fn required_for(&self, dir: &Path) -> bool {
        !can_write_dir(dir)
    }

    /// Obtains privileges, prompting the operator once if needed.
    fn authorize(&mut self) -> Result<(), ElevationError>;

    /// `mkdir -p dir` with privileges.
    fn create_dir_all(&mut self, dir: &Path) -> Result<(), ElevationError>;

    /// Places `from` at `to` with privileges. `to` is either left as it was
    /// or replaced by the complete file, never by a partial copy.
    fn move_file(&mut self, from: &Path, to: &Path) -> Result<(), ElevationError>;
}

/// Whether the current user can create files in `dir` without elevation
/// (for example when already running as root). Probes with a throwaway file.
pub fn can_write_dir(dir: &Path) -> bool {
    tempfile::Builder::new()
        .prefix(".tengok-probe.")
        .tempfile_in(dir)
        .is_ok()
}

/// `sudo`-backed elevation. `sudo` is looked up on first use.
#[derive(Debug, Default)]
pub struct SudoElevation {
    sudo: Option<PathBuf>,
    authorized: bool,
}

impl SudoElevation {
    pub fn new() -> Self {
        Self::default()
    }

    fn sudo(&mut self) -> Result<PathBuf, ElevationError> {
        if let Some(path) = &self.sudo {
            return Ok(path.clone());
        }
        let path = which::which("sudo")
            .map_err(|_| ElevationError::Denied("`sudo` was not found on PATH".to_string()))?;
        self.sudo = Some(path.clone());
        Ok(path)
    }

    fn run(&mut self, args: &[&OsStr]) -> Result<(), ElevationError> {
        self.authorize()?;
        let sudo = self.sudo()?;
        let output = Command::new(&sudo)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ElevationError::Failed(format!("could not run {}: {e}", sudo.display())))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ElevationError::Failed(format!(
                "`sudo {}` exited with {}: {}",
                args.iter().map(|a| a.to_string_lossy()).collect::<Vec<_>>().join(" "),
                output.status,
                stderr.trim()
            )))
        }
    }
}

impl Elevation for SudoElevation {
    fn authorize(&mut self) -> Result<(), ElevationError> {
        if self.authorized {
            return Ok(());
        }
        let sudo = self.sudo()?;
        log_info!("[Install] Requesting administrator privileges via {}", "sudo".bold());

        // `sudo -v` refreshes credentials, asking for a password on the terminal if needed.
        let status = Command::new(&sudo)
            .arg("-v")
            .status()
            .map_err(|e| ElevationError::Denied(format!("could not run {}: {e}", sudo.display())))?;
        if !status.success() {
            return Err(ElevationError::Denied(format!("`sudo -v` exited with {status}")));
        }

        self.authorized = true;
        Ok(())
    }

    fn create_dir_all(&mut self, dir: &Path) -> Result<(), ElevationError> {
        self.run(&[OsStr::new("mkdir"), OsStr::new("-p"), dir.as_os_str()])
    }

    fn move_file(&mut self, from: &Path, to: &Path) -> Result<(), ElevationError> {
        let partial = partial_path_for(to)?;
        let [copy, chmod, rename] = atomic_move_steps(from, &partial, to);

        self.run(&copy)?;
        let placed = self.run(&chmod).and_then(|()| self.run(&rename));
        if placed.is_err() {
            let _ = self.run(&[OsStr::new("rm"), OsStr::new("-f"), partial.as_os_str()]);
        }
        placed
    }
}

/// Temporary name next to `to`, so the final rename never crosses filesystems.
fn partial_path_for(to: &Path) -> Result<PathBuf, ElevationError> {
    let dir = to
        .parent()
        .ok_or_else(|| ElevationError::Failed(format!("{} has no parent directory", to.display())))?;
    let name = to.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    Ok(dir.join(format!(".{name}.{}.partial", std::process::id())))
}

/// `cp` into the destination directory, `chmod 755`, then `mv -f` over the final path.
fn atomic_move_steps<'a>(from: &'a Path, partial: &'a Path, to: &'a Path) -> [Vec<&'a OsStr>; 3] {
    [
        vec![OsStr::new("cp"), from.as_os_str(), partial.as_os_str()],
        vec![OsStr::new("chmod"), OsStr::new("755"), partial.as_os_str()],
        vec![OsStr::new("mv"), OsStr::new("-f"), partial.as_os_str(), to.as_os_str()],
    ]
}
