//! Error taxonomy for the installer pipeline.
//!
//! Every variant is fatal: the pipeline stops at the first error, `main`
//! prints the diagnostic tagged with [`InstallerError::stage`] and exits with
//! [`InstallerError::exit_code`]. Nothing here is retried automatically;
//! re-running the installer is the recovery path.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort an installer run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The kernel name reported by the host is outside the support matrix.
    #[error("unsupported platform '{kernel}' (supported: Linux, Darwin)")]
    UnsupportedPlatform { kernel: String },

    /// The machine architecture reported by the host is outside the support matrix.
    #[error("unsupported architecture '{machine}' (supported: x86_64/amd64, arm64/aarch64)")]
    UnsupportedArchitecture { machine: String },

    /// An invocation flag (or stray argument) was not recognized.
    #[error("unknown option '{option}' (expected --global, --local, --force, --tag <TAG>)")]
    UnknownOption { option: String },

    /// The pinned release tag cannot be used as a URL path segment.
    #[error("invalid release tag '{tag}': a tag must be a single token without '/', '?', '#' or whitespace")]
    InvalidVersion { tag: String },

    /// The release asset could not be fetched.
    #[error("failed to download {asset}: {reason}")]
    DownloadFailed { asset: String, reason: String },

    /// The install directory does not exist and could not be created.
    #[error("install directory {} is unavailable: {reason}", .path.display())]
    InstallDirUnavailable { path: PathBuf, reason: String },

    /// The operator declined, or input ended before an answer was given.
    #[error("installation cancelled: {reason}")]
    InstallationCancelled { stage: &'static str, reason: String },

    /// Moving the staged binary to its final place failed.
    #[error("could not move tengok into {}: {reason}", .target.display())]
    InstallMoveFailed { target: PathBuf, reason: String },

    /// Elevation was needed for the protected location but was not granted.
    #[error("elevated privileges are required to write {}: {reason}", .target.display())]
    PrivilegeDenied { target: PathBuf, reason: String },
}

impl InstallerError {
    /// Name of the pipeline stage the error belongs to, used to tag diagnostics.
    pub fn stage(&self) -> &'static str {
        match self {
            InstallerError::UnsupportedPlatform { .. }
            | InstallerError::UnsupportedArchitecture { .. } => "Platform",
            InstallerError::UnknownOption { .. } => "Options",
            InstallerError::InvalidVersion { .. } => "Asset",
            InstallerError::DownloadFailed { .. } => "Download",
            InstallerError::InstallationCancelled { stage, .. } => *stage,
            InstallerError::InstallDirUnavailable { .. }
            | InstallerError::InstallMoveFailed { .. }
            | InstallerError::PrivilegeDenied { .. } => "Install",
        }
    }

    /// Process exit code for the error. Always nonzero and distinct per kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallerError::UnknownOption { .. } => 2,
            InstallerError::InvalidVersion { .. } => 3,
            InstallerError::UnsupportedPlatform { .. } => 10,
            InstallerError::UnsupportedArchitecture { .. } => 11,
            InstallerError::DownloadFailed { .. } => 20,
            InstallerError::InstallDirUnavailable { .. } => 30,
            InstallerError::InstallationCancelled { .. } => 40,
            InstallerError::InstallMoveFailed { .. } => 50,
            InstallerError::PrivilegeDenied { .. } => 51,
        }
    }

    /// Shorthand for the cancellation variant, tagged with the stage that asked.
    pub fn cancelled(stage: &'static str, reason: impl Into<String>) -> Self {
        InstallerError::InstallationCancelled {
            stage,
            reason: reason.into(),
        }
    }
}

/// Convenience alias used by every stage.
pub type Result<T> = std::result::Result<T, InstallerError>;
