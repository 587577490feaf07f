// Our custom logging macros to give us nicely formatted (and colored!) output.
use crate::{log_debug, log_warn};
use crate::schemas::errors::{InstallerError, Result};
use crate::schemas::platform::{Arch, HostPlatform, Os};
// The 'colored' crate helps us make our console output look pretty and readable.
use colored::Colorize;
// `uname` is the authoritative source for what the host reports, which can
// differ from what this binary was compiled for (e.g. under Rosetta 2).
use std::process::Command;

/// Raw identifiers as reported by the operating environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentifiers {
    /// Kernel name, e.g. `Linux` or `Darwin` (`uname -s`).
    pub kernel: String,
    /// Machine architecture, e.g. `x86_64` or `aarch64` (`uname -m`).
    pub machine: String,
}

/// Reads the host's kernel name and machine architecture.
///
/// Uses `uname -s` / `uname -m`. If `uname` is unavailable the compile-time
/// target (`std::env::consts`) is translated into the same vocabulary.
pub fn host_identifiers() -> HostIdentifiers {
    let kernel = uname("-s").unwrap_or_else(|| {
        let fallback = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Darwin",
            other => other,
        };
        log_warn!("[Platform] `uname -s` unavailable, using compile target '{}'", fallback.purple());
        fallback.to_string()
    });
    let machine = uname("-m").unwrap_or_else(|| {
        log_warn!(
            "[Platform] `uname -m` unavailable, using compile target '{}'",
            std::env::consts::ARCH.purple()
        );
        std::env::consts::ARCH.to_string()
    });

    HostIdentifiers { kernel, machine }
}

fn uname(flag: &str) -> Option<String> {
    let output = Command::new("uname").arg(flag).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}

/// Maps raw host identifiers onto the supported (OS, Arch) matrix.
///
/// # Errors
/// * `UnsupportedPlatform` for any kernel other than `Linux` or `Darwin`.
/// * `UnsupportedArchitecture` for any machine other than `x86_64`/`amd64`
///   or `arm64`/`aarch64`.
pub fn detect(ids: &HostIdentifiers) -> Result<HostPlatform> {
    let os = normalize_os(&ids.kernel)?;
    let arch = normalize_arch(&ids.machine)?;
    let platform = HostPlatform { os, arch };

    log_debug!(
        "[Platform] '{}'/'{}' normalized to {}",
        ids.kernel,
        ids.machine,
        platform.to_string().cyan()
    );
    Ok(platform)
}

/// Normalizes a kernel name. Matching is case-insensitive.
pub fn normalize_os(kernel: &str) -> Result<Os> {
    match kernel.trim().to_lowercase().as_str() {
        "linux" => Ok(Os::Linux),
        "darwin" => Ok(Os::Macos),
        _ => Err(InstallerError::UnsupportedPlatform {
            kernel: kernel.to_string(),
        }),
    }
}

/// Normalizes a machine architecture. Matching is case-insensitive.
pub fn normalize_arch(machine: &str) -> Result<Arch> {
    match machine.trim().to_lowercase().as_str() {
        "x86_64" | "amd64" => Ok(Arch::X86_64),
        "arm64" | "aarch64" => Ok(Arch::Arm64),
        _ => Err(InstallerError::UnsupportedArchitecture {
            machine: machine.to_string(),
        }),
    }
}
