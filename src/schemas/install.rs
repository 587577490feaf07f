// Install-side data: where tengok goes and what happened when it got there.

use std::path::{Path, PathBuf};

/// Name of the installed executable.
pub const BINARY_NAME: &str = "tengok";

/// The system-wide install directory. Writing here normally needs elevation.
pub const GLOBAL_BIN_DIR: &str = "/usr/local/bin";

/// The per-user install directory, relative to the operator's home.
pub const LOCAL_BIN_SUBDIR: &str = ".local/bin";

/// How the install directory was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallKind {
    /// Chosen by the operator at the terminal prompt.
    Interactive,
    /// `--local`
    ForcedLocal,
    /// `--global`
    ForcedGlobal,
}

/// The resolved install mode. `target_dir` is fixed once this exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallMode {
    pub kind: InstallKind,
    pub target_dir: PathBuf,
}

/// What the run produced, used only for the closing messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub target_path: PathBuf,
    /// A previous `tengok` was replaced.
    pub overwritten: bool,
    /// Remediation hint when `tengok` is not reachable through `PATH`.
    pub path_warning: Option<String>,
}

/// Whether `dir` is the protected system location (or below it).
pub fn is_protected_dir(dir: &Path) -> bool {
    dir.starts_with(GLOBAL_BIN_DIR)
}

/// `<home>/.local/bin`
pub fn local_bin_dir(home: &Path) -> PathBuf {
    home.join(LOCAL_BIN_SUBDIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_global_dir_is_protected() {
        assert!(is_protected_dir(Path::new("/usr/local/bin")));
        assert!(is_protected_dir(Path::new("/usr/local/bin/nested")));
        assert!(!is_protected_dir(Path::new("/usr/local/binaries")));
        assert!(!is_protected_dir(&local_bin_dir(Path::new("/home/ana"))));
    }
}
