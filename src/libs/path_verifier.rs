// Post-install check: can the operator now run `tengok` by name?
// Purely informational; nothing here can fail the install.

use crate::log_debug;
use crate::schemas::install::BINARY_NAME;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// What the PATH lookup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathReport {
    /// Where `tengok` resolves through PATH, if anywhere.
    pub resolved: Option<PathBuf>,
    /// Set when `tengok` resolves to some other file than the one just installed.
    pub shadowed_by: Option<PathBuf>,
    /// Remediation hint when `tengok` is unreachable and `target_dir` is off PATH.
    pub advisory: Option<String>,
}

/// Looks `tengok` up through `path_var` and builds the advisory if needed.
pub fn verify(
    target_dir: &Path,
    path_var: Option<&OsStr>,
    shell: Option<&str>,
    home: Option<&Path>,
) -> PathReport {
    let installed = target_dir.join(BINARY_NAME);
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let resolved = which::which_in(BINARY_NAME, path_var, cwd).ok();
    log_debug!("[Verify] `{}` resolves to {:?}", BINARY_NAME, resolved);

    let shadowed_by = resolved
        .as_ref()
        .filter(|found| !same_file(found, &installed))
        .cloned();

    let advisory = if resolved.is_none() && !dir_on_path(target_dir, path_var) {
        Some(path_advice(target_dir, shell, home))
    } else {
        None
    };

    PathReport {
        resolved,
        shadowed_by,
        advisory,
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn dir_on_path(dir: &Path, path_var: Option<&OsStr>) -> bool {
    let Some(path_var) = path_var else {
        return false;
    };
    env::split_paths(path_var).any(|entry| entry == dir || same_file(&entry, dir))
}

/// Shell startup file the operator should edit, and the line to add to it.
pub fn shell_config_line(target_dir: &Path, shell: Option<&str>, home: Option<&Path>) -> (String, String) {
    let shell_name = shell
        .and_then(|s| Path::new(s).file_name())
        .and_then(OsStr::to_str)
        .unwrap_or("");
    let rc = |file: &str| {
        home.map(|h| h.join(file).display().to_string())
            .unwrap_or_else(|| format!("~/{file}"))
    };

    match shell_name {
        "zsh" => (rc(".zshrc"), export_line(target_dir)),
        "bash" => (rc(".bashrc"), export_line(target_dir)),
        "fish" => (
            rc(".config/fish/config.fish"),
            format!("fish_add_path {}", target_dir.display()),
        ),
        _ => (rc(".profile"), export_line(target_dir)),
    }
}

fn export_line(target_dir: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", target_dir.display())
}

fn path_advice(target_dir: &Path, shell: Option<&str>, home: Option<&Path>) -> String {
    let (rc_file, line) = shell_config_line(target_dir, shell, home);
    format!(
        "{} is not on your PATH. Add this line to {} and open a new shell:\n    {}",
        target_dir.display(),
        rc_file,
        line
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::file_operations::make_executable;
    use std::ffi::OsString;
    use std::fs;

    fn install_fake(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        let bin = dir.join(BINARY_NAME);
        fs::write(&bin, b"#!/bin/sh\n").unwrap();
        make_executable(&bin).unwrap();
    }

    #[test]
    fn resolvable_binary_needs_no_advice() {
        let scratch = tempfile::tempdir().unwrap();
        let bin_dir = scratch.path().join("bin");
        install_fake(&bin_dir);
        let path_var = env::join_paths([bin_dir.clone()]).unwrap();

        let report = verify(&bin_dir, Some(&path_var), Some("/bin/zsh"), None);

        assert!(report.resolved.is_some());
        assert!(report.shadowed_by.is_none());
        assert!(report.advisory.is_none());
    }

    #[test]
    fn dir_off_path_gets_exact_export_line() {
        let scratch = tempfile::tempdir().unwrap();
        let bin_dir = scratch.path().join(".local/bin");
        install_fake(&bin_dir);
        let empty = scratch.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        let path_var = OsString::from(empty.as_os_str());

        let report = verify(&bin_dir, Some(&path_var), Some("/usr/bin/bash"), Some(scratch.path()));

        let advisory = report.advisory.expect("advisory");
        assert!(advisory.contains(".bashrc"));
        assert!(advisory.contains(&format!("export PATH=\"{}:$PATH\"", bin_dir.display())));
    }

    #[test]
    fn other_binary_earlier_on_path_is_reported_as_shadowing() {
        let scratch = tempfile::tempdir().unwrap();
        let old_dir = scratch.path().join("old");
        let new_dir = scratch.path().join("new");
        install_fake(&old_dir);
        install_fake(&new_dir);
        let path_var = env::join_paths([old_dir.clone(), new_dir.clone()]).unwrap();

        let report = verify(&new_dir, Some(&path_var), None, None);

        let shadow = report.shadowed_by.expect("shadowing binary").canonicalize().unwrap();
        assert_eq!(shadow, old_dir.join(BINARY_NAME).canonicalize().unwrap());
        assert!(report.advisory.is_none());
    }

    #[test]
    fn shell_specific_config_lines() {
        let dir = Path::new("/home/ana/.local/bin");
        let home = Some(Path::new("/home/ana"));

        let (rc, line) = shell_config_line(dir, Some("/bin/zsh"), home);
        assert_eq!(rc, "/home/ana/.zshrc");
        assert_eq!(line, "export PATH=\"/home/ana/.local/bin:$PATH\"");

        let (rc, line) = shell_config_line(dir, Some("/usr/bin/fish"), home);
        assert_eq!(rc, "/home/ana/.config/fish/config.fish");
        assert_eq!(line, "fish_add_path /home/ana/.local/bin");

        let (rc, _) = shell_config_line(dir, None, home);
        assert_eq!(rc, "/home/ana/.profile");
    }
}
