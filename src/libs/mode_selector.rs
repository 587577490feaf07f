// Decides the install directory exactly once, before any network I/O.
// Forced modes never touch the prompter; interactive mode loops until the
// operator picks one of the two options or input ends.

use crate::libs::prompt::Prompter;
use crate::schemas::errors::{InstallerError, Result};
use crate::schemas::install::{GLOBAL_BIN_DIR, InstallKind, InstallMode, local_bin_dir};
use crate::{log_debug, log_warn};
use colored::Colorize;
use std::path::{Path, PathBuf};

const MODE_STAGE: &str = "Mode";

/// Resolves the install mode.
///
/// # Arguments
/// * `forced`: `Some(ForcedLocal | ForcedGlobal)` from `--local`/`--global`.
/// * `home`: the operator's home directory, needed only for the local target.
/// * `prompter`: consulted only when `forced` is `None`.
///
/// # Errors
/// * `InstallDirUnavailable` when the local target is chosen but no home
///   directory is known.
/// * `InstallationCancelled` when input ends (or the terminal cannot be
///   read) before a valid choice is made.
pub fn select(
    forced: Option<InstallKind>,
    home: Option<&Path>,
    prompter: &mut dyn Prompter,
) -> Result<InstallMode> {
    let (kind, target) = match forced {
        Some(InstallKind::ForcedLocal) => (InstallKind::ForcedLocal, Target::Local),
        Some(InstallKind::ForcedGlobal) => (InstallKind::ForcedGlobal, Target::Global),
        Some(InstallKind::Interactive) | None => {
            (InstallKind::Interactive, prompt_for_target(home, prompter)?)
        }
    };

    let target_dir = match target {
        Target::Local => local_target(home)?,
        Target::Global => PathBuf::from(GLOBAL_BIN_DIR),
    };

    log_debug!("[Mode] {:?} -> {}", kind, target_dir.display().to_string().cyan());
    Ok(InstallMode { kind, target_dir })
}

/// The two places tengok can go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Local,
    Global,
}

fn local_target(home: Option<&Path>) -> Result<PathBuf> {
    match home {
        Some(home) => Ok(local_bin_dir(home)),
        None => Err(InstallerError::InstallDirUnavailable {
            path: PathBuf::from("~/.local/bin"),
            reason: "the home directory could not be determined".to_string(),
        }),
    }
}

/// Shows the two-option menu and loops until a valid selector is entered.
fn prompt_for_target(home: Option<&Path>, prompter: &mut dyn Prompter) -> Result<Target> {
    let local_label = home
        .map(|h| local_bin_dir(h).display().to_string())
        .unwrap_or_else(|| "~/.local/bin".to_string());

    let menu = format!(
        "Where should tengok be installed?\n  1) only for you   ({})\n  2) system-wide    ({}, requires sudo)",
        local_label, GLOBAL_BIN_DIR
    );
    prompter.say(&menu).map_err(terminal_unavailable)?;

    loop {
        let answer = prompter
            .ask(&format!("{} ", "Choose [1/2]:".bold()))
            .map_err(terminal_unavailable)?;

        match answer.as_deref().map(str::trim) {
            None => return Err(InstallerError::cancelled(MODE_STAGE, "input ended before an install location was chosen")),
            Some("1") => return Ok(Target::Local),
            Some("2") => return Ok(Target::Global),
            Some(other) => {
                log_warn!("[Mode] '{}' is not a valid choice, enter 1 or 2", other);
            }
        }
    }
}

fn terminal_unavailable(err: std::io::Error) -> InstallerError {
    InstallerError::cancelled(MODE_STAGE, format!(
        "{err} (pass --local or --global to install without prompting)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::prompt::ScriptedPrompter;

    const HOME: &str = "/home/ana";

    #[test]
    fn forced_modes_never_prompt() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let global = select(Some(InstallKind::ForcedGlobal), Some(Path::new(HOME)), &mut prompter).unwrap();
        assert_eq!(global.target_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(global.kind, InstallKind::ForcedGlobal);

        let local = select(Some(InstallKind::ForcedLocal), Some(Path::new(HOME)), &mut prompter).unwrap();
        assert_eq!(local.target_dir, PathBuf::from("/home/ana/.local/bin"));

        assert!(prompter.questions.is_empty());
        assert!(prompter.messages.is_empty());
    }

    #[test]
    fn interactive_option_one_is_local() {
        let mut prompter = ScriptedPrompter::new(["1"]);
        let mode = select(None, Some(Path::new(HOME)), &mut prompter).unwrap();
        assert_eq!(mode.kind, InstallKind::Interactive);
        assert_eq!(mode.target_dir, PathBuf::from("/home/ana/.local/bin"));
        assert!(prompter.messages[0].contains("only for you"));
        assert!(prompter.messages[0].contains("system-wide"));
    }

    #[test]
    fn interactive_reprompts_until_valid() {
        let mut prompter = ScriptedPrompter::new(["", "3", "yes", " 2 "]);
        let mode = select(None, Some(Path::new(HOME)), &mut prompter).unwrap();
        assert_eq!(mode.target_dir, PathBuf::from("/usr/local/bin"));
        assert_eq!(prompter.questions.len(), 4);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut prompter = ScriptedPrompter::new(["x"]);
        let err = select(None, Some(Path::new(HOME)), &mut prompter).unwrap_err();
        assert!(matches!(err, InstallerError::InstallationCancelled { .. }));
        assert_eq!(err.stage(), "Mode");
    }

    #[test]
    fn local_without_home_is_unavailable() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let err = select(Some(InstallKind::ForcedLocal), None, &mut prompter).unwrap_err();
        assert!(matches!(err, InstallerError::InstallDirUnavailable { .. }));
    }
}
