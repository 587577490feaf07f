use crate::schemas::config::{DEFAULT_RELEASES_HOST, DEFAULT_REPOSITORY, InstallerConfig};
use crate::schemas::errors::{InstallerError, Result};
use crate::schemas::install::InstallKind;
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};

/// Defines the command-line interface of the tengok installer.
/// Every flag is optional and they can be combined freely.
#[derive(Parser, Debug)]
#[command(name = "tengok-install", version)]
#[command(about = "Download the tengok binary for this machine and install it", long_about = None)]
pub struct Cli {
    /// Install system-wide into /usr/local/bin (uses sudo), skipping the prompt.
    #[arg(long, overrides_with = "local")]
    pub global: bool,

    /// Install for the current user into ~/.local/bin, skipping the prompt.
    #[arg(long, overrides_with = "global")]
    pub local: bool,

    /// Replace an existing tengok without asking for confirmation.
    #[arg(long)]
    pub force: bool,

    /// Release tag to install (e.g. v0.1.1). Unset or "latest" installs the latest release.
    #[arg(long, env = "TENGOK_VERSION", value_name = "TAG")]
    pub tag: Option<String>,

    /// Repository publishing the release assets.
    #[arg(long, env = "TENGOK_REPOSITORY", default_value = DEFAULT_REPOSITORY, hide = true)]
    pub repository: String,

    /// Release-hosting service the repository lives on.
    #[arg(long, env = "TENGOK_RELEASES_HOST", default_value = DEFAULT_RELEASES_HOST, hide = true)]
    pub releases_host: String,

    /// Enables detailed debug output for troubleshooting.
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// The install kind forced by `--global`/`--local`, if any.
    /// When both are passed the one given last wins.
    pub fn forced_mode(&self) -> Option<InstallKind> {
        match (self.global, self.local) {
            (true, _) => Some(InstallKind::ForcedGlobal),
            (_, true) => Some(InstallKind::ForcedLocal),
            _ => None,
        }
    }

    /// Validates the parsed arguments into the immutable run configuration.
    pub fn to_config(&self) -> Result<InstallerConfig> {
        InstallerConfig::new(
            self.forced_mode(),
            self.force,
            self.tag.as_deref(),
            &self.releases_host,
            &self.repository,
        )
    }
}

/// Translates a clap parse failure into the installer's error taxonomy.
///
/// Returns `None` for the `--help`/`--version` "errors", which clap should
/// print and exit on itself.
pub fn option_error(err: &clap::Error) -> Option<InstallerError> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => None,
        _ => {
            let option = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(arg)) => arg.clone(),
                _ => err
                    .to_string()
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("error: ")
                    .to_string(),
            };
            Some(InstallerError::UnknownOption { option })
        }
    }
}
