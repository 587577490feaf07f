//! Run configuration, built once from the parsed command line and environment.

use crate::schemas::errors::Result;
use crate::schemas::install::InstallKind;
use crate::schemas::release::VersionSelector;

/// Repository whose releases carry the tengok assets.
pub const DEFAULT_REPOSITORY: &str = "tengok-cli/tengok";

/// Release-hosting service.
pub const DEFAULT_RELEASES_HOST: &str = "https://github.com";

/// Immutable settings for one installer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// `Some` when `--global`/`--local` skips the interactive prompt.
    pub forced_mode: Option<InstallKind>,
    /// `--force`: replace an existing tengok without asking.
    pub force: bool,
    pub version: VersionSelector,
    pub releases_host: String,
    pub repository: String,
}

impl InstallerConfig {
    /// Validates the raw option values and assembles the config.
    pub fn new(
        forced_mode: Option<InstallKind>,
        force: bool,
        version_pin: Option<&str>,
        releases_host: &str,
        repository: &str,
    ) -> Result<Self> {
        Ok(Self {
            forced_mode,
            force,
            version: VersionSelector::from_pin(version_pin)?,
            releases_host: releases_host.trim_end_matches('/').to_string(),
            repository: repository.trim_matches('/').to_string(),
        })
    }

    /// `<host>/<repo>/releases`
    pub fn releases_base_url(&self) -> String {
        format!("{}/{}/releases", self.releases_host, self.repository)
    }
}
