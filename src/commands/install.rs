// The installer pipeline: platform detection, asset resolution, mode
// selection, download, install and PATH verification, strictly in that
// order and stopping at the first error.

use crate::cli::cmd_enums::Cli;
use crate::libs::downloader::{HttpReleaseClient, ReleaseClient, download_in};
use crate::libs::elevation::{Elevation, SudoElevation};
use crate::libs::install_executor::{InstallOptions, install};
use crate::libs::path_verifier::verify;
use crate::libs::platform_detector::{HostIdentifiers, detect, host_identifiers};
use crate::libs::prompt::{Prompter, TerminalPrompter};
use crate::libs::staging::install_interrupt_cleanup;
use crate::libs::{asset_resolver, mode_selector};
use crate::schemas::config::InstallerConfig;
use crate::schemas::errors::Result;
use crate::schemas::install::{InstallOutcome, is_protected_dir};
use crate::{log_debug, log_info, log_warn};
use colored::Colorize;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Everything one run needs, passed explicitly from stage to stage.
pub struct InstallContext<'a> {
    pub config: InstallerConfig,
    /// Raw kernel name and machine architecture of the host.
    pub host: HostIdentifiers,
    pub home: Option<PathBuf>,
    /// Parent of the per-run staging directory.
    pub staging_root: PathBuf,
    /// `PATH` as seen by the operator's shell.
    pub path_var: Option<OsString>,
    /// `SHELL`, used to pick the startup file named in the PATH advisory.
    pub shell: Option<String>,
    pub client: &'a dyn ReleaseClient,
    pub prompter: &'a mut dyn Prompter,
    pub elevation: &'a mut dyn Elevation,
}

/// Entry point for a real run: wires the terminal, network and sudo into the pipeline.
pub fn run(cli: &Cli) -> Result<InstallOutcome> {
    let config = cli.to_config()?;
    log_debug!("[Config] {:?}", config);

    install_interrupt_cleanup();

    let client = HttpReleaseClient::new();
    let mut prompter = TerminalPrompter::new();
    let mut elevation = SudoElevation::new();

    let outcome = run_pipeline(InstallContext {
        config,
        host: host_identifiers(),
        home: dirs::home_dir(),
        staging_root: env::temp_dir(),
        path_var: env::var_os("PATH"),
        shell: env::var("SHELL").ok(),
        client: &client,
        prompter: &mut prompter,
        elevation: &mut elevation,
    })?;

    print_summary(&outcome);
    Ok(outcome)
}

/// Runs the six stages in order.
///
/// The staging directory created by the download stage is dropped (and so
/// removed) before this function returns, whichever way it returns.
pub fn run_pipeline(ctx: InstallContext<'_>) -> Result<InstallOutcome> {
    let InstallContext {
        config,
        host,
        home,
        staging_root,
        path_var,
        shell,
        client,
        prompter,
        elevation,
    } = ctx;

    // 1. Platform
    let platform = detect(&host)?;
    log_info!("[Platform] Detected {}", platform.to_string().cyan());

    // 2. Asset
    let asset = asset_resolver::resolve(&platform, &config.version, &config.releases_base_url());
    log_info!("[Asset] Using {} ({})", asset.name.bold(), config.version);

    // 3. Mode: decided before any network I/O.
    let mode = mode_selector::select(config.forced_mode, home.as_deref(), prompter)?;
    log_info!("[Mode] Installing into {}", mode.target_dir.display().to_string().cyan());

    // 4. Download
    let staging = download_in(&staging_root, &asset, client)?;

    // 5. Install
    let options = InstallOptions {
        force: config.force,
        protected: is_protected_dir(&mode.target_dir),
    };
    let report = install(staging.binary_path(), &mode.target_dir, options, prompter, elevation)?;
    drop(staging);

    // 6. Verify
    let path_report = verify(
        &mode.target_dir,
        path_var.as_deref(),
        shell.as_deref(),
        home.as_deref(),
    );
    if let Some(other) = &path_report.shadowed_by {
        log_warn!(
            "[Verify] `tengok` currently resolves to {}, which comes before {} on your PATH",
            other.display().to_string().yellow(),
            report.target_path.display()
        );
    }
    if let Some(advice) = &path_report.advisory {
        log_warn!("[Verify] {}", advice);
    }

    Ok(InstallOutcome {
        target_path: report.target_path,
        overwritten: report.overwritten,
        path_warning: path_report.advisory,
    })
}

/// Success messages printed after a completed run.
pub fn print_summary(outcome: &InstallOutcome) {
    let verb = if outcome.overwritten { "updated" } else { "installed" };
    log_info!(
        "tengok {} at {}",
        verb.bold().green(),
        outcome.target_path.display().to_string().green()
    );
    log_info!("Run {} to get started", "tengok --help".bold());
}
