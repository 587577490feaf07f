// Fetches the release asset into a scoped staging directory.
//
// One GET, no retries: re-running the installer is the recovery path.
// Every error return drops the partially built `StagingArtifact`, which
// removes the staging directory with it.

use crate::libs::file_operations::make_executable;
use crate::libs::staging::StagingArtifact;
use crate::schemas::errors::{InstallerError, Result};
use crate::schemas::release::AssetDescriptor;
use crate::{log_debug, log_info};
use colored::Colorize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Transport for the release asset.
pub trait ReleaseClient {
    /// Streams the body of `url` into `sink`, returning the number of bytes written.
    /// Transport failures and non-success HTTP statuses are both errors.
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> io::Result<u64>;
}

/// `ureq`-backed client used for real runs.
pub struct HttpReleaseClient {
    agent: ureq::Agent,
}

impl HttpReleaseClient {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("tengok-installer/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpReleaseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseClient for HttpReleaseClient {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> io::Result<u64> {
        log_debug!("[Download] GET {}", url.blue());

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                return Err(io::Error::other(format!(
                    "HTTP {} {} from {}",
                    code,
                    response.status_text(),
                    url
                )));
            }
            Err(e) => return Err(io::Error::other(format!("request to {url} failed: {e}"))),
        };

        let mut reader = response.into_reader();
        io::copy(&mut reader, sink)
    }
}

/// Downloads `asset` into a fresh staging directory below `staging_root`.
///
/// # Errors
/// `DownloadFailed` (carrying the asset name) when the staging directory
/// cannot be created, the fetch fails, the body is empty, or the file
/// cannot be marked executable.
pub fn download_in(
    staging_root: &Path,
    asset: &AssetDescriptor,
    client: &dyn ReleaseClient,
) -> Result<StagingArtifact> {
    let failed = |reason: String| InstallerError::DownloadFailed {
        asset: asset.name.clone(),
        reason,
    };

    let staging = StagingArtifact::create_in(staging_root, &asset.name)
        .map_err(|e| failed(format!("cannot create staging directory: {e}")))?;

    log_info!("[Download] Fetching {}", asset.name.bold());
    let bytes = {
        let mut file = File::create(staging.binary_path())
            .map_err(|e| failed(format!("cannot create {}: {e}", staging.binary_path().display())))?;
        let bytes = client.fetch(&asset.url, &mut file).map_err(|e| failed(e.to_string()))?;
        file.sync_all().map_err(|e| failed(format!("cannot flush download: {e}")))?;
        bytes
    };

    if bytes == 0 {
        return Err(failed(format!("{} returned an empty body", asset.url)));
    }

    make_executable(staging.binary_path())
        .map_err(|e| failed(format!("cannot mark download executable: {e}")))?;

    log_debug!("[Download] {} bytes staged at {}", bytes, staging.binary_path().display());
    Ok(staging)
}
