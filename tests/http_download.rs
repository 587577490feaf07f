// Exercises the real ureq-backed client against a local mock release host.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use mockito::{Matcher, Server};
use tengok_installer::commands::install::{InstallContext, run_pipeline};
use tengok_installer::libs::downloader::{HttpReleaseClient, ReleaseClient};
use tengok_installer::libs::elevation::{Elevation, ElevationError};
use tengok_installer::libs::platform_detector::HostIdentifiers;
use tengok_installer::libs::prompt::ScriptedPrompter;
use tengok_installer::schemas::config::InstallerConfig;
use tengok_installer::schemas::errors::InstallerError;
use tengok_installer::schemas::install::InstallKind;

struct Unprivileged;

impl Elevation for Unprivileged {
    fn authorize(&mut self) -> Result<(), ElevationError> {
        Err(ElevationError::Denied("tests never elevate".into()))
    }
    fn create_dir_all(&mut self, _dir: &Path) -> Result<(), ElevationError> {
        Err(ElevationError::Denied("tests never elevate".into()))
    }
    fn move_file(&mut self, _from: &Path, _to: &Path) -> Result<(), ElevationError> {
        Err(ElevationError::Denied("tests never elevate".into()))
    }
}

#[test]
fn client_streams_a_successful_body() {
    let mut server = Server::new();
    let asset = server
        .mock("GET", "/asset")
        .match_header("user-agent", Matcher::Regex("^tengok-installer/".to_string()))
        .with_status(200)
        .with_body("payload")
        .expect(1)
        .create();
    let mut sink = Vec::new();

    let bytes = HttpReleaseClient::new().fetch(&format!("{}/asset", server.url()), &mut sink).unwrap();

    assert_eq!(bytes, 7);
    assert_eq!(sink, b"payload");
    asset.assert();
}

#[test]
fn client_reports_http_status_failures() {
    let mut server = Server::new();
    let _missing = server.mock("GET", "/asset").with_status(404).with_body("missing").create();
    let mut sink = Vec::new();

    let err = HttpReleaseClient::new().fetch(&format!("{}/asset", server.url()), &mut sink).unwrap_err();

    assert!(err.to_string().contains("404"), "{err}");
    assert!(sink.is_empty());
}

#[test]
fn pipeline_requests_the_release_path_over_http() {
    let mut server = Server::new();
    let release = server
        .mock("GET", "/tengok-cli/tengok/releases/download/v0.1.1/tengok-linux-x86_64")
        .with_status(200)
        .with_header("content-type", "application/octet-stream")
        .with_body(b"\x7fELF over the wire")
        .expect(1)
        .create();
    let base = server.url();
    let scratch = tempfile::tempdir().unwrap();
    let home = scratch.path().join("home");
    let staging_root = scratch.path().join("tmp");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&staging_root).unwrap();

    let config = InstallerConfig::new(Some(InstallKind::ForcedLocal), false, Some("v0.1.1"), &base, "tengok-cli/tengok")
        .unwrap();
    let client = HttpReleaseClient::new();
    let mut prompter = ScriptedPrompter::default();
    let mut elevation = Unprivileged;

    let outcome = run_pipeline(InstallContext {
        config,
        host: HostIdentifiers { kernel: "Linux".into(), machine: "x86_64".into() },
        home: Some(home.clone()),
        staging_root: staging_root.clone(),
        path_var: Some(OsString::from(home.join(".local/bin").as_os_str())),
        shell: None,
        client: &client,
        prompter: &mut prompter,
        elevation: &mut elevation,
    })
    .unwrap();

    release.assert();
    assert_eq!(fs::read(&outcome.target_path).unwrap(), b"\x7fELF over the wire");
    assert!(outcome.path_warning.is_none());
    assert!(fs::read_dir(&staging_root).unwrap().next().is_none());
}

#[test]
fn pipeline_turns_http_errors_into_download_failed() {
    let mut server = Server::new();
    let failing = server
        .mock("GET", "/tengok-cli/tengok/releases/latest/download/tengok-macos-x86_64")
        .with_status(500)
        .expect(1)
        .create();
    let base = server.url();
    let scratch = tempfile::tempdir().unwrap();
    let staging_root = scratch.path().join("tmp");
    fs::create_dir_all(&staging_root).unwrap();

    let config = InstallerConfig::new(Some(InstallKind::ForcedLocal), false, None, &base, "tengok-cli/tengok").unwrap();
    let client = HttpReleaseClient::new();
    let mut prompter = ScriptedPrompter::default();
    let mut elevation = Unprivileged;

    let err = run_pipeline(InstallContext {
        config,
        host: HostIdentifiers { kernel: "Darwin".into(), machine: "x86_64".into() },
        home: Some(scratch.path().to_path_buf()),
        staging_root: staging_root.clone(),
        path_var: None,
        shell: None,
        client: &client,
        prompter: &mut prompter,
        elevation: &mut elevation,
    })
    .unwrap_err();

    assert!(matches!(err, InstallerError::DownloadFailed { ref asset, .. } if asset == "tengok-macos-x86_64"));
    failing.assert();
    assert!(fs::read_dir(&staging_root).unwrap().next().is_none());
}
