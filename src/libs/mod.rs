// The installer pipeline stages and the helpers they share.
//
// Stage order: platform_detector -> asset_resolver -> mode_selector ->
// downloader -> install_executor -> path_verifier.

pub mod asset_resolver;
pub mod downloader;
pub mod elevation;
pub mod file_operations;
pub mod install_executor;
pub mod mode_selector;
pub mod path_verifier;
pub mod platform_detector;
pub mod prompt;
pub mod staging;
