// Resolves which release asset to fetch. Pure: no I/O, no failure modes.
// Malformed pins never get this far; `VersionSelector::from_pin` rejects them.

use crate::log_debug;
use crate::schemas::install::BINARY_NAME;
use crate::schemas::platform::HostPlatform;
use crate::schemas::release::{AssetDescriptor, VersionSelector};
use colored::Colorize;

/// Asset name for a platform: `tengok-<os>-<arch>`, a bare executable.
pub fn asset_name(platform: &HostPlatform) -> String {
    format!(
        "{}-{}-{}",
        BINARY_NAME,
        platform.os.token(),
        platform.arch.token()
    )
}

/// Builds the asset descriptor for `platform` and `version`.
///
/// # Arguments
/// * `releases_base_url`: `<host>/<repo>/releases`, without a trailing slash.
///
/// # Returns
/// `<base>/latest/download/<asset>` or `<base>/download/<tag>/<asset>`.
pub fn resolve(
    platform: &HostPlatform,
    version: &VersionSelector,
    releases_base_url: &str,
) -> AssetDescriptor {
    let name = asset_name(platform);
    let url = format!(
        "{}/{}/{}",
        releases_base_url.trim_end_matches('/'),
        version.release_path(),
        name
    );
    log_debug!("[Asset] {} ({}) -> {}", name.bold(), version, url.blue());

    AssetDescriptor { name, url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::platform::{Arch, Os};

    const BASE: &str = "https://github.com/tengok-cli/tengok/releases";

    #[test]
    fn latest_linux_x86_64() {
        let platform = HostPlatform { os: Os::Linux, arch: Arch::X86_64 };
        let asset = resolve(&platform, &VersionSelector::Latest, BASE);
        assert_eq!(asset.name, "tengok-linux-x86_64");
        assert_eq!(
            asset.url,
            "https://github.com/tengok-cli/tengok/releases/latest/download/tengok-linux-x86_64"
        );
    }

    #[test]
    fn pinned_macos_arm64() {
        let platform = HostPlatform { os: Os::Macos, arch: Arch::Arm64 };
        let asset = resolve(&platform, &VersionSelector::Pinned("v0.1.1".into()), BASE);
        assert_eq!(asset.name, "tengok-macos-arm64");
        assert_eq!(
            asset.url,
            "https://github.com/tengok-cli/tengok/releases/download/v0.1.1/tengok-macos-arm64"
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let platform = HostPlatform { os: Os::Linux, arch: Arch::Arm64 };
        let version = VersionSelector::Pinned("v2.0.0".into());
        assert_eq!(resolve(&platform, &version, BASE), resolve(&platform, &version, BASE));
    }
}
