// Release-side data: which release to fetch and the concrete asset to download.

use crate::schemas::errors::{InstallerError, Result};
use std::fmt;

/// Selects the release whose assets are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    /// Whatever the hosting service currently marks as the latest release.
    Latest,
    /// A specific release tag, used verbatim (e.g. `v0.1.1`).
    Pinned(String),
}

impl VersionSelector {
    /// Builds a selector from the externally supplied version pin.
    ///
    /// `None`, an empty value and `latest` (any case) select [`VersionSelector::Latest`];
    /// anything else must be a single path-safe token and is pinned verbatim.
    pub fn from_pin(pin: Option<&str>) -> Result<Self> {
        let raw = match pin.map(str::trim) {
            None | Some("") => return Ok(VersionSelector::Latest),
            Some(raw) if raw.eq_ignore_ascii_case("latest") => return Ok(VersionSelector::Latest),
            Some(raw) => raw,
        };

        let malformed = raw
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#'))
            || raw == "."
            || raw == "..";
        if malformed {
            return Err(InstallerError::InvalidVersion {
                tag: raw.to_string(),
            });
        }

        Ok(VersionSelector::Pinned(raw.to_string()))
    }

    /// The release path segment for this selector:
    /// `latest/download` or `download/<tag>`.
    pub fn release_path(&self) -> String {
        match self {
            VersionSelector::Latest => "latest/download".to_string(),
            VersionSelector::Pinned(tag) => format!("download/{tag}"),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Pinned(tag) => f.write_str(tag),
        }
    }
}

/// The one asset fetched per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    /// e.g. `tengok-linux-x86_64`
    pub name: String,
    /// Fully-qualified download URL.
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_empty_and_latest_select_latest() {
        assert_eq!(VersionSelector::from_pin(None).unwrap(), VersionSelector::Latest);
        assert_eq!(VersionSelector::from_pin(Some("")).unwrap(), VersionSelector::Latest);
        assert_eq!(VersionSelector::from_pin(Some("latest")).unwrap(), VersionSelector::Latest);
        assert_eq!(VersionSelector::from_pin(Some("LATEST")).unwrap(), VersionSelector::Latest);
    }

    #[test]
    fn pinned_tag_is_used_verbatim() {
        let selector = VersionSelector::from_pin(Some("v0.1.1")).unwrap();
        assert_eq!(selector, VersionSelector::Pinned("v0.1.1".to_string()));
        assert_eq!(selector.release_path(), "download/v0.1.1");
        assert_eq!(VersionSelector::Latest.release_path(), "latest/download");
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for bad in ["v1 .0", "../v1", "v1/evil", "v1?x=1", "v1#frag", ".."] {
            let err = VersionSelector::from_pin(Some(bad)).unwrap_err();
            assert!(matches!(err, InstallerError::InvalidVersion { .. }), "{bad}");
        }
    }
}
