//! Lenient version parsing for release tags.
//!
//! Release tags have historically been published as float-like strings
//! (`v2.5`, `2.51`) as well as full semver (`2.5.0`). Everything is normalised
//! to [`semver::Version`] before comparing.

use semver::Version;

use crate::error::{Error, Result};

/// Parse a release tag or version string into a semver version.
///
/// Accepts an optional leading `v`, and pads missing minor/patch components
/// with zeroes.
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    if let Ok(version) = Version::parse(stripped) {
        return Ok(version);
    }

    let parts: Vec<&str> = stripped.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
        return Err(Error::Manifest(format!("unrecognised version \"{raw}\"")));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| Error::Manifest(format!("unrecognised version \"{raw}\"")))?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Version of the running build.
pub fn current_version() -> Version {
    // CARGO_PKG_VERSION is always valid semver
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}

/// True when `remote` should be offered as an update over `local`.
pub fn is_newer(remote: &Version, local: &Version) -> bool {
    remote > local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_semver() {
        assert_eq!(parse_version("2.5.0").unwrap(), Version::new(2, 5, 0));
        assert_eq!(parse_version("v2.5.1").unwrap(), Version::new(2, 5, 1));
    }

    #[test]
    fn pads_float_style_tags() {
        assert_eq!(parse_version("v2.5").unwrap(), Version::new(2, 5, 0));
        assert_eq!(parse_version("3").unwrap(), Version::new(3, 0, 0));
        assert_eq!(parse_version(" 2.51 ").unwrap(), Version::new(2, 51, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_version("").is_err());
        assert!(parse_version("nightly").is_err());
        assert!(parse_version("1..2").is_err());
        assert!(parse_version("1.2.3.4").is_err());
    }

    #[test]
    fn newer_is_strict() {
        let local = Version::new(2, 0, 0);
        assert!(is_newer(&Version::new(2, 5, 0), &local));
        assert!(!is_newer(&Version::new(2, 0, 0), &local));
        assert!(!is_newer(&Version::new(1, 9, 9), &local));
    }
}
