use crate::error::{VertagusError, Result};
use std::cmp::Ordering;

/// Parse a version string as a semantic version.
///
/// Accepts a leading `v`/`V` and short release forms (`1`, `1.2`), which are
/// padded with zero components before handing off to `semver`.
pub fn parse(text: &str) -> Result<semver::Version> {
    let clean = text.trim().trim_start_matches('v').trim_start_matches('V');

    if let Ok(version) = semver::Version::parse(clean) {
        return Ok(version);
    }

    let split_at = clean.find(['-', '+']).unwrap_or(clean.len());
    let (core, suffix) = clean.split_at(split_at);
    let components = core.split('.').count();
    if components == 0 || components >= 3 {
        return Err(VertagusError::version(format!(
            "Invalid version format: '{}'",
            text
        )));
    }

    let padded = format!("{}{}{}", core, ".0".repeat(3 - components), suffix);
    semver::Version::parse(&padded)
        .map_err(|e| VertagusError::version(format!("Invalid version '{}': {}", text, e)))
}

/// Compare two versions by semantic-versioning precedence.
///
/// Build metadata does not participate, unlike `semver::Version`'s `Ord`.
pub fn cmp_precedence(a: &semver::Version, b: &semver::Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Release segments of a version, without prefix or pre-release/build suffix.
///
/// `"v2.5.1-rc1"` -> `["2", "5", "1"]`
pub fn release_segments(text: &str) -> Vec<&str> {
    let clean = text.trim().trim_start_matches('v').trim_start_matches('V');
    let core = clean.split(['-', '+']).next().unwrap_or_default();
    core.split('.').filter(|s| !s.is_empty()).collect()
}
