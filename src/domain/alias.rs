use std::fmt;
use std::str::FromStr;

use crate::domain::version::release_segments;
use crate::error::VertagusError;

/// Naming strategy for a floating alias tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alias {
    /// `"{prefix}{major}"`, e.g. `v2`
    Major,
    /// `"{prefix}{major}.{minor}"`, e.g. `v2.5`
    Minor,
    /// A fixed name independent of the version, e.g. `stable`
    Fixed(String),
}

impl Alias {
    /// Build the alias tag name for `version`.
    pub fn create_alias(&self, version: &str, prefix: Option<&str>) -> String {
        let prefix = prefix.unwrap_or_default();
        match self {
            Alias::Major => format!("{}{}", prefix, leading_segments(version, 1)),
            Alias::Minor => format!("{}{}", prefix, leading_segments(version, 2)),
            Alias::Fixed(text) => format!("{}{}", prefix, text),
        }
    }
}

fn leading_segments(version: &str, count: usize) -> String {
    release_segments(version)
        .into_iter()
        .take(count)
        .collect::<Vec<_>>()
        .join(".")
}

impl FromStr for Alias {
    type Err = VertagusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(Alias::Major),
            "minor" => Ok(Alias::Minor),
            _ => match s.strip_prefix("string:") {
                Some(text) if !text.is_empty() => Ok(Alias::Fixed(text.to_string())),
                _ => Err(VertagusError::config(format!("Unknown alias strategy: '{}'", s))),
            },
        }
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alias::Major => write!(f, "major"),
            Alias::Minor => write!(f, "minor"),
            Alias::Fixed(text) => write!(f, "string:{}", text),
        }
    }
}

/// Normalize an alias prefix received from the command line.
///
/// Older callers pass the literal text `"None"` when no prefix is wanted.
pub fn legacy_prefix(raw: Option<&str>) -> Option<&str> {
    raw.filter(|prefix| *prefix != "None")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_major_minor() {
        assert_eq!(Alias::Major.create_alias("2.5.1", None), "2");
        assert_eq!(Alias::Minor.create_alias("2.5.1", None), "2.5");
    }

    #[test]
    fn test_prefix_is_prepended() {
        assert_eq!(Alias::Major.create_alias("2.5.1", Some("v")), "v2");
        assert_eq!(Alias::Minor.create_alias("2.5.1", Some("release-")), "release-2.5");
    }

    #[test]
    fn test_prerelease_suffix_dropped() {
        assert_eq!(Alias::Minor.create_alias("1.4.0-rc2", None), "1.4");
    }

    #[test]
    fn test_fixed_alias() {
        let alias: Alias = "string:stable".parse().unwrap();
        assert_eq!(alias, Alias::Fixed("stable".to_string()));
        assert_eq!(alias.create_alias("9.9.9", Some("v")), "vstable");
    }

    #[test]
    fn test_parse_round_trip_names() {
        for name in ["major", "minor", "string:latest"] {
            let alias: Alias = name.parse().unwrap();
            assert_eq!(alias.to_string(), name);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!("patch".parse::<Alias>().is_err());
        assert!("string:".parse::<Alias>().is_err());
    }

    #[test]
    fn test_legacy_prefix() {
        assert_eq!(legacy_prefix(Some("None")), None);
        assert_eq!(legacy_prefix(Some("v")), Some("v"));
        assert_eq!(legacy_prefix(None), None);
        assert_eq!(Alias::Major.create_alias("3.0.0", legacy_prefix(Some("None"))), "3");
    }
}
