//! Version rules - stateless predicates over version strings.
//!
//! Two kinds exist:
//!
//! - [CurrentVersionRule] checks the single current version (format rules).
//! - [ComparisonRule] checks an ordered list of versions. Used as an
//!   increment rule it receives `[previous, current]`; bound to a set of
//!   manifest names it receives the versions of those manifests.

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use tracing::warn;

use crate::domain::version;
use crate::error::{VertagusError, Result};

#[derive(Debug, Clone)]
enum VersionCheck {
    NotEmpty,
    Matches(Regex),
    DoesNotMatch(Regex),
}

/// Rule validating a single version string.
#[derive(Debug, Clone)]
pub struct CurrentVersionRule {
    name: String,
    check: VersionCheck,
}

impl CurrentVersionRule {
    /// Passes for any version that is not blank.
    pub fn not_empty() -> Self {
        CurrentVersionRule {
            name: "not_empty".to_string(),
            check: VersionCheck::NotEmpty,
        }
    }

    /// Passes when `pattern` matches at the start of the version.
    ///
    /// Only the start is anchored: `^\d+` accepts `"1.2.3"` as well as `"1abc"`.
    pub fn regex_match(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile_anchored(&name, pattern)?;
        Ok(CurrentVersionRule {
            name,
            check: VersionCheck::Matches(regex),
        })
    }

    /// Negation of [CurrentVersionRule::regex_match].
    pub fn regex_no_match(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = compile_anchored(&name, pattern)?;
        Ok(CurrentVersionRule {
            name,
            check: VersionCheck::DoesNotMatch(regex),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self, version: &str) -> bool {
        match &self.check {
            VersionCheck::NotEmpty => !version.trim().is_empty(),
            VersionCheck::Matches(regex) => regex.is_match(version),
            VersionCheck::DoesNotMatch(regex) => !regex.is_match(version),
        }
    }
}

impl fmt::Display for CurrentVersionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn compile_anchored(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})", pattern))
        .map_err(|e| VertagusError::invalid_rule(name, format!("bad pattern '{}': {}", pattern, e)))
}

/// How a [ComparisonRule] relates the versions it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Every version is strictly greater than the one before it.
    Increment,
    /// All versions are the same string.
    Equal,
    /// At least one version differs from the others.
    NotEqual,
}

impl Comparison {
    fn evaluate(self, versions: &[&str]) -> bool {
        match self {
            Comparison::Increment => versions.windows(2).all(|pair| is_increment(pair[0], pair[1])),
            Comparison::Equal => all_equal(versions),
            Comparison::NotEqual => !all_equal(versions),
        }
    }
}

fn all_equal(versions: &[&str]) -> bool {
    versions.windows(2).all(|pair| pair[0] == pair[1])
}

fn is_increment(old: &str, new: &str) -> bool {
    match (version::parse(old), version::parse(new)) {
        (Ok(old), Ok(new)) => version::cmp_precedence(&new, &old) == Ordering::Greater,
        (Err(e), _) | (_, Err(e)) => {
            warn!("Cannot compare versions {:?} and {:?}: {}", old, new, e);
            false
        }
    }
}

/// Rule validating an ordered list of versions.
///
/// A rule with bound manifest names is a manifest-comparison rule; it is
/// evaluated against the versions of those manifests instead of the
/// previous/current pair.
#[derive(Debug, Clone)]
pub struct ComparisonRule {
    name: String,
    comparison: Comparison,
    manifests: Option<Vec<String>>,
}

impl ComparisonRule {
    pub fn new(name: impl Into<String>, comparison: Comparison) -> Self {
        ComparisonRule {
            name: name.into(),
            comparison,
            manifests: None,
        }
    }

    pub fn increment() -> Self {
        Self::new("increment", Comparison::Increment)
    }

    pub fn equal() -> Self {
        Self::new("equal", Comparison::Equal)
    }

    pub fn not_equal() -> Self {
        Self::new("not_equal", Comparison::NotEqual)
    }

    pub fn manifests_equal<S: Into<String>>(manifests: impl IntoIterator<Item = S>) -> Self {
        Self::new("manifests_equal", Comparison::Equal).bound_to(manifests)
    }

    pub fn manifests_not_equal<S: Into<String>>(manifests: impl IntoIterator<Item = S>) -> Self {
        Self::new("manifests_not_equal", Comparison::NotEqual).bound_to(manifests)
    }

    /// Bind this rule to the named manifests.
    pub fn bound_to<S: Into<String>>(mut self, manifests: impl IntoIterator<Item = S>) -> Self {
        self.manifests = Some(manifests.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manifest names this rule applies to; empty for unbound rules.
    pub fn target_manifests(&self) -> &[String] {
        self.manifests.as_deref().unwrap_or_default()
    }

    pub fn is_manifest_bound(&self) -> bool {
        self.manifests.is_some()
    }

    pub fn validate(&self, versions: &[&str]) -> bool {
        self.comparison.evaluate(versions)
    }
}

impl fmt::Display for ComparisonRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.manifests {
            Some(manifests) => write!(f, "{}({})", self.name, manifests.join(", ")),
            None => write!(f, "{}", self.name),
        }
    }
}
