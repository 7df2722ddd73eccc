use std::collections::BTreeMap;
use std::fmt;

use crate::domain::rule::{Comparison, ComparisonRule, CurrentVersionRule};
use crate::error::{VertagusError, Result};

const MMP: &str = r"\d+\.\d+\.\d+$";

// Pre-release tags must be hyphenated so the same versions also parse for
// `increment`; PEP 440 spellings such as `1.2.3rc1` or `1.2.3.dev4` are not
// semver and are rejected here.
const DEV_MMP: &str = r"\d+\.\d+\.\d+-dev\.?\d*$";
const ALPHA_MMP: &str = r"\d+\.\d+\.\d+-(a|alpha)\.?\d*$";
const BETA_MMP: &str = r"\d+\.\d+\.\d+-(b|beta)\.?\d*$";
const RC_MMP: &str = r"\d+\.\d+\.\d+-rc\.?\d*$";

/// The three places a rule can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Current,
    Increment,
    ManifestComparison,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Current => write!(f, "current"),
            RuleKind::Increment => write!(f, "increment"),
            RuleKind::ManifestComparison => write!(f, "manifest comparison"),
        }
    }
}

/// Construction-time parameters handed to a rule factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleArgs<'a> {
    pub pattern: Option<&'a str>,
    pub manifests: &'a [String],
}

pub type CurrentRuleFactory = fn(&str, &RuleArgs) -> Result<CurrentVersionRule>;
pub type ComparisonRuleFactory = fn(&str, &RuleArgs) -> Result<ComparisonRule>;

/// Static mapping from rule name to constructor, one table per [RuleKind].
///
/// Built once at startup and passed by reference to whatever assembles
/// projects.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    current: BTreeMap<String, CurrentRuleFactory>,
    increment: BTreeMap<String, ComparisonRuleFactory>,
    manifest_comparison: BTreeMap<String, ComparisonRuleFactory>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in rule.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register_current("not_empty", |_, _| Ok(CurrentVersionRule::not_empty()));
        registry.register_current("regex_mmp", |name, _| CurrentVersionRule::regex_match(name, MMP));
        registry.register_current("regex_dev_mmp", |name, _| CurrentVersionRule::regex_match(name, DEV_MMP));
        registry.register_current("regex_alpha_mmp", |name, _| {
            CurrentVersionRule::regex_match(name, ALPHA_MMP)
        });
        registry.register_current("regex_beta_mmp", |name, _| CurrentVersionRule::regex_match(name, BETA_MMP));
        registry.register_current("regex_rc_mmp", |name, _| CurrentVersionRule::regex_match(name, RC_MMP));
        registry.register_current("regex_match", |name, args| {
            CurrentVersionRule::regex_match(name, required_pattern(name, args)?)
        });
        registry.register_current("regex_no_match", |name, args| {
            CurrentVersionRule::regex_no_match(name, required_pattern(name, args)?)
        });

        registry.register_increment("increment", |name, _| {
            Ok(ComparisonRule::new(name, Comparison::Increment))
        });
        registry.register_increment("equal", |name, _| Ok(ComparisonRule::new(name, Comparison::Equal)));
        registry.register_increment("not_equal", |name, _| {
            Ok(ComparisonRule::new(name, Comparison::NotEqual))
        });

        registry.register_manifest_comparison("manifests_equal", |name, args| {
            Ok(ComparisonRule::new(name, Comparison::Equal).bound_to(args.manifests.iter().cloned()))
        });
        registry.register_manifest_comparison("manifests_not_equal", |name, args| {
            Ok(ComparisonRule::new(name, Comparison::NotEqual)
                .bound_to(args.manifests.iter().cloned()))
        });

        registry
    }

    pub fn register_current(&mut self, name: impl Into<String>, factory: CurrentRuleFactory) {
        self.current.insert(name.into(), factory);
    }

    pub fn register_increment(&mut self, name: impl Into<String>, factory: ComparisonRuleFactory) {
        self.increment.insert(name.into(), factory);
    }

    pub fn register_manifest_comparison(
        &mut self,
        name: impl Into<String>,
        factory: ComparisonRuleFactory,
    ) {
        self.manifest_comparison.insert(name.into(), factory);
    }

    pub fn current(&self, name: &str, args: &RuleArgs) -> Result<CurrentVersionRule> {
        let factory = self
            .current
            .get(name)
            .ok_or_else(|| not_found(RuleKind::Current, name))?;
        factory(name, args)
    }

    pub fn increment(&self, name: &str, args: &RuleArgs) -> Result<ComparisonRule> {
        let factory = self
            .increment
            .get(name)
            .ok_or_else(|| not_found(RuleKind::Increment, name))?;
        factory(name, args)
    }

    pub fn manifest_comparison(&self, name: &str, args: &RuleArgs) -> Result<ComparisonRule> {
        let factory = self
            .manifest_comparison
            .get(name)
            .ok_or_else(|| not_found(RuleKind::ManifestComparison, name))?;
        factory(name, args)
    }

    /// Registered rule names of one kind, sorted.
    pub fn names(&self, kind: RuleKind) -> Vec<&str> {
        match kind {
            RuleKind::Current => self.current.keys().map(String::as_str).collect(),
            RuleKind::Increment => self.increment.keys().map(String::as_str).collect(),
            RuleKind::ManifestComparison => {
                self.manifest_comparison.keys().map(String::as_str).collect()
            }
        }
    }
}

fn not_found(kind: RuleKind, name: &str) -> VertagusError {
    VertagusError::RuleNotFound {
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

fn required_pattern<'a>(name: &str, args: &RuleArgs<'a>) -> Result<&'a str> {
    args.pattern
        .ok_or_else(|| VertagusError::invalid_rule(name, "a 'pattern' is required"))
}
