//! Command workflows
//!
//! Each command is a plain function over a [Project] and a [TagRepository],
//! kept apart from clap so it can be driven programmatically and tested
//! against [crate::git::MockRepository].

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::alias::legacy_prefix;
use crate::domain::Project;
use crate::error::Result;
use crate::git::TagRepository;

/// Previous version assumed when the backend holds no version tag yet.
pub const INITIAL_PREVIOUS_VERSION: &str = "0.0.0";

/// What the commands operate on.
pub struct CommandContext<'a> {
    pub project: &'a Project,
    pub repo: &'a dyn TagRepository,
    /// Prefix of version tags, e.g. `v`
    pub tag_prefix: Option<&'a str>,
}

/// Result of the validate workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub current_version: String,
    pub previous_version: String,
    pub passed: bool,
}

/// Effective rule names per phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleListing {
    pub current: Vec<String>,
    pub increment: Vec<String>,
    pub manifest_comparisons: Vec<String>,
}

/// Validate the current version.
///
/// The previous version is `previous` if given, otherwise the highest tag
/// carrying the tag prefix.
pub fn validate(
    ctx: &CommandContext,
    stage: Option<&str>,
    previous: Option<&str>,
) -> Result<ValidationOutcome> {
    let previous_version = match previous {
        Some(previous) => previous.to_string(),
        None => match ctx.repo.get_highest_version(ctx.tag_prefix)? {
            Some(highest) => highest,
            None => {
                warn!(
                    "No version tags found, comparing against {}",
                    INITIAL_PREVIOUS_VERSION
                );
                INITIAL_PREVIOUS_VERSION.to_string()
            }
        },
    };

    let current_version = ctx.project.get_version(stage)?;
    let passed = ctx.project.validate_version(&previous_version, stage)?;

    Ok(ValidationOutcome {
        current_version,
        previous_version,
        passed,
    })
}

/// Create the version tag for the current version and return its name.
pub fn create_tag(ctx: &CommandContext, stage: Option<&str>, reference: Option<&str>) -> Result<String> {
    let version = ctx.project.get_version(stage)?;
    let tag = format!("{}{}", ctx.tag_prefix.unwrap_or_default(), version);
    info!("Creating version tag {}", tag);
    ctx.repo.create_tag(&tag, reference)?;
    Ok(tag)
}

/// Move every alias tag to `reference` and return the alias names.
pub fn create_aliases(
    ctx: &CommandContext,
    stage: Option<&str>,
    alias_prefix: Option<&str>,
    reference: Option<&str>,
) -> Result<Vec<String>> {
    let aliases = list_aliases(ctx.project, stage, alias_prefix)?;
    for alias in &aliases {
        ctx.repo.migrate_alias(alias, reference)?;
    }
    Ok(aliases)
}

/// Names of the effective rules for `stage`.
pub fn list_rules(project: &Project, stage: Option<&str>) -> Result<RuleListing> {
    Ok(RuleListing {
        current: project
            .effective_current_version_rules(stage)?
            .iter()
            .map(|rule| rule.to_string())
            .collect(),
        increment: project
            .effective_increment_rules(stage)?
            .iter()
            .map(|rule| rule.to_string())
            .collect(),
        manifest_comparisons: project
            .effective_manifest_comparison_rules(stage)?
            .iter()
            .map(|rule| rule.to_string())
            .collect(),
    })
}

/// Alias tag names for the current version.
///
/// `alias_prefix` is taken as given on the command line, where `"None"`
/// means no prefix.
pub fn list_aliases(project: &Project, stage: Option<&str>, alias_prefix: Option<&str>) -> Result<Vec<String>> {
    project.get_aliases(stage, legacy_prefix(alias_prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Alias, ComparisonRule, CurrentVersionRule, Package, Stage};
    use crate::git::MockRepository;
    use crate::manifest::MockManifest;
    use std::sync::Arc;

    fn project() -> Project {
        let prod = Stage::new(
            "prod",
            Package::default().with_current_version_rule(Arc::new(
                CurrentVersionRule::regex_no_match("regex_no_match", ".*-rc").unwrap(),
            )),
            vec![Alias::Minor],
        );
        let package = Package::default()
            .with_manifest(Arc::new(MockManifest::new("A", "1.3.0-rc1")))
            .with_current_version_rule(Arc::new(CurrentVersionRule::not_empty()))
            .with_increment_rule(Arc::new(ComparisonRule::increment()));
        Project::new(package, vec![prod], vec![Alias::Major])
    }

    #[test]
    fn test_validate_uses_highest_tag() {
        let project = project();
        let repo = MockRepository::new();
        repo.add_tag("v1.2.0", "HEAD");
        repo.add_tag("v1.4.0", "HEAD");
        let ctx = CommandContext {
            project: &project,
            repo: &repo,
            tag_prefix: Some("v"),
        };

        let outcome = validate(&ctx, None, None).unwrap();
        assert_eq!(outcome.previous_version, "1.4.0");
        assert_eq!(outcome.current_version, "1.3.0-rc1");
        assert!(!outcome.passed);

        let outcome = validate(&ctx, None, Some("1.2.0")).unwrap();
        assert!(outcome.passed);
    }

    #[test]
    fn test_validate_without_tags() {
        let project = project();
        let repo = MockRepository::new();
        let ctx = CommandContext {
            project: &project,
            repo: &repo,
            tag_prefix: None,
        };

        let outcome = validate(&ctx, None, None).unwrap();
        assert_eq!(outcome.previous_version, INITIAL_PREVIOUS_VERSION);
        assert!(outcome.passed);
        assert!(!validate(&ctx, Some("prod"), None).unwrap().passed);
    }

    #[test]
    fn test_create_tag_and_aliases() {
        let project = project();
        let repo = MockRepository::new();
        repo.add_tag("1", "old-commit");
        let ctx = CommandContext {
            project: &project,
            repo: &repo,
            tag_prefix: Some("v"),
        };

        assert_eq!(create_tag(&ctx, None, Some("abc")).unwrap(), "v1.3.0-rc1");
        assert_eq!(repo.tag_target("v1.3.0-rc1").as_deref(), Some("abc"));

        let aliases = create_aliases(&ctx, Some("prod"), Some("None"), Some("abc")).unwrap();
        assert_eq!(aliases, vec!["1", "1.3"]);
        assert_eq!(repo.tag_target("1").as_deref(), Some("abc"));
        assert_eq!(repo.tag_target("1.3").as_deref(), Some("abc"));
    }

    #[test]
    fn test_list_rules() {
        let project = project();
        let listing = list_rules(&project, Some("prod")).unwrap();
        assert_eq!(listing.current, vec!["not_empty", "regex_no_match"]);
        assert_eq!(listing.increment, vec!["increment"]);
        assert!(listing.manifest_comparisons.is_empty());

        assert!(list_rules(&project, Some("qa")).is_err());
    }

    #[test]
    fn test_list_aliases_with_prefix() {
        let project = project();
        assert_eq!(
            list_aliases(&project, Some("prod"), Some("v")).unwrap(),
            vec!["v1", "v1.3"]
        );
    }
}
