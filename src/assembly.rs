//! Builds a [Project] from its declarative configuration.
//!
//! Rules referenced by bare name are interned for the lifetime of one
//! [ProjectAssembler]: `"increment"` named by the project and by a stage
//! resolves to the same instance, so the effective list holds it once.
//! Parameterised rules are always built fresh.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::{ManifestComparisonConfig, ManifestConfig, ProjectConfig, RuleRef, RulesConfig};
use crate::domain::{Alias, ComparisonRule, CurrentVersionRule, Package, Project, Stage};
use crate::error::Result;
use crate::manifest::{FileManifest, Manifest, ManifestFormat};
use crate::rules::{RuleArgs, RuleRegistry};

pub struct ProjectAssembler<'r> {
    registry: &'r RuleRegistry,
    root: PathBuf,
    current_rules: HashMap<String, Arc<CurrentVersionRule>>,
    increment_rules: HashMap<String, Arc<ComparisonRule>>,
}

impl<'r> ProjectAssembler<'r> {
    /// # Arguments
    /// * `registry` - Rule lookup table
    /// * `root` - Directory relative manifest paths are resolved against
    pub fn new(registry: &'r RuleRegistry, root: impl Into<PathBuf>) -> Self {
        ProjectAssembler {
            registry,
            root: root.into(),
            current_rules: HashMap::new(),
            increment_rules: HashMap::new(),
        }
    }

    pub fn assemble(mut self, config: &ProjectConfig) -> Result<Project> {
        let package = self.build_package(&config.manifests, &config.rules)?;

        let mut stages = Vec::with_capacity(config.stages.len());
        for (name, stage_config) in &config.stages {
            debug!("Assembling stage {}", name);
            let package = self.build_package(&stage_config.manifests, &stage_config.rules)?;
            stages.push(Stage::new(name.clone(), package, parse_aliases(&stage_config.aliases)?));
        }

        Ok(Project::new(package, stages, parse_aliases(&config.aliases)?))
    }

    fn build_package(&mut self, manifests: &[ManifestConfig], rules: &RulesConfig) -> Result<Package> {
        let manifests = manifests
            .iter()
            .map(|manifest| self.load_manifest(manifest))
            .collect::<Result<Vec<_>>>()?;
        let current = rules
            .current
            .iter()
            .map(|rule| self.current_rule(rule))
            .collect::<Result<Vec<_>>>()?;
        let increment = rules
            .increment
            .iter()
            .map(|rule| self.increment_rule(rule))
            .collect::<Result<Vec<_>>>()?;
        let manifest_comparisons = rules
            .manifest_comparisons
            .iter()
            .map(|rule| self.manifest_comparison_rule(rule))
            .collect::<Result<Vec<_>>>()?;

        Ok(Package::new(manifests, current, increment, manifest_comparisons))
    }

    fn load_manifest(&self, config: &ManifestConfig) -> Result<Arc<dyn Manifest>> {
        let format: ManifestFormat = config.manifest_type.parse()?;
        let loc = config.loc.as_ref().map(|loc| loc.keys());
        let manifest = FileManifest::load(&config.name, format, &config.path, loc, Some(self.root.as_path()))?;
        debug!(
            "Loaded manifest {} = {} from {} at {:?}",
            manifest.name(),
            manifest.version(),
            manifest.path().display(),
            manifest.loc()
        );
        Ok(Arc::new(manifest))
    }

    fn current_rule(&mut self, rule: &RuleRef) -> Result<Arc<CurrentVersionRule>> {
        let args = RuleArgs {
            pattern: rule.pattern(),
            ..RuleArgs::default()
        };
        if let RuleRef::Configured { .. } = rule {
            return Ok(Arc::new(self.registry.current(rule.name(), &args)?));
        }
        if let Some(existing) = self.current_rules.get(rule.name()) {
            return Ok(Arc::clone(existing));
        }

        let built = Arc::new(self.registry.current(rule.name(), &args)?);
        self.current_rules
            .insert(rule.name().to_string(), Arc::clone(&built));
        Ok(built)
    }

    fn increment_rule(&mut self, rule: &RuleRef) -> Result<Arc<ComparisonRule>> {
        let args = RuleArgs {
            pattern: rule.pattern(),
            ..RuleArgs::default()
        };
        if let RuleRef::Configured { .. } = rule {
            return Ok(Arc::new(self.registry.increment(rule.name(), &args)?));
        }
        if let Some(existing) = self.increment_rules.get(rule.name()) {
            return Ok(Arc::clone(existing));
        }

        let built = Arc::new(self.registry.increment(rule.name(), &args)?);
        self.increment_rules
            .insert(rule.name().to_string(), Arc::clone(&built));
        Ok(built)
    }

    fn manifest_comparison_rule(&self, config: &ManifestComparisonConfig) -> Result<Arc<ComparisonRule>> {
        let args = RuleArgs {
            pattern: None,
            manifests: &config.manifests,
        };
        Ok(Arc::new(
            self.registry.manifest_comparison(&config.rule_type, &args)?,
        ))
    }
}

fn parse_aliases(names: &[String]) -> Result<Vec<Alias>> {
    names.iter().map(|name| name.parse::<Alias>()).collect()
}

/// Convenience wrapper: assemble `config` with manifests resolved under `root`.
pub fn assemble_project(config: &ProjectConfig, registry: &RuleRegistry, root: &Path) -> Result<Project> {
    ProjectAssembler::new(registry, root).assemble(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ConfigFormat};
    use crate::error::VertagusError;
    use std::fs;

    fn write_manifests(dir: &Path) {
        fs::write(dir.join("package.json"), r#"{"version": "1.2.0"}"#).unwrap();
        fs::write(dir.join("chart.yaml"), "version: 1.2.0\n").unwrap();
    }

    const CONFIG: &str = r#"
[project]
aliases = ["major"]

[[project.manifests]]
name = "npm"
type = "json"
path = "package.json"

[project.rules]
current = ["not_empty"]
increment = ["increment"]

[project.stages.prod]
aliases = ["minor", "string:stable"]

[[project.stages.prod.manifests]]
name = "chart"
type = "yaml"
path = "chart.yaml"
loc = "version"

[project.stages.prod.rules]
current = ["not_empty", { name = "regex_no_match", pattern = ".*-" }]
increment = ["increment"]

[[project.stages.prod.rules.manifest_comparisons]]
manifests = ["npm", "chart"]
"#;

    #[test]
    fn test_assemble_full_project() {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path());
        let config = parse_config(CONFIG, ConfigFormat::Toml).unwrap();
        let registry = RuleRegistry::with_builtins();

        let project = assemble_project(&config.project, &registry, dir.path()).unwrap();

        assert_eq!(project.get_version(None).unwrap(), "1.2.0");
        assert!(project.stage("prod").is_ok());
        assert!(project.validate_version("1.1.0", Some("prod")).unwrap());
        assert!(!project.validate_version("1.2.0", Some("prod")).unwrap());
        assert_eq!(
            project.get_aliases(Some("prod"), Some("v")).unwrap(),
            vec!["v1", "v1.2", "vstable"]
        );
    }

    #[test]
    fn test_bare_names_are_interned_across_stages() {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path());
        let config = parse_config(CONFIG, ConfigFormat::Toml).unwrap();
        let registry = RuleRegistry::with_builtins();
        let project = assemble_project(&config.project, &registry, dir.path()).unwrap();

        let current: Vec<String> = project
            .effective_current_version_rules(Some("prod"))
            .unwrap()
            .iter()
            .map(|rule| rule.name().to_string())
            .collect();
        assert_eq!(current, vec!["not_empty", "regex_no_match"]);
        assert_eq!(project.effective_increment_rules(Some("prod")).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_rule_name() {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path());
        let mut config = parse_config(CONFIG, ConfigFormat::Toml).unwrap();
        config.project.rules.increment = vec![RuleRef::Name("bigger".to_string())];

        let registry = RuleRegistry::with_builtins();
        let err = assemble_project(&config.project, &registry, dir.path()).unwrap_err();
        assert!(matches!(err, VertagusError::RuleNotFound { .. }));
    }

    #[test]
    fn test_unknown_alias() {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path());
        let mut config = parse_config(CONFIG, ConfigFormat::Toml).unwrap();
        config.project.aliases = vec!["patch".to_string()];

        let registry = RuleRegistry::with_builtins();
        assert!(assemble_project(&config.project, &registry, dir.path()).is_err());
    }

    #[test]
    fn test_missing_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = parse_config(CONFIG, ConfigFormat::Toml).unwrap();
        let registry = RuleRegistry::with_builtins();
        let err = assemble_project(&config.project, &registry, dir.path()).unwrap_err();
        assert!(matches!(err, VertagusError::Manifest(_)));
    }
}
