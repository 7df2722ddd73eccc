//! Project composition and the validation pipeline.
//!
//! Every list a project exposes has an *effective* form for a given stage:
//! the project's entries followed by the stage's, with later duplicates
//! dropped. Stages can therefore only add checks, never remove one.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info};

use crate::domain::alias::Alias;
use crate::domain::package::Package;
use crate::domain::rule::{ComparisonRule, CurrentVersionRule};
use crate::domain::stage::Stage;
use crate::error::{VertagusError, Result};
use crate::manifest::Manifest;

/// The composition root: global package, stages and project-level aliases.
#[derive(Debug, Clone, Default)]
pub struct Project {
    package: Package,
    stages: Vec<Stage>,
    aliases: Vec<Alias>,
}

impl Project {
    pub fn new(package: Package, stages: Vec<Stage>, aliases: Vec<Alias>) -> Self {
        Project {
            package,
            stages,
            aliases,
        }
    }

    /// Look up a stage by name.
    pub fn stage(&self, name: &str) -> Result<&Stage> {
        self.stages
            .iter()
            .find(|stage| stage.name() == name)
            .ok_or_else(|| VertagusError::StageNotFound(name.to_string()))
    }

    /// The version of the first effective manifest.
    pub fn get_version(&self, stage_name: Option<&str>) -> Result<String> {
        self.effective_manifests(stage_name)?
            .first()
            .map(|manifest| manifest.version().to_string())
            .ok_or(VertagusError::NoManifests)
    }

    /// Alias tag names for the project version.
    ///
    /// Always derived from the project-level version, even when a stage is
    /// given; the stage only contributes its alias strategies.
    pub fn get_aliases(
        &self,
        stage_name: Option<&str>,
        alias_prefix: Option<&str>,
    ) -> Result<Vec<String>> {
        let version = self.get_version(None)?;
        let mut aliases: Vec<String> = self
            .aliases
            .iter()
            .map(|alias| alias.create_alias(&version, alias_prefix))
            .collect();
        if let Some(stage) = self.resolve_stage(stage_name)? {
            aliases.extend(stage.version_aliases(&version, alias_prefix));
        }

        let mut seen = HashSet::new();
        aliases.retain(|alias| seen.insert(alias.clone()));
        Ok(aliases)
    }

    /// Run the current-version, increment and manifest-comparison phases in
    /// order, stopping at the first failing rule.
    ///
    /// A failed rule yields `Ok(false)`; errors are reserved for
    /// misconfiguration (unknown stage, no manifests, unresolvable subsets).
    pub fn validate_version(&self, previous_version: &str, stage_name: Option<&str>) -> Result<bool> {
        let current_version = self.get_version(stage_name)?;

        Ok(self.run_current_version_rules(&current_version, stage_name)?
            && self.run_increment_rules(previous_version, &current_version, stage_name)?
            && self.run_manifest_comparison_rules(stage_name)?)
    }

    fn run_current_version_rules(&self, current_version: &str, stage_name: Option<&str>) -> Result<bool> {
        for rule in self.effective_current_version_rules(stage_name)? {
            info!("Validating {} for {}", rule.name(), current_version);
            if !rule.validate(current_version) {
                error!("Validation failed for {}", rule.name());
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run_increment_rules(
        &self,
        previous_version: &str,
        current_version: &str,
        stage_name: Option<&str>,
    ) -> Result<bool> {
        let versions = [previous_version, current_version];
        for rule in self.effective_increment_rules(stage_name)? {
            info!("Validating {} for {:?}", rule.name(), versions);
            if !rule.validate(&versions) {
                error!("Validation failed for {}", rule.name());
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn run_manifest_comparison_rules(&self, stage_name: Option<&str>) -> Result<bool> {
        let manifests = self.effective_manifests(stage_name)?;
        for rule in self.effective_manifest_comparison_rules(stage_name)? {
            let targets = rule.target_manifests();
            if targets.is_empty() {
                continue;
            }

            let versions: Vec<&str> = manifests
                .iter()
                .filter(|manifest| targets.iter().any(|name| name == manifest.name()))
                .map(|manifest| manifest.version())
                .collect();
            if versions.is_empty() {
                return Err(VertagusError::ManifestSubsetNotFound(targets.to_vec()));
            }

            info!("Validating {} for {:?}", rule.name(), versions);
            if !rule.validate(&versions) {
                error!("Validation failed for {}", rule.name());
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Project manifests followed by stage manifests, first occurrence of
    /// each name kept.
    pub fn effective_manifests(&self, stage_name: Option<&str>) -> Result<Vec<Arc<dyn Manifest>>> {
        let stage_manifests = match self.resolve_stage(stage_name)? {
            Some(stage) => stage.package().manifests(),
            None => &[],
        };

        let mut seen = HashSet::new();
        Ok(self
            .package
            .manifests()
            .iter()
            .chain(stage_manifests)
            .filter(|manifest| seen.insert(manifest.name().to_string()))
            .cloned()
            .collect())
    }

    pub fn effective_current_version_rules(
        &self,
        stage_name: Option<&str>,
    ) -> Result<Vec<Arc<CurrentVersionRule>>> {
        self.effective(stage_name, Package::current_version_rules)
    }

    pub fn effective_increment_rules(&self, stage_name: Option<&str>) -> Result<Vec<Arc<ComparisonRule>>> {
        self.effective(stage_name, Package::increment_rules)
    }

    pub fn effective_manifest_comparison_rules(
        &self,
        stage_name: Option<&str>,
    ) -> Result<Vec<Arc<ComparisonRule>>> {
        self.effective(stage_name, Package::manifest_comparison_rules)
    }

    fn effective<T: ?Sized>(
        &self,
        stage_name: Option<&str>,
        select: fn(&Package) -> &[Arc<T>],
    ) -> Result<Vec<Arc<T>>> {
        let stage_items = match self.resolve_stage(stage_name)? {
            Some(stage) => select(stage.package()),
            None => &[],
        };
        Ok(merge_by_identity(select(&self.package), stage_items))
    }

    /// An empty stage name means no stage.
    fn resolve_stage(&self, stage_name: Option<&str>) -> Result<Option<&Stage>> {
        match stage_name.filter(|name| !name.is_empty()) {
            Some(name) => self.stage(name).map(Some),
            None => Ok(None),
        }
    }
}

/// Concatenate two lists, dropping entries that are the same instance as an
/// earlier one.
pub fn merge_by_identity<T: ?Sized>(first: &[Arc<T>], second: &[Arc<T>]) -> Vec<Arc<T>> {
    let mut merged: Vec<Arc<T>> = Vec::with_capacity(first.len() + second.len());
    for item in first.iter().chain(second) {
        if !merged.iter().any(|seen| Arc::ptr_eq(seen, item)) {
            merged.push(Arc::clone(item));
        }
    }
    merged
}
