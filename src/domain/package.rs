use std::sync::Arc;

use crate::domain::rule::{ComparisonRule, CurrentVersionRule};
use crate::manifest::Manifest;

/// Manifests plus the three rule lists shared by projects and stages.
///
/// Entries are reference-counted so the same configured rule instance can
/// appear in both a project and a stage and still be recognised as one.
#[derive(Debug, Clone, Default)]
pub struct Package {
    manifests: Vec<Arc<dyn Manifest>>,
    current_version_rules: Vec<Arc<CurrentVersionRule>>,
    increment_rules: Vec<Arc<ComparisonRule>>,
    manifest_comparison_rules: Vec<Arc<ComparisonRule>>,
}

impl Package {
    pub fn new(
        manifests: Vec<Arc<dyn Manifest>>,
        current_version_rules: Vec<Arc<CurrentVersionRule>>,
        increment_rules: Vec<Arc<ComparisonRule>>,
        manifest_comparison_rules: Vec<Arc<ComparisonRule>>,
    ) -> Self {
        Package {
            manifests,
            current_version_rules,
            increment_rules,
            manifest_comparison_rules,
        }
    }

    pub fn with_manifest(mut self, manifest: Arc<dyn Manifest>) -> Self {
        self.manifests.push(manifest);
        self
    }

    pub fn with_current_version_rule(mut self, rule: Arc<CurrentVersionRule>) -> Self {
        self.current_version_rules.push(rule);
        self
    }

    pub fn with_increment_rule(mut self, rule: Arc<ComparisonRule>) -> Self {
        self.increment_rules.push(rule);
        self
    }

    pub fn with_manifest_comparison_rule(mut self, rule: Arc<ComparisonRule>) -> Self {
        self.manifest_comparison_rules.push(rule);
        self
    }

    pub fn manifests(&self) -> &[Arc<dyn Manifest>] {
        &self.manifests
    }

    pub fn current_version_rules(&self) -> &[Arc<CurrentVersionRule>] {
        &self.current_version_rules
    }

    pub fn increment_rules(&self) -> &[Arc<ComparisonRule>] {
        &self.increment_rules
    }

    pub fn manifest_comparison_rules(&self) -> &[Arc<ComparisonRule>] {
        &self.manifest_comparison_rules
    }
}
