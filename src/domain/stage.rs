use crate::domain::alias::Alias;
use crate::domain::package::Package;

/// A named release phase layering extra manifests, rules and aliases on top
/// of the project's own.
#[derive(Debug, Clone)]
pub struct Stage {
    name: String,
    package: Package,
    aliases: Vec<Alias>,
}

impl Stage {
    pub fn new(name: impl Into<String>, package: Package, aliases: Vec<Alias>) -> Self {
        Stage {
            name: name.into(),
            package,
            aliases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Alias tag names this stage contributes for `version`.
    pub fn version_aliases(&self, version: &str, prefix: Option<&str>) -> Vec<String> {
        self.aliases
            .iter()
            .map(|alias| alias.create_alias(version, prefix))
            .collect()
    }
}
