use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{VertagusError, Result};

/// File names searched for in the working directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["vertagus.toml", "vertagus.yaml", "vertagus.yml"];

/// Represents the complete configuration for vertagus.
///
/// Contains the project definition (manifests, rules, stages, aliases) and
/// the tag backend settings.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    pub project: ProjectConfig,

    #[serde(default)]
    pub scm: ScmConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    #[serde(default)]
    pub manifests: Vec<ManifestConfig>,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub stages: BTreeMap<String, StageConfig>,

    #[serde(default)]
    pub aliases: Vec<String>,
}

/// One manifest file and where its version lives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub manifest_type: String,

    pub path: String,

    #[serde(default)]
    pub loc: Option<ManifestLoc>,
}

/// Key path to a version, either `"project.version"` or `["project", "version"]`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ManifestLoc {
    Dotted(String),
    Keys(Vec<String>),
}

impl ManifestLoc {
    pub fn keys(&self) -> Vec<String> {
        match self {
            ManifestLoc::Dotted(path) => path
                .split('.')
                .filter(|key| !key.is_empty())
                .map(str::to_string)
                .collect(),
            ManifestLoc::Keys(keys) => keys.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct RulesConfig {
    #[serde(default)]
    pub current: Vec<RuleRef>,

    #[serde(default)]
    pub increment: Vec<RuleRef>,

    #[serde(default)]
    pub manifest_comparisons: Vec<ManifestComparisonConfig>,
}

/// A rule referenced by bare name, or by name with a parameter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RuleRef {
    Name(String),
    Configured {
        name: String,
        #[serde(default)]
        pattern: Option<String>,
    },
}

impl RuleRef {
    pub fn name(&self) -> &str {
        match self {
            RuleRef::Name(name) => name,
            RuleRef::Configured { name, .. } => name,
        }
    }

    pub fn pattern(&self) -> Option<&str> {
        match self {
            RuleRef::Name(_) => None,
            RuleRef::Configured { pattern, .. } => pattern.as_deref(),
        }
    }
}

/// Returns the default manifest comparison rule.
fn default_manifest_comparison() -> String {
    "manifests_equal".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestComparisonConfig {
    #[serde(rename = "type", default = "default_manifest_comparison")]
    pub rule_type: String,

    #[serde(default)]
    pub manifests: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct StageConfig {
    #[serde(default)]
    pub manifests: Vec<ManifestConfig>,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Returns the default backend type.
fn default_scm_type() -> String {
    "git".to_string()
}

/// Returns the default remote name.
fn default_remote_name() -> String {
    "origin".to_string()
}

/// Tag backend settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScmConfig {
    #[serde(rename = "type", default = "default_scm_type")]
    pub scm_type: String,

    #[serde(default)]
    pub tag_prefix: Option<String>,

    #[serde(default = "default_remote_name")]
    pub remote_name: String,

    /// Repository root; defaults to the directory holding the config file.
    #[serde(default)]
    pub root: Option<String>,
}

impl Default for ScmConfig {
    fn default() -> Self {
        ScmConfig {
            scm_type: default_scm_type(),
            tag_prefix: None,
            remote_name: default_remote_name(),
            root: None,
        }
    }
}

/// Serialization format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Parses configuration text in the given format.
pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<Config> {
    match format {
        ConfigFormat::Toml => toml::from_str(contents).map_err(|e| VertagusError::config(e.to_string())),
        ConfigFormat::Yaml => {
            serde_yaml::from_str(contents).map_err(|e| VertagusError::config(e.to_string()))
        }
    }
}

/// Finds the configuration file to use.
///
/// Searches in the following order:
/// 1. Custom path provided as parameter
/// 2. `vertagus.toml`, `vertagus.yaml`, `vertagus.yml` in current directory
/// 3. `vertagus/vertagus.toml` in the user config directory
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the config file
/// * `Err` - If a custom path does not exist or nothing was found
pub fn locate_config(config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        return Err(VertagusError::config(format!(
            "Config file '{}' does not exist",
            path.display()
        )));
    }

    if let Some(found) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| Path::new(".").join(name))
        .find(|candidate| candidate.exists())
    {
        return Ok(found);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("vertagus").join("vertagus.toml");
        if candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(VertagusError::config(format!(
        "No configuration file found (looked for {})",
        CONFIG_FILE_NAMES.join(", ")
    )))
}

/// Reads and parses a configuration file, choosing the format by extension.
pub fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents, ConfigFormat::from_path(path))
}

/// Locates and loads the configuration.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    read_config(&locate_config(config_path)?)
}
