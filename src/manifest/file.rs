use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::error::{VertagusError, Result};
use crate::manifest::Manifest;

/// Document format of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
    Toml,
    /// `pyproject.toml` with the version under `project.version`
    SetuptoolsPyproject,
    /// `Cargo.toml` with the version under `package.version`
    CargoToml,
}

impl ManifestFormat {
    /// Key path used when the manifest config does not give one.
    pub fn default_loc(&self) -> &'static [&'static str] {
        match self {
            ManifestFormat::Yaml | ManifestFormat::Toml | ManifestFormat::SetuptoolsPyproject => {
                &["project", "version"]
            }
            ManifestFormat::Json => &["version"],
            ManifestFormat::CargoToml => &["package", "version"],
        }
    }

    fn parse_document(&self, contents: &str) -> std::result::Result<Value, String> {
        match self {
            ManifestFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Toml | ManifestFormat::SetuptoolsPyproject | ManifestFormat::CargoToml => {
                toml::from_str(contents).map_err(|e| e.to_string())
            }
        }
    }
}

impl FromStr for ManifestFormat {
    type Err = VertagusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            "json" => Ok(ManifestFormat::Json),
            "toml" => Ok(ManifestFormat::Toml),
            "setuptools_pyproject" => Ok(ManifestFormat::SetuptoolsPyproject),
            "cargo_toml" => Ok(ManifestFormat::CargoToml),
            other => Err(VertagusError::manifest(format!(
                "Unknown manifest type: '{}'",
                other
            ))),
        }
    }
}

/// Manifest backed by a structured document on disk.
///
/// The document is read once on load; the version is resolved eagerly so a
/// bad path or key surfaces at startup rather than mid-validation.
#[derive(Debug, Clone)]
pub struct FileManifest {
    name: String,
    path: PathBuf,
    loc: Vec<String>,
    version: String,
}

impl FileManifest {
    /// Load a manifest file.
    ///
    /// # Arguments
    /// * `name` - Unique manifest name
    /// * `format` - Document format
    /// * `path` - File path, relative paths are resolved against `root`
    /// * `loc` - Key path to the version value, or `None` for the format default
    /// * `root` - Optional base directory
    pub fn load(
        name: impl Into<String>,
        format: ManifestFormat,
        path: impl AsRef<Path>,
        loc: Option<Vec<String>>,
        root: Option<&Path>,
    ) -> Result<Self> {
        let name = name.into();
        let path = match root {
            Some(root) if path.as_ref().is_relative() => root.join(path),
            _ => path.as_ref().to_path_buf(),
        };
        let loc = loc.unwrap_or_else(|| {
            format.default_loc().iter().map(|s| s.to_string()).collect()
        });

        let contents = fs::read_to_string(&path).map_err(|e| {
            VertagusError::manifest(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        let document = format.parse_document(&contents).map_err(|e| {
            VertagusError::manifest(format!("Cannot parse '{}': {}", path.display(), e))
        })?;
        let version = lookup_version(&document, &loc).map_err(|reason| {
            VertagusError::manifest(format!(
                "Manifest '{}' ({}): {}",
                name,
                path.display(),
                reason
            ))
        })?;

        Ok(FileManifest {
            name,
            path,
            loc,
            version,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn loc(&self) -> &[String] {
        &self.loc
    }
}

impl Manifest for FileManifest {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// Walk `loc` through `document` and return the scalar found there.
///
/// Numeric keys index into arrays.
fn lookup_version(document: &Value, loc: &[String]) -> std::result::Result<String, String> {
    let mut current = document;
    for key in loc {
        current = match current {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
        .ok_or_else(|| format!("key '{}' not found in path {:?}", key, loc))?;
    }

    match current {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!("value at {:?} is not a scalar: {}", loc, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_yaml_default_loc() {
        let file = write_temp("project:\n  name: demo\n  version: 1.4.2\n");
        let manifest =
            FileManifest::load("yaml", ManifestFormat::Yaml, file.path(), None, None).unwrap();
        assert_eq!(manifest.version(), "1.4.2");
        assert_eq!(manifest.name(), "yaml");
    }

    #[test]
    fn test_json_custom_loc() {
        let file = write_temp(r#"{"meta": {"release": {"version": "0.3.0"}}}"#);
        let loc = vec!["meta".to_string(), "release".to_string(), "version".to_string()];
        let manifest =
            FileManifest::load("pkg", ManifestFormat::Json, file.path(), Some(loc), None).unwrap();
        assert_eq!(manifest.version(), "0.3.0");
    }

    #[test]
    fn test_cargo_toml_default_loc() {
        let file = write_temp("[package]\nname = \"demo\"\nversion = \"2.0.1\"\n");
        let manifest =
            FileManifest::load("cargo", ManifestFormat::CargoToml, file.path(), None, None)
                .unwrap();
        assert_eq!(manifest.version(), "2.0.1");
    }

    #[test]
    fn test_pyproject_default_loc() {
        let file = write_temp("[project]\nname = \"demo\"\nversion = \"0.9.0\"\n");
        let manifest = FileManifest::load(
            "pyproject",
            ManifestFormat::SetuptoolsPyproject,
            file.path(),
            None,
            None,
        )
        .unwrap();
        assert_eq!(manifest.version(), "0.9.0");
    }

    #[test]
    fn test_array_index_in_loc() {
        let file = write_temp("releases:\n  - version: 5.0.0\n");
        let loc = vec!["releases".to_string(), "0".to_string(), "version".to_string()];
        let manifest =
            FileManifest::load("r", ManifestFormat::Yaml, file.path(), Some(loc), None).unwrap();
        assert_eq!(manifest.version(), "5.0.0");
    }

    #[test]
    fn test_relative_path_uses_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"version": "1.0.0"}"#).unwrap();
        let manifest = FileManifest::load(
            "npm",
            ManifestFormat::Json,
            "package.json",
            None,
            Some(dir.path()),
        )
        .unwrap();
        assert_eq!(manifest.version(), "1.0.0");
        assert_eq!(manifest.path(), dir.path().join("package.json"));
    }

    #[test]
    fn test_missing_key() {
        let file = write_temp("project:\n  name: demo\n");
        let err = FileManifest::load("yaml", ManifestFormat::Yaml, file.path(), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("'version' not found"));
    }

    #[test]
    fn test_non_scalar_value() {
        let file = write_temp("project:\n  version:\n    major: 1\n");
        let err = FileManifest::load("yaml", ManifestFormat::Yaml, file.path(), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("not a scalar"));
    }

    #[test]
    fn test_missing_file() {
        let err = FileManifest::load(
            "gone",
            ManifestFormat::Json,
            "/nonexistent/vertagus/package.json",
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, VertagusError::Manifest(_)));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("yaml".parse::<ManifestFormat>().unwrap(), ManifestFormat::Yaml);
        assert_eq!(
            "setuptools_pyproject".parse::<ManifestFormat>().unwrap(),
            ManifestFormat::SetuptoolsPyproject
        );
        assert!("xml".parse::<ManifestFormat>().is_err());
    }
}
