use crate::manifest::Manifest;

/// In-memory manifest for testing without files on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockManifest {
    name: String,
    version: String,
}

impl MockManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        MockManifest {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Manifest for MockManifest {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_manifest_accessors() {
        let manifest = MockManifest::new("pyproject", "1.0.0");
        assert_eq!(manifest.name(), "pyproject");
        assert_eq!(manifest.version(), "1.0.0");
    }
}
