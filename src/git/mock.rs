use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::{VertagusError, Result};
use crate::git::TagRepository;

/// In-memory tag store for testing without a git repository
#[derive(Debug, Default)]
pub struct MockRepository {
    tags: Mutex<BTreeMap<String, String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag pointing to a reference
    pub fn add_tag(&self, name: impl Into<String>, reference: impl Into<String>) {
        if let Ok(mut tags) = self.tags.lock() {
            tags.insert(name.into(), reference.into());
        }
    }

    /// Reference a tag points to, if it exists
    pub fn tag_target(&self, name: &str) -> Option<String> {
        self.tags.lock().ok()?.get(name).cloned()
    }

    fn with_tags<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> Result<T>) -> Result<T> {
        let mut tags = self
            .tags
            .lock()
            .map_err(|_| VertagusError::tag("mock tag store poisoned"))?;
        f(&mut tags)
    }
}

impl TagRepository for MockRepository {
    fn create_tag(&self, name: &str, reference: Option<&str>) -> Result<()> {
        self.with_tags(|tags| {
            if tags.contains_key(name) {
                return Err(VertagusError::tag(format!("Tag '{}' already exists", name)));
            }
            tags.insert(name.to_string(), reference.unwrap_or("HEAD").to_string());
            Ok(())
        })
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.with_tags(|tags| {
            tags.remove(name)
                .map(|_| ())
                .ok_or_else(|| VertagusError::tag(format!("Tag '{}' not found", name)))
        })
    }

    fn list_tags(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        self.with_tags(|tags| {
            Ok(tags
                .keys()
                .filter(|tag| prefix.map_or(true, |p| tag.starts_with(p)))
                .cloned()
                .collect())
        })
    }
}
