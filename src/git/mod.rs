//! Tag backend abstraction
//!
//! This module provides a trait-based abstraction over the tag operations
//! vertagus performs after a version has been validated.
//!
//! # Overview
//!
//! The primary abstraction is the [TagRepository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! # Usage
//!
//! Command code depends on the trait rather than concrete implementations.
//!
//! ```rust
//! # use vertagus::git::TagRepository;
//! # fn example<R: TagRepository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! if let Some(previous) = repo.get_highest_version(Some("v"))? {
//!     println!("Last release: {}", previous);
//! }
//! repo.migrate_alias("v1", None)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::domain::version;
use crate::error::Result;

/// Tag operations against a version-control backend.
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// Implementations map backend errors (like `git2::Error`) to the
/// appropriate [crate::error::VertagusError] variants.
pub trait TagRepository: Send + Sync {
    /// Create a tag at `reference` (a revision spec), or at HEAD when `None`.
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists, the reference doesn't resolve, or
    ///   the backend fails
    fn create_tag(&self, name: &str, reference: Option<&str>) -> Result<()>;

    /// Delete a tag.
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// List tag names, restricted to those starting with `prefix` if given.
    fn list_tags(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    /// The highest version among tags carrying `prefix`.
    ///
    /// The prefix is stripped before parsing; tags that do not parse as a
    /// version are ignored. Returns the version text without the prefix.
    fn get_highest_version(&self, prefix: Option<&str>) -> Result<Option<String>> {
        let prefix_len = prefix.map_or(0, str::len);
        let highest = self
            .list_tags(prefix)?
            .into_iter()
            .filter_map(|tag| {
                let text = tag.get(prefix_len..)?.to_string();
                version::parse(&text).ok().map(|parsed| (parsed, text))
            })
            .max_by(|(a, _), (b, _)| match version::cmp_precedence(a, b) {
                Ordering::Equal => a.build.cmp(&b.build),
                ordering => ordering,
            })
            .map(|(_, text)| text);
        Ok(highest)
    }

    /// Point the alias tag `alias` at `reference`.
    ///
    /// Deleting the old alias is best-effort: a failure is logged and the
    /// tag is recreated regardless.
    fn migrate_alias(&self, alias: &str, reference: Option<&str>) -> Result<()> {
        info!("Migrating alias {} to ref {}", alias, reference.unwrap_or("HEAD"));
        if let Err(e) = self.delete_tag(alias) {
            warn!("Error encountered while deleting alias {}: {}", alias, e);
        }
        self.create_tag(alias, reference)
    }
}
