//! Manifests - named sources of a version string.
//!
//! The core only needs a manifest's [Manifest::name] and [Manifest::version].
//! Implementations:
//!
//! - [file::FileManifest]: reads a YAML/TOML/JSON document from disk
//! - [mock::MockManifest]: a fixed name/version pair for testing

pub mod file;
pub mod mock;

pub use file::{FileManifest, ManifestFormat};
pub use mock::MockManifest;

use std::fmt;

/// A named handle exposing one version value.
///
/// Names are unique within a package and serve as the deduplication key
/// when project and stage manifests are merged.
pub trait Manifest: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;
}
