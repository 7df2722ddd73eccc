//! Rule lookup by configured name

pub mod registry;

pub use registry::{RuleArgs, RuleKind, RuleRegistry};
