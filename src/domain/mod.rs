//! Domain logic - version rules and project/stage composition, independent of
//! files and git

pub mod alias;
pub mod package;
pub mod project;
pub mod rule;
pub mod stage;
pub mod version;

pub use alias::Alias;
pub use package::Package;
pub use project::Project;
pub use rule::{Comparison, ComparisonRule, CurrentVersionRule};
pub use stage::Stage;
