pub mod assembly;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod rules;
pub mod ui;

pub use error::{Result, VertagusError};
