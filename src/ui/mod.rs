//! User interface module - text formatting and JSON output.
//!
//! Separates concerns:
//! - `formatter` - Human-readable output
//! - This module - Machine-readable (JSON) output

use serde::Serialize;

use crate::error::{VertagusError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_aliases, display_error, display_rules, display_success,
    display_validation, format_aliases, format_rules,
};

/// Render any command result as pretty-printed JSON.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VertagusError::config(format!("Cannot render JSON: {}", e)))
}

/// Print a command result as JSON.
pub fn display_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::orchestration::RuleListing;

    #[test]
    fn test_render_aliases_json() {
        let aliases = vec!["1".to_string(), "1.3".to_string()];
        let value: serde_json::Value = serde_json::from_str(&render_json(&aliases).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!(["1", "1.3"]));
    }

    #[test]
    fn test_render_rules_json() {
        let listing = RuleListing {
            current: vec!["not_empty".to_string()],
            increment: vec!["increment".to_string()],
            manifest_comparisons: Vec::new(),
        };
        let value: serde_json::Value = serde_json::from_str(&render_json(&listing).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "current": ["not_empty"],
                "increment": ["increment"],
                "manifest_comparisons": []
            })
        );
    }
}
