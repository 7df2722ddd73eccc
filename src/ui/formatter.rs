//! Pure formatting functions for UI output.
//!
//! Text rendering is separated from printing so it can be tested; the
//! `display_*` functions only print what the `format_*` functions build.

use console::style;

use crate::cli::orchestration::{RuleListing, ValidationOutcome};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Display the outcome of a validation run.
pub fn display_validation(outcome: &ValidationOutcome) {
    if outcome.passed {
        display_success(&format!(
            "Version {} is valid (previous: {})",
            outcome.current_version, outcome.previous_version
        ));
    } else {
        display_error(&format!(
            "Version {} failed validation (previous: {})",
            outcome.current_version, outcome.previous_version
        ));
    }
}

/// Plain-text rendering of the effective rules, one section per phase.
///
/// Empty phases are listed as `(none)`.
pub fn format_rules(listing: &RuleListing) -> String {
    let sections = [
        ("Current version rules", &listing.current),
        ("Increment rules", &listing.increment),
        ("Manifest comparison rules", &listing.manifest_comparisons),
    ];

    let mut out = String::new();
    for (title, rules) in sections {
        out.push_str(title);
        out.push_str(":\n");
        if rules.is_empty() {
            out.push_str("  (none)\n");
        }
        for rule in rules {
            out.push_str(&format!("  - {}\n", rule));
        }
    }
    out
}

/// Plain-text rendering of alias names, one per line.
pub fn format_aliases(aliases: &[String]) -> String {
    aliases.iter().map(|alias| format!("{}\n", alias)).collect()
}

/// Display the effective rules.
pub fn display_rules(listing: &RuleListing) {
    print!("{}", format_rules(listing));
}

/// Display alias names.
pub fn display_aliases(aliases: &[String]) {
    print!("{}", format_aliases(aliases));
}
