//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;

use crate::resolver::NpmInfo;
use crate::warning::PublishWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a warning to the user.
pub fn display_warning(warning: &PublishWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render resolved publish information.
///
/// Untagged versions are shown as such so they are not mistaken for `latest`.
pub fn format_npm_info(info: &NpmInfo) -> String {
    let tag = match info.tag {
        Some(ref tag) => style(tag.to_string()).cyan().to_string(),
        None => style("(none)").dim().to_string(),
    };
    format!(
        "{}\n  Version: {}\n  Tag:     {}",
        style("Resolved npm info:").bold(),
        style(&info.version).green(),
        tag
    )
}

/// Display resolved publish information.
pub fn display_npm_info(info: &NpmInfo) {
    println!("{}", format_npm_info(info));
}

/// Display a list of versions, one per line.
pub fn display_versions(versions: &[String]) {
    for version in versions {
        println!("  - {}", version);
    }
}
