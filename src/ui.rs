//! Operator-facing console output.
//!
//! Lines are categorised (info, success, warning, error) for a human reader;
//! nothing parses them.

use console::style;

use crate::error::InitError;
use crate::initializer::{CleanupOutcome, Summary};
use crate::marker::MarkerOutcome;
use crate::notice::Notice;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print an informational message with cyan marker.
pub fn display_info(message: &str) {
    println!("{} {}", style("ℹ").cyan(), message);
}

/// Format and print a warning to stderr.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), message);
}

/// Display a notice as info or warning depending on its kind.
pub fn display_notice(notice: &Notice) {
    if notice.is_warning() {
        display_warning(&notice.to_string());
    } else {
        display_info(&notice.to_string());
    }
}

/// Display the outcome of each step of a successful run.
pub fn display_summary(summary: &Summary) {
    if let Some(previous) = &summary.previous_branch {
        display_status(&format!("Started from branch '{}'", previous));
    }
    display_success(&format!(
        "Created branch '{}' for version {}",
        summary.branch, summary.version
    ));

    if summary.stale_directory == CleanupOutcome::Removed {
        display_success("Removed stale output directory");
    }
    if summary.marker == MarkerOutcome::Rewritten {
        display_success("Switched kibot_variant from CHECKED to PRELIMINARY");
    }

    for notice in &summary.notices {
        display_notice(notice);
    }

    let short_id = summary.commit_id.get(..7).unwrap_or(summary.commit_id.as_str());
    display_success(&format!("Committed {} ({})", short_id, summary.sign_off));

    println!(
        "\n{} Development branch {} is ready\n",
        style("✓").green(),
        style(&summary.branch).bold()
    );
}

/// Display a failed run: the error, any pending paths, and recovery suggestions.
pub fn display_init_error(err: &InitError) {
    display_error(&err.to_string());

    if let InitError::DirtyWorkingTree { paths } = err {
        eprintln!("{}", style("Pending changes:").underlined());
        for path in paths {
            eprintln!("  {}", style(path).red());
        }
    }

    let suggestions = err.recovery_suggestions();
    if !suggestions.is_empty() {
        eprintln!("\n{}", style("Recovery suggestions:").bold());
        for suggestion in suggestions {
            eprintln!("  - {}", suggestion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_functions_do_not_panic() {
        // Visual verification only; output goes to the test harness
        display_error("test error");
        display_success("test success");
        display_status("test status");
        display_info("test info");
        display_warning("test warning");
    }

    #[test]
    fn test_display_init_error_with_paths() {
        display_init_error(&InitError::DirtyWorkingTree {
            paths: vec!["README.md".to_string()],
        });
    }
}
