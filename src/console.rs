//! Styled console output for the interactive session.
//!
//! The question engine only needs write-line/read-line; everything visual
//! (headers, warnings, the verification summary) is formatted here so the
//! core stays free of presentation concerns.

use colored::Colorize;

use crate::verify::{CheckOutcome, CheckStatus};

/// Section header with an underline, e.g. before the questionnaire starts.
pub fn header(title: &str) -> String {
    format!("\n{}\n{}\n", title.cyan().bold(), "=".repeat(title.len()))
}

/// Progress line for a long-running step ("Generating specification...").
pub fn step(message: &str) -> String {
    format!("{} {}", "::".blue().bold(), message)
}

/// Warning line for degraded-but-continuing situations.
pub fn warning(message: &str) -> String {
    format!("{} {}", "warning:".yellow().bold(), message)
}

/// One line per verification outcome, colored by status.
pub fn verification_summary(outcomes: &[CheckOutcome]) -> String {
    let mut out = String::new();
    out.push_str(&header("Verification Results"));

    for outcome in outcomes {
        let status = match outcome.status {
            CheckStatus::Pass => "PASS".green().bold(),
            CheckStatus::Fail => "FAIL".red().bold(),
            CheckStatus::Unknown => "UNKNOWN".yellow().bold(),
        };
        match &outcome.reason {
            Some(reason) if !reason.is_empty() => {
                out.push_str(&format!(
                    "  {:<20} {} - {}\n",
                    outcome.check.name(),
                    status,
                    reason
                ));
            }
            _ => {
                out.push_str(&format!("  {:<20} {}\n", outcome.check.name(), status));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::CheckKind;

    fn plain() {
        // Deterministic assertions regardless of TTY detection.
        colored::control::set_override(false);
    }

    #[test]
    fn test_header_underlines_title() {
        plain();
        let rendered = header("Project Questionnaire");
        assert!(rendered.contains("Project Questionnaire"));
        assert!(rendered.contains(&"=".repeat("Project Questionnaire".len())));
    }

    #[test]
    fn test_warning_prefix() {
        plain();
        assert!(warning("endpoint unreachable").starts_with("warning:"));
    }

    #[test]
    fn test_verification_summary_lists_all_outcomes() {
        plain();
        let outcomes = vec![
            CheckOutcome {
                check: CheckKind::Consistency,
                status: CheckStatus::Pass,
                reason: None,
            },
            CheckOutcome {
                check: CheckKind::TechnicalAccuracy,
                status: CheckStatus::Fail,
                reason: Some("bad example".to_string()),
            },
            CheckOutcome {
                check: CheckKind::Alignment,
                status: CheckStatus::Unknown,
                reason: Some("call failed".to_string()),
            },
        ];
        let rendered = verification_summary(&outcomes);
        assert!(rendered.contains("consistency"));
        assert!(rendered.contains("PASS"));
        assert!(rendered.contains("FAIL - bad example"));
        assert!(rendered.contains("UNKNOWN - call failed"));
    }
}
