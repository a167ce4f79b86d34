//! Artifact assembly and persistence.
//!
//! Plain UTF-8 markdown files in the output directory, one set per session,
//! stamped with the session timestamp. The assembler has no opinion on the
//! content beyond concatenation; everything it writes was produced earlier
//! in the session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::question::AnswerStore;
use crate::verify::{CheckOutcome, CheckStatus};

/// Paths of the files written for one session.
#[derive(Debug)]
pub struct WrittenArtifacts {
    pub specification: PathBuf,
    pub checklist: PathBuf,
    pub report: PathBuf,
}

/// Timestamp used in artifact filenames, e.g. `20260828_143015`.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Write the session's artifacts into `output_dir`, creating it on demand.
pub fn write_all(
    output_dir: &Path,
    stamp: &str,
    answers: &AnswerStore,
    specification: &str,
    checklist: &str,
    outcomes: &[CheckOutcome],
) -> Result<WrittenArtifacts> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

    let specification_path = write_file(
        output_dir,
        &format!("specification_{}.md", stamp),
        specification,
    )?;
    let checklist_path = write_file(output_dir, &format!("checklist_{}.md", stamp), checklist)?;
    let report = render_report(answers, specification, checklist, outcomes);
    let report_path = write_file(output_dir, &format!("report_{}.md", stamp), &report)?;

    Ok(WrittenArtifacts {
        specification: specification_path,
        checklist: checklist_path,
        report: report_path,
    })
}

fn write_file(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
    info!(path = ?path, bytes = content.len(), "artifact_written");
    Ok(path)
}

/// Combined report: answers, specification, checklist, verification results.
pub fn render_report(
    answers: &AnswerStore,
    specification: &str,
    checklist: &str,
    outcomes: &[CheckOutcome],
) -> String {
    let mut out = String::new();

    out.push_str("# Project Report\n\n## Questionnaire Answers\n\n");
    for answer in answers.iter() {
        let value = if answer.value.is_empty() {
            "(not specified)"
        } else {
            answer.value.as_str()
        };
        out.push_str(&format!("- **{}**: {}\n", answer.question_id, value));
    }

    out.push_str("\n## Specification\n\n");
    out.push_str(specification);
    out.push_str("\n\n## Build Checklist\n\n");
    out.push_str(checklist);

    out.push_str("\n\n## Verification\n\n");
    for outcome in outcomes {
        let status = match outcome.status {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Unknown => "UNKNOWN",
        };
        match &outcome.reason {
            Some(reason) if !reason.is_empty() => {
                out.push_str(&format!(
                    "- {}: {} - {}\n",
                    outcome.check.name(),
                    status,
                    reason
                ));
            }
            _ => {
                out.push_str(&format!("- {}: {}\n", outcome.check.name(), status));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::Answer;
    use crate::verify::CheckKind;

    fn store() -> AnswerStore {
        let mut answers = AnswerStore::new();
        answers.record(Answer {
            question_id: "project_name".to_string(),
            value: "demo".to_string(),
        });
        answers.record(Answer {
            question_id: "nice_to_have".to_string(),
            value: String::new(),
        });
        answers
    }

    fn outcomes() -> Vec<CheckOutcome> {
        vec![
            CheckOutcome {
                check: CheckKind::Consistency,
                status: CheckStatus::Pass,
                reason: None,
            },
            CheckOutcome {
                check: CheckKind::TechnicalAccuracy,
                status: CheckStatus::Fail,
                reason: Some("example uses the wrong flag".to_string()),
            },
            CheckOutcome {
                check: CheckKind::Alignment,
                status: CheckStatus::Unknown,
                reason: Some("generation request failed".to_string()),
            },
        ]
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().all(|c| c.is_ascii_digit() || c == '_'));
    }

    #[test]
    fn test_render_report_sections() {
        let report = render_report(&store(), "spec body", "checklist body", &outcomes());
        assert!(report.contains("## Questionnaire Answers"));
        assert!(report.contains("**project_name**: demo"));
        assert!(report.contains("(not specified)"));
        assert!(report.contains("spec body"));
        assert!(report.contains("checklist body"));
        assert!(report.contains("consistency: PASS"));
        assert!(report.contains("technical-accuracy: FAIL - example uses the wrong flag"));
        assert!(report.contains("alignment: UNKNOWN - generation request failed"));
    }

    #[test]
    fn test_write_all_creates_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("outputs");

        let written = write_all(
            &output_dir,
            "20260828_120000",
            &store(),
            "spec body",
            "checklist body",
            &outcomes(),
        )
        .unwrap();

        assert!(written.specification.exists());
        assert!(written.checklist.exists());
        assert!(written.report.exists());
        assert_eq!(
            fs::read_to_string(&written.specification).unwrap(),
            "spec body"
        );
        assert!(
            written
                .report
                .file_name()
                .unwrap()
                .to_string_lossy()
                .contains("20260828_120000")
        );
    }

    #[test]
    fn test_write_all_fails_on_unwritable_path() {
        // A file where the directory should be.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "x").unwrap();

        let result = write_all(
            &blocker,
            "20260828_120000",
            &store(),
            "s",
            "c",
            &outcomes(),
        );
        assert!(result.is_err());
    }
}
