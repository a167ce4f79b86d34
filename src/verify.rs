//! Self-verification pipeline for generated output.
//!
//! Three fixed checks run in order, each a classification call constrained to
//! one of two literal prefixes. A check never short-circuits the others: a
//! failed generation call or an off-format response degrades that one check
//! to `Unknown` and the pipeline keeps going. The result is always exactly
//! three records.

use tracing::{info, warn};

use crate::client::{GenerationClient, GenerationRequest};
use crate::prompts;
use crate::question::AnswerStore;

/// The three fixed checks, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Answers vs. generated specification.
    Consistency,
    /// Technical soundness of the specification's embedded examples.
    TechnicalAccuracy,
    /// Checklist vs. MVP goal and core features.
    Alignment,
}

impl CheckKind {
    pub fn name(&self) -> &'static str {
        match self {
            CheckKind::Consistency => "consistency",
            CheckKind::TechnicalAccuracy => "technical-accuracy",
            CheckKind::Alignment => "alignment",
        }
    }

    /// Literal token that opens a passing response.
    fn pass_token(&self) -> &'static str {
        match self {
            CheckKind::Consistency => "CONSISTENT",
            CheckKind::TechnicalAccuracy => "ACCURATE",
            CheckKind::Alignment => "ALIGNED",
        }
    }

    /// Literal token (with trailing colon) that opens a failing response.
    fn fail_token(&self) -> &'static str {
        match self {
            CheckKind::Consistency => "INCONSISTENT:",
            CheckKind::TechnicalAccuracy => "ISSUES:",
            CheckKind::Alignment => "MISALIGNED:",
        }
    }
}

/// Outcome status of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
    /// The classification call failed or the response matched neither
    /// token. A weaker-confidence result, not a pipeline error.
    Unknown,
}

/// One check's result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: CheckKind,
    pub status: CheckStatus,
    pub reason: Option<String>,
}

/// Reduce a raw model response to a status using the check's token pair.
///
/// The failure token is matched first: its remainder becomes the reason.
/// The pass token carries no reason. Anything else is `Unknown` with the
/// raw text preserved.
pub fn parse_verdict(check: CheckKind, raw: &str) -> (CheckStatus, Option<String>) {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix(check.fail_token()) {
        return (CheckStatus::Fail, Some(rest.trim().to_string()));
    }
    if trimmed.starts_with(check.pass_token()) {
        return (CheckStatus::Pass, None);
    }

    (CheckStatus::Unknown, Some(trimmed.to_string()))
}

/// Generation parameters shared by all verification calls. Classification,
/// not prose: low temperature, small token budget.
#[derive(Debug, Clone, Copy)]
pub struct VerifyParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Run all three checks in fixed order: consistency, technical-accuracy,
/// alignment. Always returns exactly three outcomes.
pub fn run_all(
    client: &GenerationClient,
    params: VerifyParams,
    answers: &AnswerStore,
    specification: &str,
    checklist: &str,
) -> Vec<CheckOutcome> {
    let checks = [
        (
            CheckKind::Consistency,
            prompts::consistency_prompt(answers, specification),
        ),
        (
            CheckKind::TechnicalAccuracy,
            prompts::accuracy_prompt(specification),
        ),
        (
            CheckKind::Alignment,
            prompts::alignment_prompt(answers, checklist),
        ),
    ];

    checks
        .into_iter()
        .map(|(check, prompt)| run_check(client, params, check, prompt))
        .collect()
}

/// Run one classification call and reduce it to an outcome. A failed call
/// degrades this check to `Unknown` without touching the others.
fn run_check(
    client: &GenerationClient,
    params: VerifyParams,
    check: CheckKind,
    prompt: String,
) -> CheckOutcome {
    let request = GenerationRequest {
        prompt,
        max_tokens: params.max_tokens,
        temperature: params.temperature,
    };

    match client.generate(&request) {
        Ok(response) => {
            let (status, reason) = parse_verdict(check, &response);
            if status == CheckStatus::Unknown {
                warn!(check = check.name(), response = %response, "verdict_off_format");
            } else {
                info!(check = check.name(), status = ?status, "check_complete");
            }
            CheckOutcome {
                check,
                status,
                reason,
            }
        }
        Err(e) => {
            warn!(check = check.name(), error = %e, "check_call_failed");
            CheckOutcome {
                check,
                status: CheckStatus::Unknown,
                reason: Some(e.to_string()),
            }
        }
    }
}
