//! Prompt templates and assembly.
//!
//! Answers pass through `sanitize` on their way into a prompt; stored answer
//! text itself is never modified. Prompt text is assembled in answer-store
//! order so the same session always produces the same prompts.

use crate::question::AnswerStore;
use crate::sanitize::sanitize;

/// Substituted for the specification when its generation call fails.
pub const FALLBACK_SPECIFICATION: &str = "Error generating AI specification. \
The generation endpoint did not return a result; the questionnaire answers \
below still describe the project.";

/// Substituted for the checklist when its generation call fails.
pub const FALLBACK_CHECKLIST: &str = "Error generating build checklist. \
The generation endpoint did not return a result.";

const SPECIFICATION_TEMPLATE: &str = "You are an experienced software architect. \
Using the project requirements below, write a concise project specification in \
markdown with these sections: Overview, Architecture, Core Features, Data Model, \
External Dependencies, and a short worked example of the primary user flow. \
Stay strictly within the stated requirements and do not invent features or \
dependencies that were not requested.

PROJECT REQUIREMENTS:
";

const CHECKLIST_TEMPLATE: &str = "You are an experienced software architect. \
Using the project requirements and the specification below, write a build \
checklist in markdown: an ordered list of concrete implementation steps, each \
small enough to verify independently. Put the MVP goal first.

PROJECT REQUIREMENTS:
";

const CONSISTENCY_TEMPLATE: &str = "Compare the questionnaire answers with the \
generated specification. Reply with EXACTLY one line and nothing else: \
'CONSISTENT' if the specification only contains what the answers asked for, or \
'INCONSISTENT: <brief reason>' if it adds, drops, or contradicts a requirement.

ANSWERS:
";

const ACCURACY_TEMPLATE: &str = "Review the specification below for technical \
accuracy, especially any embedded examples, commands, or code. Reply with \
EXACTLY one line and nothing else: 'ACCURATE' if everything is technically \
sound, or 'ISSUES: <brief reason>' if anything is wrong or misleading.

SPECIFICATION:
";

const ALIGNMENT_TEMPLATE: &str = "Check whether the build checklist below is \
aligned with the stated MVP goal and core features. Reply with EXACTLY one \
line and nothing else: 'ALIGNED' if the checklist serves the goal and covers \
the core features, or 'MISALIGNED: <brief reason>' if it drifts from them.

MVP GOAL AND CORE FEATURES:
";

/// Render the answer store as a sanitized requirements block.
pub fn render_answers(answers: &AnswerStore) -> String {
    let mut out = String::new();
    for answer in answers.iter() {
        let value = if answer.value.is_empty() {
            "(not specified)".to_string()
        } else {
            sanitize(&answer.value)
        };
        out.push_str(&format!("- {}: {}\n", answer.question_id, value));
    }
    out
}

/// Prompt for the main specification call.
pub fn specification_prompt(answers: &AnswerStore) -> String {
    format!("{}{}", SPECIFICATION_TEMPLATE, render_answers(answers))
}

/// Prompt for the checklist call. Consumes the answers and the already
/// generated specification.
pub fn checklist_prompt(answers: &AnswerStore, specification: &str) -> String {
    format!(
        "{}{}\nSPECIFICATION:\n{}\n",
        CHECKLIST_TEMPLATE,
        render_answers(answers),
        specification
    )
}

/// Prompt for the answers-vs-specification consistency check.
pub fn consistency_prompt(answers: &AnswerStore, specification: &str) -> String {
    format!(
        "{}{}\nSPECIFICATION:\n{}\n",
        CONSISTENCY_TEMPLATE,
        render_answers(answers),
        specification
    )
}

/// Prompt for the technical-accuracy check. Consumes only the specification.
pub fn accuracy_prompt(specification: &str) -> String {
    format!("{}{}\n", ACCURACY_TEMPLATE, specification)
}

/// Prompt for the checklist-vs-goal alignment check.
pub fn alignment_prompt(answers: &AnswerStore, checklist: &str) -> String {
    let goal = answers.get("mvp_goal").unwrap_or("(not specified)");
    let features = answers.get("core_features").unwrap_or("(not specified)");
    format!(
        "{}- mvp_goal: {}\n- core_features: {}\n\nCHECKLIST:\n{}\n",
        ALIGNMENT_TEMPLATE,
        sanitize(goal),
        sanitize(features),
        checklist
    )
}
