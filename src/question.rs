//! Typed questions and the retry-until-valid input loop.
//!
//! Each question is asked through a small state machine: present, read a
//! line, evaluate, and either accept or print the rejection reason and read
//! again. Evaluation is a pure function over the raw input so the validation
//! rules are testable without driving real stdin.

use std::io::{BufRead, Write};

/// Validator for free-text questions.
/// Returns a rejection reason if the input is invalid, None if valid.
pub type Validator = fn(&str) -> Option<String>;

/// Immutable definition of a single question.
pub struct Question {
    /// Stable key used in the answer store and prompt assembly.
    pub id: &'static str,
    /// Text shown to the user.
    pub prompt: &'static str,
    /// Fixed choices. Empty means free text.
    pub options: &'static [&'static str],
    /// Whether comma-separated multiple selections are accepted.
    pub allow_multiple: bool,
    /// Accepted verbatim on empty input, bypassing option and validator checks.
    pub default: Option<&'static str>,
    /// Whether empty input (with no default) is rejected.
    pub required: bool,
    /// Consulted only when `options` is empty.
    pub validator: Option<Validator>,
}

impl Question {
    /// Free-text question with no constraints.
    pub const fn free_text(id: &'static str, prompt: &'static str) -> Self {
        Self {
            id,
            prompt,
            options: &[],
            allow_multiple: false,
            default: None,
            required: false,
            validator: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Single-select question over a fixed option list.
    pub const fn select(
        id: &'static str,
        prompt: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            prompt,
            options,
            allow_multiple: false,
            default: None,
            required: false,
            validator: None,
        }
    }

    /// Multi-select question over a fixed option list.
    pub const fn multi_select(
        id: &'static str,
        prompt: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            prompt,
            options,
            allow_multiple: true,
            default: None,
            required: false,
            validator: None,
        }
    }
}

/// A validated, normalized answer. Created once per question, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub question_id: String,
    pub value: String,
}

/// Why a raw input was rejected. Resolved by re-prompting, never surfaced
/// as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Empty input on a required question with no default.
    Required,
    /// A selection token was not a base-10 integer.
    NotANumber(String),
    /// A selection token was outside [1, option count].
    OutOfRange(String, usize),
    /// Multiple tokens given to a single-select question.
    SingleSelectionOnly,
    /// A free-text validator rejected the input with this reason.
    Invalid(String),
}

impl Rejection {
    /// Human-readable message shown before re-prompting.
    pub fn message(&self) -> String {
        match self {
            Rejection::Required => "This question is required.".to_string(),
            Rejection::NotANumber(token) => {
                format!("'{}' is not a number.", token)
            }
            Rejection::OutOfRange(token, max) => {
                format!("'{}' is out of range (choose 1-{}).", token, max)
            }
            Rejection::SingleSelectionOnly => {
                "Enter exactly one selection.".to_string()
            }
            Rejection::Invalid(reason) => reason.clone(),
        }
    }
}

/// Evaluate raw input against a question's rules (pure function).
///
/// Returns the normalized answer value, or the rejection reason that the
/// ask loop reports before re-prompting.
pub fn evaluate(question: &Question, raw: &str) -> Result<String, Rejection> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        // A default bypasses option and validator checks entirely.
        if let Some(default) = question.default {
            return Ok(default.to_string());
        }
        if question.required {
            return Err(Rejection::Required);
        }
        return Ok(String::new());
    }

    if !question.options.is_empty() {
        return resolve_selection(question, trimmed);
    }

    if let Some(validator) = question.validator
        && let Some(reason) = validator(trimmed)
    {
        return Err(Rejection::Invalid(reason));
    }

    // Free text is accepted unchanged; sanitization happens later, only
    // when the answer is embedded in a generation prompt.
    Ok(raw.to_string())
}

/// Map selection input to option text. Any bad token rejects the entire
/// input; no partial acceptance.
fn resolve_selection(question: &Question, input: &str) -> Result<String, Rejection> {
    let tokens: Vec<&str> = if question.allow_multiple {
        input.split(',').map(str::trim).collect()
    } else {
        if input.contains(',') {
            return Err(Rejection::SingleSelectionOnly);
        }
        vec![input]
    };

    let mut selected = Vec::with_capacity(tokens.len());
    for token in tokens {
        let index: usize = token
            .parse()
            .map_err(|_| Rejection::NotANumber(token.to_string()))?;
        if index < 1 || index > question.options.len() {
            return Err(Rejection::OutOfRange(
                token.to_string(),
                question.options.len(),
            ));
        }
        // Selection order as entered; duplicates are kept.
        selected.push(question.options[index - 1]);
    }

    Ok(selected.join(", "))
}

/// Render the question header: prompt text, numbered options, hints.
pub fn render_question(question: &Question) -> String {
    let mut out = String::new();
    out.push_str(question.prompt);
    out.push('\n');

    for (i, option) in question.options.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, option));
    }

    if question.allow_multiple {
        out.push_str("  (comma-separated numbers accepted, e.g. 1,3)\n");
    }
    if let Some(default) = question.default {
        out.push_str(&format!("  [default: {}]\n", default));
    }

    out
}

/// Ask one question: present, then loop on read/evaluate until accepted.
///
/// Malformed input re-prompts indefinitely. EOF resolves like empty input
/// (default or empty-optional); a required question that cannot resolve
/// becomes an `UnexpectedEof` error, since the stream will never produce
/// another line.
pub fn ask<R: BufRead, W: Write>(
    question: &Question,
    reader: &mut R,
    writer: &mut W,
) -> std::io::Result<Answer> {
    write!(writer, "{}", render_question(question))?;

    loop {
        write!(writer, "> ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return match evaluate(question, "") {
                Ok(value) => Ok(Answer {
                    question_id: question.id.to_string(),
                    value,
                }),
                Err(_) => Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("input ended before '{}' was answered", question.id),
                )),
            };
        }

        // Strip the read_line terminator; inner whitespace stays untouched.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        match evaluate(question, &line) {
            Ok(value) => {
                return Ok(Answer {
                    question_id: question.id.to_string(),
                    value,
                });
            }
            Err(rejection) => {
                writeln!(writer, "{}", rejection.message())?;
            }
        }
    }
}

/// Ordered question-id to answer mapping built across the session.
/// Insertion order is the asking order, which keeps prompt text reproducible.
#[derive(Debug, Default)]
pub struct AnswerStore {
    answers: Vec<Answer>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer. Each question id is recorded exactly once.
    pub fn record(&mut self, answer: Answer) {
        debug_assert!(
            self.get(&answer.question_id).is_none(),
            "answer recorded twice for {}",
            answer.question_id
        );
        self.answers.push(answer);
    }

    /// Look up an answer value by question id.
    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .map(|a| a.value.as_str())
    }

    /// Iterate answers in asking order.
    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}
