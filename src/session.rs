//! One interactive session: questionnaire, generation, verification,
//! persistence.
//!
//! The session object owns the answer store and passes it explicitly to the
//! prompt builders and the verification pipeline. After the questionnaire
//! completes, nothing is fatal: failed generation calls degrade to fallback
//! text or UNKNOWN check results and the artifacts are written regardless.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::artifacts::{self, WrittenArtifacts};
use crate::client::{GenerationClient, GenerationRequest};
use crate::config::Config;
use crate::console;
use crate::prompts;
use crate::question::{self, AnswerStore, Question};
use crate::tts;
use crate::verify::{self, CheckOutcome, CheckStatus, VerifyParams};

/// Caller-facing knobs that belong to the surrounding application, not the
/// questionnaire core.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Auto-accept defaults instead of prompting where a default exists.
    pub quick: bool,
    /// Skip speech synthesis even if enabled in config.
    pub skip_audio: bool,
}

/// Everything a finished session produced.
pub struct SessionSummary {
    pub answers: AnswerStore,
    pub specification: String,
    pub checklist: String,
    pub outcomes: Vec<CheckOutcome>,
    pub artifacts: WrittenArtifacts,
}

/// Reject one-word project goals; the generation prompts need a sentence.
fn require_some_detail(input: &str) -> Option<String> {
    if input.trim().len() < 10 {
        Some("Please describe this in at least a short sentence.".to_string())
    } else {
        None
    }
}

/// The fixed questionnaire, in asking order.
pub fn questions() -> Vec<Question> {
    vec![
        Question::free_text("project_name", "What is the project called?").required(),
        Question::select(
            "project_type",
            "What kind of project is it?",
            &["CLI tool", "Web app", "Desktop app", "Library", "API service"],
        )
        .with_default("CLI tool"),
        Question::select("scope", "Scope?", &["Local", "Private", "Public"]).required(),
        Question::free_text("target_users", "Who is it for?").with_default("Just me"),
        Question::multi_select(
            "dependencies",
            "Dependencies?",
            &[
                "None",
                "AI/ML",
                "Database",
                "Web APIs",
                "File system",
                "Audio/Video",
            ],
        )
        .with_default("None"),
        Question::free_text("mvp_goal", "What is the MVP goal?")
            .required()
            .with_validator(require_some_detail),
        Question::free_text("core_features", "List the core features.").required(),
        Question::free_text("nice_to_have", "Any nice-to-have features?"),
        Question::free_text("constraints", "Any constraints (performance, platforms, budget)?"),
        Question::select(
            "experience_level",
            "Your experience level with this stack?",
            &["Beginner", "Intermediate", "Advanced"],
        )
        .with_default("Intermediate"),
    ]
}

/// A single interactive session. Owns the answer store for its lifetime.
pub struct Session {
    config: Config,
    answers: AnswerStore,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            answers: AnswerStore::new(),
        }
    }

    /// Run the whole session: ask, generate, verify, persist, speak.
    pub fn run<R: BufRead, W: Write>(
        mut self,
        reader: &mut R,
        writer: &mut W,
        options: SessionOptions,
    ) -> Result<SessionSummary> {
        write!(writer, "{}", console::header("Project Questionnaire"))?;
        self.run_questionnaire(reader, writer, options.quick)?;

        let client = GenerationClient::new(
            &self.config.endpoint.base_url,
            &self.config.endpoint.model,
            self.config.endpoint.timeout(),
        )?;

        writeln!(writer, "{}", console::step("Generating specification..."))?;
        let specification = self.generate_or_fallback(
            &client,
            prompts::specification_prompt(&self.answers),
            self.config.generation.spec_max_tokens,
            self.config.generation.spec_temperature,
            prompts::FALLBACK_SPECIFICATION,
            writer,
        )?;

        writeln!(writer, "{}", console::step("Generating build checklist..."))?;
        let checklist = self.generate_or_fallback(
            &client,
            prompts::checklist_prompt(&self.answers, &specification),
            self.config.generation.checklist_max_tokens,
            self.config.generation.checklist_temperature,
            prompts::FALLBACK_CHECKLIST,
            writer,
        )?;

        writeln!(writer, "{}", console::step("Verifying generated output..."))?;
        let outcomes = verify::run_all(
            &client,
            VerifyParams {
                max_tokens: self.config.generation.verify_max_tokens,
                temperature: self.config.generation.verify_temperature,
            },
            &self.answers,
            &specification,
            &checklist,
        );
        write!(writer, "{}", console::verification_summary(&outcomes))?;

        let stamp = artifacts::timestamp();
        let artifacts = artifacts::write_all(
            &self.config.output_dir(),
            &stamp,
            &self.answers,
            &specification,
            &checklist,
            &outcomes,
        )?;
        writeln!(
            writer,
            "{}",
            console::step(&format!("Artifacts written to {:?}", artifacts.report))
        )?;

        if self.config.tts.enabled && !options.skip_audio {
            writeln!(writer, "{}", console::step("Synthesizing spoken summary..."))?;
            let summary = spoken_summary(&self.answers, &outcomes);
            match tts::synthesize_summary(
                &self.config.tts,
                &self.config.output_dir(),
                &stamp,
                &summary,
            ) {
                Ok(path) => {
                    writeln!(
                        writer,
                        "{}",
                        console::step(&format!("Audio summary saved to {:?}", path))
                    )?;
                }
                Err(e) => {
                    warn!(error = %e, "tts_failed");
                    writeln!(
                        writer,
                        "{}",
                        console::warning(&format!("audio summary skipped: {}", e))
                    )?;
                }
            }
        }

        info!(answers = self.answers.len(), "session_complete");

        Ok(SessionSummary {
            answers: self.answers,
            specification,
            checklist,
            outcomes,
            artifacts,
        })
    }

    /// Ask every question in order. In quick mode, questions with a default
    /// are answered with that default without prompting.
    fn run_questionnaire<R: BufRead, W: Write>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        quick: bool,
    ) -> Result<()> {
        for q in questions() {
            if quick && let Some(default) = q.default {
                info!(question = q.id, "quick_mode_default");
                self.answers.record(crate::question::Answer {
                    question_id: q.id.to_string(),
                    value: default.to_string(),
                });
                continue;
            }

            writeln!(writer)?;
            let answer = question::ask(&q, reader, writer)?;
            self.answers.record(answer);
        }
        Ok(())
    }

    /// Run one primary generation call; on failure, warn and substitute the
    /// fixed fallback so the session can still persist a complete artifact
    /// set.
    fn generate_or_fallback<W: Write>(
        &self,
        client: &GenerationClient,
        prompt: String,
        max_tokens: u32,
        temperature: f32,
        fallback: &str,
        writer: &mut W,
    ) -> Result<String> {
        let request = GenerationRequest {
            prompt,
            max_tokens,
            temperature,
        };

        match client.generate(&request) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "generation_failed");
                writeln!(
                    writer,
                    "{}",
                    console::warning(&format!("generation failed, using placeholder: {}", e))
                )?;
                Ok(fallback.to_string())
            }
        }
    }
}

/// Short spoken recap of the session for the TTS endpoint.
fn spoken_summary(answers: &AnswerStore, outcomes: &[CheckOutcome]) -> String {
    let name = answers.get("project_name").unwrap_or("your project");
    let goal = answers.get("mvp_goal").unwrap_or("the stated goal");
    let passed = outcomes
        .iter()
        .filter(|o| o.status == CheckStatus::Pass)
        .count();

    format!(
        "Specification for {} is ready. The MVP goal is: {}. \
         {} of {} verification checks passed.",
        name,
        goal,
        passed,
        outcomes.len()
    )
}
