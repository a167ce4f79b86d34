//! Speech synthesis for the session summary.
//!
//! One blocking call to a local OpenAI-compatible `/v1/audio/speech`
//! endpoint; the mp3 body is saved next to the other artifacts. Synthesis is
//! best-effort: any failure is reported as a warning and the session result
//! stands without the audio.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use crate::config::TtsConfig;

/// TTS endpoints reject very long inputs; the summary is truncated to this
/// many characters before synthesis.
const MAX_TTS_CHARS: usize = 2000;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
    speed: f32,
    stream: bool,
}

/// Truncate text to the TTS input bound, marking the cut.
fn truncate_for_speech(text: &str) -> String {
    if text.len() <= MAX_TTS_CHARS {
        return text.to_string();
    }
    let mut cut = MAX_TTS_CHARS;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}

/// Synthesize `text` and save it as `summary_<stamp>.mp3` in `output_dir`.
pub fn synthesize_summary(
    config: &TtsConfig,
    output_dir: &Path,
    stamp: &str,
    text: &str,
) -> Result<PathBuf> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .context("Failed to create TTS HTTP client")?;

    let input = truncate_for_speech(text);
    let body = SpeechRequest {
        model: &config.model,
        input: &input,
        voice: &config.voice,
        response_format: "mp3",
        speed: 1.0,
        stream: false,
    };

    let url = format!(
        "{}/v1/audio/speech",
        config.base_url.trim_end_matches('/')
    );
    let response = client
        .post(&url)
        .json(&body)
        .send()
        .context("TTS request failed")?;

    if !response.status().is_success() {
        bail!("TTS endpoint returned HTTP {}", response.status());
    }

    let audio = response.bytes().context("Failed to read TTS response body")?;
    let path = output_dir.join(format!("summary_{}.mp3", stamp));
    fs::write(&path, &audio).with_context(|| format!("Failed to save audio to {:?}", path))?;

    info!(path = ?path, bytes = audio.len(), "audio_saved");
    Ok(path)
}
