use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, ScriptCueError};
use crate::script::SubtitleLine;
use crate::timing::TimingPlan;

/// Narrow space (U+2009) used to render the fractional part of a spacing
/// factor with only two character widths
const THIN_SPACE: char = '\u{2009}';

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Word spacing factor clamped to the supported range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSpacing(f64);

impl WordSpacing {
    pub const MIN: f64 = 1.0;
    pub const MAX: f64 = 15.0;

    /// Clamp to [1, 15]; zero, negative and NaN inputs fall back to 1
    pub fn clamped(factor: f64) -> Self {
        if factor.is_nan() || factor < Self::MIN {
            Self(Self::MIN)
        } else if factor > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(factor)
        }
    }

    pub fn factor(self) -> f64 {
        self.0
    }
}

impl Default for WordSpacing {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

/// Replace each internal whitespace run with the spacing separator:
/// floor(factor) literal spaces, plus one thin space when the factor has
/// a fractional part
pub fn apply_word_spacing(text: &str, spacing: WordSpacing) -> String {
    let whole = spacing.factor().floor() as usize;
    let fraction = spacing.factor() - spacing.factor().floor();

    let mut separator = " ".repeat(whole);
    if fraction > 0.0 {
        separator.push(THIN_SPACE);
    }

    WHITESPACE_RUN
        .replace_all(text, separator.as_str())
        .into_owned()
}

/// Format a seconds value as an SRT timestamp (HH:MM:SS,mmm).
///
/// The value is rounded to whole milliseconds once, before decomposition,
/// so all four fields describe the same rounded instant.
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Render subtitle lines and their timing plan as an SRT document
pub fn encode(lines: &[SubtitleLine], plan: &TimingPlan, spacing: WordSpacing) -> Result<String> {
    if lines.len() != plan.len() {
        return Err(ScriptCueError::Validation(format!(
            "Line count {} does not match timing plan length {}",
            lines.len(),
            plan.len()
        )));
    }

    let mut document = String::new();
    for (index, (line, cue)) in lines.iter().zip(plan.cues()).enumerate() {
        document.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_srt_time(cue.start),
            format_srt_time(cue.end),
            apply_word_spacing(&line.text, spacing)
        ));
    }

    if document.is_empty() {
        return Err(ScriptCueError::EmptyDocument);
    }

    debug!("Encoded {} cues", lines.len());
    Ok(document)
}
