use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Result, ScriptCueError};
use crate::script::SubtitleLine;

/// Manual timecode shape: H:MM:SS or HH:MM:SS with an optional 1-3 digit
/// millisecond suffix after '.' or ','
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{1,2}):(\d{1,2})(?:[.,](\d{1,3}))?$").unwrap()
});

/// Start/end pair for one cue, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueTiming {
    pub start: f64,
    pub end: f64,
}

/// Ordered cue timings, one per subtitle line
#[derive(Debug, Clone, PartialEq)]
pub struct TimingPlan {
    cues: Vec<CueTiming>,
}

impl TimingPlan {
    pub fn cues(&self) -> &[CueTiming] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

/// Distribute `total_duration` across lines proportionally to word count.
///
/// Boundaries are built by walking a cursor forward, so consecutive cues
/// share the exact same boundary value and the track has no gaps.
/// Floating-point drift accumulates toward the end of the sequence
/// instead of being redistributed.
pub fn allocate(
    lines: &[SubtitleLine],
    total_duration: f64,
    start_offset: f64,
) -> Result<TimingPlan> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(ScriptCueError::Validation(format!(
            "Total duration must be a positive number of seconds, got {total_duration}"
        )));
    }
    if !start_offset.is_finite() || start_offset < 0.0 {
        return Err(ScriptCueError::Validation(format!(
            "Start offset must be zero or positive, got {start_offset}"
        )));
    }

    // Word counts may come from outside the parser, so defend here too
    let total_words: usize = lines.iter().map(|line| line.word_count).sum();
    if total_words == 0 {
        return Err(ScriptCueError::NoWords);
    }

    let mut cues = Vec::with_capacity(lines.len());
    let mut cursor = start_offset;
    for line in lines {
        let duration = (line.word_count as f64 / total_words as f64) * total_duration;
        let end = cursor + duration;
        cues.push(CueTiming { start: cursor, end });
        cursor = end;
    }

    debug!(
        "Allocated {} cues over {:.3}s starting at {:.3}s",
        cues.len(),
        total_duration,
        start_offset
    );
    Ok(TimingPlan { cues })
}

/// Parse a manual timecode string to seconds.
///
/// The fractional suffix is read as integer milliseconds, so "0:0:1,25"
/// is one second plus 25 milliseconds.
pub fn parse_timecode(input: &str) -> Result<f64> {
    let captures = TIMECODE_REGEX
        .captures(input.trim())
        .ok_or_else(|| ScriptCueError::InvalidTimecode(input.to_string()))?;

    let hours = parse_component(&captures[1], input)?;
    let minutes = parse_component(&captures[2], input)?;
    let seconds = parse_component(&captures[3], input)?;
    let millis = match captures.get(4) {
        Some(fraction) => parse_component(fraction.as_str(), input)?,
        None => 0,
    };

    if minutes >= 60 || seconds >= 60 {
        return Err(ScriptCueError::InvalidTimecode(input.to_string()));
    }

    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds as f64 + millis as f64 / 1000.0)
}

fn parse_component(text: &str, original: &str) -> Result<u64> {
    text.parse()
        .map_err(|_| ScriptCueError::InvalidTimecode(original.to_string()))
}

/// Validated manual timing bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualRange {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl ManualRange {
    /// Parse a start/end timecode pair, rejecting inverted or zero-length
    /// ranges before any allocation happens
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start_seconds = parse_timecode(start)?;
        let end_seconds = parse_timecode(end)?;

        if end_seconds <= start_seconds {
            return Err(ScriptCueError::InvalidTimeRange(format!(
                "end time {end} must be after start time {start}"
            )));
        }

        Ok(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Total duration covered by the range
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}
