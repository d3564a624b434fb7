// Script parsing
//
// Turns a raw text blob into the ordered list of subtitle lines the rest
// of the pipeline works with. Pure and synchronous; reading and decoding
// the script file lives in the `source` collaborator.

pub mod source;

use tracing::debug;

use crate::error::{Result, ScriptCueError};

/// One subtitle line surviving normalization, in script order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleLine {
    /// Zero-based position within the script
    pub index: usize,
    /// Trimmed line text
    pub text: String,
    /// Number of whitespace-separated words in `text`
    pub word_count: usize,
}

/// Parse a raw script into ordered subtitle lines.
///
/// Line endings are normalized before splitting, each record is trimmed
/// of surrounding whitespace (including BOM and no-break space noise
/// left by some editors), and blank records are dropped while the
/// relative order of the rest is preserved.
pub fn parse_script(raw: &str) -> Result<Vec<SubtitleLine>> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = Vec::new();
    for record in normalized.split('\n') {
        let trimmed = trim_invisible(record);
        if trimmed.is_empty() {
            continue;
        }

        let word_count = trimmed.split_whitespace().count();
        lines.push(SubtitleLine {
            index: lines.len(),
            text: trimmed.to_string(),
            word_count,
        });
    }

    if lines.is_empty() {
        return Err(ScriptCueError::EmptyScript);
    }
    // Trimmed-non-empty normally implies at least one word; guard anyway
    // against externally constructed inputs
    if lines.iter().all(|line| line.word_count == 0) {
        return Err(ScriptCueError::NoWords);
    }

    debug!("Parsed {} subtitle lines", lines.len());
    Ok(lines)
}

/// Trim whitespace plus U+FEFF; U+00A0 already counts as whitespace
fn trim_invisible(record: &str) -> &str {
    record.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
