use async_trait::async_trait;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::{Result, ScriptCueError};

/// Supplies decoded script text to the workflow
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScriptSource: Send + Sync {
    /// Load and decode the script at `path`
    async fn load(&self, path: &Path) -> Result<String>;
}

/// Factory for creating script source instances
pub struct ScriptSourceFactory;

impl ScriptSourceFactory {
    /// Create the default file-based script source
    pub fn create_default() -> Box<dyn ScriptSource> {
        Box::new(FileScriptSource)
    }
}

/// Reads scripts from disk, accepting UTF-8 and UTF-16 files so scripts
/// saved from word processors in any language load without re-encoding
pub struct FileScriptSource;

#[async_trait]
impl ScriptSource for FileScriptSource {
    async fn load(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ScriptCueError::FileNotFound(path.display().to_string()));
        }

        let bytes = fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());

        decode_script_bytes(&bytes)
            .ok_or_else(|| ScriptCueError::Encoding(path.display().to_string()))
    }
}

/// Decode raw script bytes: BOM-sniffed UTF-8 / UTF-16 first, then plain
/// UTF-8, then BOM-less UTF-16 LE as the last resort
pub(crate) fn decode_script_bytes(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xef, 0xbb, 0xbf, rest @ ..] => String::from_utf8(rest.to_vec()).ok(),
        [0xff, 0xfe, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xfe, 0xff, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        // ASCII-only UTF-16 LE without a BOM decodes as UTF-8 riddled
        // with NULs, so a NUL-bearing UTF-8 result falls through too
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(text) if !text.contains('\0') => Some(text),
            _ => decode_utf16(bytes, u16::from_le_bytes),
        },
    }
}

fn decode_utf16(bytes: &[u8], combine: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| combine([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}
