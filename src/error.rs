use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptCueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("No subtitle lines found in the script")]
    EmptyScript,

    #[error("No words found in the script")]
    NoWords,

    #[error("Invalid timecode '{0}'. Use HH:MM:SS, optionally with a ,mmm or .mmm suffix")]
    InvalidTimecode(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not determine a duration from the host session")]
    DurationUnavailable,

    #[error("Assembled subtitle document is empty")]
    EmptyDocument,

    #[error("Could not decode '{0}'; no readable text. Re-save the script as UTF-8 or UTF-16 LE")]
    Encoding(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Host bridge error: {0}")]
    Host(String),

    #[error("Caption import failed: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScriptCueError>;
