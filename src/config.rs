use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, ScriptCueError};

// Default values for generation configuration
fn default_word_spacing() -> f64 {
    1.0
}

fn default_fallback_duration() -> f64 {
    60.0
}

fn default_file_prefix() -> String {
    "subtitles".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub generate: GenerateConfig,
    pub host: HostConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Word spacing factor applied inside each cue, clamped to [1, 15]
    #[serde(default = "default_word_spacing")]
    pub word_spacing: f64,
    /// Timing mode: auto (duration from the host) or manual (explicit bounds)
    pub timing_mode: TimingMode,
    /// Start bound for manual mode, e.g. "00:00:05"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End bound for manual mode, e.g. "00:01:30,500"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Duration in seconds substituted when the host cannot report one
    #[serde(default = "default_fallback_duration")]
    pub fallback_duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingMode {
    /// Auto: total duration comes from the host session, offset is zero
    Auto,
    /// Manual: user supplies explicit start and end timecodes
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Bridge command used to talk to the host editor
    pub bridge_path: String,
    /// Arguments that make the bridge print a JSON session snapshot
    pub session_args: Vec<String>,
    /// Arguments that make the bridge import a caption file; the subtitle
    /// path is appended as the final argument
    pub import_args: Vec<String>,
    /// Whether generated files are imported into the host project
    pub import: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for generated subtitle files; defaults next to the script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// File name prefix for generated subtitle files
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generate: GenerateConfig {
                word_spacing: default_word_spacing(),
                timing_mode: TimingMode::Auto,
                start_time: None,
                end_time: None,
                fallback_duration: default_fallback_duration(),
            },
            host: HostConfig {
                bridge_path: "editor-bridge".to_string(),
                session_args: vec!["session".to_string(), "--json".to_string()],
                import_args: vec!["import-captions".to_string()],
                import: true,
            },
            output: OutputConfig {
                dir: None,
                file_prefix: default_file_prefix(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScriptCueError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ScriptCueError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScriptCueError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ScriptCueError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generate.word_spacing, 1.0);
        assert_eq!(config.generate.timing_mode, TimingMode::Auto);
        assert_eq!(config.generate.fallback_duration, 60.0);
        assert!(config.host.import);
        assert_eq!(config.output.file_prefix, "subtitles");
    }

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.generate.timing_mode = TimingMode::Manual;
        config.generate.start_time = Some("00:00:10".to_string());
        config.generate.end_time = Some("00:01:30,500".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.generate.timing_mode, TimingMode::Manual);
        assert_eq!(loaded.generate.start_time.as_deref(), Some("00:00:10"));
        assert_eq!(loaded.generate.end_time.as_deref(), Some("00:01:30,500"));
    }

    #[test]
    fn test_partial_config_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[generate]
timing_mode = "auto"

[host]
bridge_path = "editor-bridge"
session_args = []
import_args = []
import = false

[output]
"#,
        )
        .unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.generate.word_spacing, 1.0);
        assert_eq!(loaded.generate.fallback_duration, 60.0);
        assert_eq!(loaded.output.file_prefix, "subtitles");
        assert!(!loaded.host.import);
    }
}
