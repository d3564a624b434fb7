use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

use super::{CaptionImporter, DurationResolver};
use crate::config::HostConfig;
use crate::error::{Result, ScriptCueError};

/// Abstract host bridge command representation
#[derive(Debug, Clone)]
pub struct BridgeCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl BridgeCommand {
    /// Create a new bridge command
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Add a subtitle file path as the final argument
    pub fn subtitle_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Execute the command and return its stdout
    pub async fn execute(&self) -> Result<String> {
        debug!("Executing bridge command: {}", self.description);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| ScriptCueError::Host(format!("Failed to run host bridge: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScriptCueError::Host(format!(
                "{} failed: {}",
                self.description,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Bridge-backed implementation of the host collaborator traits.
///
/// Shells out to the configured bridge command and reads a JSON snapshot
/// of the host session from its stdout.
pub struct HostBridge {
    config: HostConfig,
}

impl HostBridge {
    pub fn new(config: HostConfig) -> Self {
        Self { config }
    }

    fn session_command(&self) -> BridgeCommand {
        BridgeCommand::new(&self.config.bridge_path, "session snapshot")
            .args(self.config.session_args.clone())
    }

    fn import_command<P: AsRef<Path>>(&self, subtitle_path: P) -> BridgeCommand {
        BridgeCommand::new(&self.config.bridge_path, "caption import")
            .args(self.config.import_args.clone())
            .subtitle_file(subtitle_path)
    }
}

#[async_trait]
impl DurationResolver for HostBridge {
    async fn resolve(&self) -> Result<Option<f64>> {
        let stdout = self.session_command().execute().await?;
        let snapshot: Value = serde_json::from_str(&stdout)
            .map_err(|e| ScriptCueError::Host(format!("Malformed session snapshot: {}", e)))?;

        let duration = probe_duration(&snapshot);
        debug!("Host session duration probe result: {:?}", duration);
        Ok(duration)
    }
}

#[async_trait]
impl CaptionImporter for HostBridge {
    async fn import(&self, subtitle_path: &Path) -> Result<()> {
        info!("Importing captions from {}", subtitle_path.display());

        match self.import_command(subtitle_path).execute().await {
            Ok(_) => {
                info!("Caption track created");
                Ok(())
            }
            Err(ScriptCueError::Host(message)) => Err(ScriptCueError::Import(message)),
            Err(other) => Err(other),
        }
    }
}

/// Importer used when host import is disabled; leaves the file on disk
pub struct NullImporter;

#[async_trait]
impl CaptionImporter for NullImporter {
    async fn import(&self, subtitle_path: &Path) -> Result<()> {
        info!(
            "Import disabled, subtitle file left at {}",
            subtitle_path.display()
        );
        Ok(())
    }
}

/// Probe a session snapshot for a usable duration, trying the shapes
/// hosts populate in order of how commonly they are filled in: sequence
/// end, sequence duration, latest clip end across video tracks, player
/// bounds width. The first strictly positive hit wins.
pub(crate) fn probe_duration(snapshot: &Value) -> Option<f64> {
    if let Some(seconds) = positive_seconds(&snapshot["end"]) {
        return Some(seconds);
    }
    if let Some(seconds) = positive_seconds(&snapshot["duration"]) {
        return Some(seconds);
    }
    if let Some(seconds) = latest_clip_end(&snapshot["videoTracks"]) {
        return Some(seconds);
    }
    positive_seconds(&snapshot["playerBounds"]["width"])
}

fn positive_seconds(node: &Value) -> Option<f64> {
    let seconds = node["seconds"].as_f64()?;
    (seconds > 0.0).then_some(seconds)
}

fn latest_clip_end(tracks: &Value) -> Option<f64> {
    let mut latest: f64 = 0.0;
    for track in tracks.as_array()? {
        let Some(clips) = track["clips"].as_array() else {
            continue;
        };
        for clip in clips {
            if let Some(end) = positive_seconds(&clip["end"]) {
                if end > latest {
                    latest = end;
                }
            }
        }
    }
    (latest > 0.0).then_some(latest)
}
