// Host editor integration
//
// The workflow never talks to the editor directly; it goes through these
// traits so the bridge can be swapped or disabled:
// - DurationResolver: reads the active sequence duration from the host
// - CaptionImporter: attaches a generated subtitle file as a caption track

pub mod bridge;

use async_trait::async_trait;
use std::path::Path;

pub use bridge::*;

use crate::config::HostConfig;
use crate::error::Result;

/// Resolves the active sequence duration from a host editing session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurationResolver: Send + Sync {
    /// Return the sequence duration in seconds, or None when the host
    /// session cannot provide one
    async fn resolve(&self) -> Result<Option<f64>>;
}

/// Imports a generated subtitle file into the host project
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionImporter: Send + Sync {
    /// Import the subtitle file at `subtitle_path` as a caption track
    async fn import(&self, subtitle_path: &Path) -> Result<()>;
}

/// Factory for creating host collaborator instances
pub struct HostFactory;

impl HostFactory {
    /// Create the bridge-backed duration resolver
    pub fn create_resolver(config: HostConfig) -> Box<dyn DurationResolver> {
        Box::new(bridge::HostBridge::new(config))
    }

    /// Create a caption importer; a no-op importer when import is disabled
    pub fn create_importer(config: HostConfig) -> Box<dyn CaptionImporter> {
        if config.import {
            Box::new(bridge::HostBridge::new(config))
        } else {
            Box::new(bridge::NullImporter)
        }
    }
}
