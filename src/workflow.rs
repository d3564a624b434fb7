use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{Config, TimingMode};
use crate::error::{Result, ScriptCueError};
use crate::host::{CaptionImporter, DurationResolver, HostFactory};
use crate::script;
use crate::script::source::{ScriptSource, ScriptSourceFactory};
use crate::subtitle::{self, WordSpacing};
use crate::timing::{self, ManualRange};

pub struct Workflow {
    config: Config,
    source: Box<dyn ScriptSource>,
    resolver: Box<dyn DurationResolver>,
    importer: Box<dyn CaptionImporter>,
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        let source = ScriptSourceFactory::create_default();
        let resolver = HostFactory::create_resolver(config.host.clone());
        let importer = HostFactory::create_importer(config.host.clone());

        Self {
            config,
            source,
            resolver,
            importer,
        }
    }

    /// Build a workflow with explicit collaborators
    pub fn with_collaborators(
        config: Config,
        source: Box<dyn ScriptSource>,
        resolver: Box<dyn DurationResolver>,
        importer: Box<dyn CaptionImporter>,
    ) -> Self {
        Self {
            config,
            source,
            resolver,
            importer,
        }
    }

    /// Generate a subtitle file for one script and hand it to the host.
    ///
    /// The document is assembled fully in memory before anything touches
    /// disk, so a failing step never leaves a partial subtitle file.
    pub async fn generate_single(
        &self,
        script_path: &Path,
        output_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        info!("Generating subtitles for {}", script_path.display());

        let raw = self.source.load(script_path).await?;
        let lines = script::parse_script(&raw)?;

        let (total_duration, start_offset) = self.resolve_timing().await?;
        let plan = timing::allocate(&lines, total_duration, start_offset)?;

        let spacing = WordSpacing::clamped(self.config.generate.word_spacing);
        let document = subtitle::encode(&lines, &plan, spacing)?;

        let output_path = self.output_path(script_path, output_dir)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&output_path, document).await?;
        info!("Wrote {} cues to {}", lines.len(), output_path.display());

        self.importer.import(&output_path).await?;

        Ok(output_path)
    }

    /// Generate subtitle files for every .txt script in a directory
    pub async fn generate_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(ScriptCueError::Config(
                "Input path is not a directory".to_string(),
            ));
        }

        let mut script_files = Vec::new();
        for entry in WalkDir::new(input_dir).into_iter().filter_map(|e| e.ok()) {
            if entry.path().extension().and_then(|ext| ext.to_str()) == Some("txt") {
                script_files.push(entry.path().to_path_buf());
            }
        }
        script_files.sort();

        info!("Found {} scripts to process", script_files.len());

        for script_path in script_files {
            match self.generate_single(&script_path, output_dir).await {
                Ok(path) => info!("Generated {}", path.display()),
                Err(e) => warn!("Failed to process {}: {}", script_path.display(), e),
            }
        }

        Ok(())
    }

    /// Query the host for the active sequence duration (diagnostic aid)
    pub async fn host_duration(&self) -> Result<Option<f64>> {
        self.resolver.resolve().await
    }

    /// Resolve (total duration, start offset) for the configured mode
    pub async fn resolve_timing(&self) -> Result<(f64, f64)> {
        match self.config.generate.timing_mode {
            TimingMode::Manual => {
                let start = self.config.generate.start_time.as_deref().ok_or_else(|| {
                    ScriptCueError::Validation(
                        "Manual timing mode requires a start time".to_string(),
                    )
                })?;
                let end = self.config.generate.end_time.as_deref().ok_or_else(|| {
                    ScriptCueError::Validation(
                        "Manual timing mode requires an end time".to_string(),
                    )
                })?;

                let range = ManualRange::parse(start, end)?;
                Ok((range.duration(), range.start_seconds))
            }
            TimingMode::Auto => match self.resolver.resolve().await {
                Ok(Some(duration)) => Ok((duration, 0.0)),
                Ok(None) => {
                    warn!(
                        "Host could not report a duration, using fallback of {}s",
                        self.config.generate.fallback_duration
                    );
                    Ok((self.config.generate.fallback_duration, 0.0))
                }
                Err(ScriptCueError::Host(message)) => {
                    warn!("Host bridge failed: {}", message);
                    Err(ScriptCueError::DurationUnavailable)
                }
                Err(other) => Err(other),
            },
        }
    }

    fn output_path(&self, script_path: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => match &self.config.output.dir {
                Some(dir) => dir.clone(),
                None => script_path
                    .parent()
                    .ok_or_else(|| {
                        ScriptCueError::Config("Cannot determine output directory".to_string())
                    })?
                    .to_path_buf(),
            },
        };

        // Unique per invocation so repeated runs never clobber a file the
        // host project still references
        let file_name = format!(
            "{}_{}.srt",
            self.config.output.file_prefix,
            chrono::Utc::now().timestamp_millis()
        );
        Ok(dir.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MockCaptionImporter, MockDurationResolver};
    use crate::script::source::MockScriptSource;

    fn test_config(mode: TimingMode) -> Config {
        let mut config = Config::default();
        config.generate.timing_mode = mode;
        config
    }

    fn workflow_with(
        config: Config,
        source: MockScriptSource,
        resolver: MockDurationResolver,
        importer: MockCaptionImporter,
    ) -> Workflow {
        Workflow::with_collaborators(
            config,
            Box::new(source),
            Box::new(resolver),
            Box::new(importer),
        )
    }

    #[tokio::test]
    async fn test_auto_mode_uses_host_duration() {
        let mut resolver = MockDurationResolver::new();
        resolver.expect_resolve().returning(|| Ok(Some(42.0)));

        let workflow = workflow_with(
            test_config(TimingMode::Auto),
            MockScriptSource::new(),
            resolver,
            MockCaptionImporter::new(),
        );

        let (duration, offset) = workflow.resolve_timing().await.unwrap();
        assert_eq!(duration, 42.0);
        assert_eq!(offset, 0.0);
    }

    #[tokio::test]
    async fn test_auto_mode_substitutes_fallback_when_host_has_no_duration() {
        let mut resolver = MockDurationResolver::new();
        resolver.expect_resolve().returning(|| Ok(None));

        let workflow = workflow_with(
            test_config(TimingMode::Auto),
            MockScriptSource::new(),
            resolver,
            MockCaptionImporter::new(),
        );

        let (duration, offset) = workflow.resolve_timing().await.unwrap();
        assert_eq!(duration, 60.0);
        assert_eq!(offset, 0.0);
    }

    #[tokio::test]
    async fn test_auto_mode_bridge_failure_is_duration_unavailable() {
        let mut resolver = MockDurationResolver::new();
        resolver
            .expect_resolve()
            .returning(|| Err(ScriptCueError::Host("bridge not found".to_string())));

        let workflow = workflow_with(
            test_config(TimingMode::Auto),
            MockScriptSource::new(),
            resolver,
            MockCaptionImporter::new(),
        );

        assert!(matches!(
            workflow.resolve_timing().await,
            Err(ScriptCueError::DurationUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_manual_mode_resolves_range() {
        let mut config = test_config(TimingMode::Manual);
        config.generate.start_time = Some("00:00:10".to_string());
        config.generate.end_time = Some("00:00:50".to_string());

        let workflow = workflow_with(
            config,
            MockScriptSource::new(),
            MockDurationResolver::new(),
            MockCaptionImporter::new(),
        );

        let (duration, offset) = workflow.resolve_timing().await.unwrap();
        assert_eq!(duration, 40.0);
        assert_eq!(offset, 10.0);
    }

    #[tokio::test]
    async fn test_manual_mode_rejects_inverted_range() {
        let mut config = test_config(TimingMode::Manual);
        config.generate.start_time = Some("00:02:00".to_string());
        config.generate.end_time = Some("00:01:00".to_string());

        let workflow = workflow_with(
            config,
            MockScriptSource::new(),
            MockDurationResolver::new(),
            MockCaptionImporter::new(),
        );

        assert!(matches!(
            workflow.resolve_timing().await,
            Err(ScriptCueError::InvalidTimeRange(_))
        ));
    }

    #[tokio::test]
    async fn test_manual_mode_requires_both_bounds() {
        let mut config = test_config(TimingMode::Manual);
        config.generate.start_time = Some("00:00:00".to_string());

        let workflow = workflow_with(
            config,
            MockScriptSource::new(),
            MockDurationResolver::new(),
            MockCaptionImporter::new(),
        );

        assert!(matches!(
            workflow.resolve_timing().await,
            Err(ScriptCueError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_single_writes_document_and_imports() {
        let mut source = MockScriptSource::new();
        source
            .expect_load()
            .returning(|_| Ok("hello world\nfoo\nbar\n".to_string()));

        let mut resolver = MockDurationResolver::new();
        resolver.expect_resolve().returning(|| Ok(Some(40.0)));

        let mut importer = MockCaptionImporter::new();
        importer
            .expect_import()
            .times(1)
            .withf(|path: &Path| path.exists())
            .returning(|_| Ok(()));

        let workflow = workflow_with(
            test_config(TimingMode::Auto),
            source,
            resolver,
            importer,
        );

        let output_dir = tempfile::tempdir().unwrap();
        let output_path = workflow
            .generate_single(Path::new("script.txt"), Some(output_dir.path()))
            .await
            .unwrap();

        let document = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(
            document,
            "1\n00:00:00,000 --> 00:00:20,000\nhello world\n\n\
             2\n00:00:20,000 --> 00:00:30,000\nfoo\n\n\
             3\n00:00:30,000 --> 00:00:40,000\nbar\n\n"
        );
        assert!(output_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("subtitles_"));
    }

    #[tokio::test]
    async fn test_generate_single_empty_script_produces_no_file() {
        let mut source = MockScriptSource::new();
        source.expect_load().returning(|_| Ok("\n  \n".to_string()));

        let mut importer = MockCaptionImporter::new();
        importer.expect_import().times(0);

        let workflow = workflow_with(
            test_config(TimingMode::Auto),
            source,
            MockDurationResolver::new(),
            importer,
        );

        let output_dir = tempfile::tempdir().unwrap();
        let result = workflow
            .generate_single(Path::new("script.txt"), Some(output_dir.path()))
            .await;

        assert!(matches!(result, Err(ScriptCueError::EmptyScript)));
        assert_eq!(std::fs::read_dir(output_dir.path()).unwrap().count(), 0);
    }
}
