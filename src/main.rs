//! scriptcue - Proportionally Timed Subtitle Generation
//!
//! This is the main entry point for the scriptcue application, which
//! turns plain-text scripts into timed SRT caption tracks and hands the
//! generated files to a host video editor through a bridge command.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use scriptcue::cli::{Args, Commands};
use scriptcue::config::{Config, TimingMode};
use scriptcue::error::ScriptCueError;
use scriptcue::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let mut config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Generate {
            script,
            output_dir,
            word_spacing,
            timing_mode,
            start_time,
            end_time,
            no_import,
        } => {
            info!("Generating subtitles from {}", script.display());

            apply_overrides(
                &mut config,
                word_spacing,
                timing_mode.as_deref(),
                start_time,
                end_time,
                no_import,
            )?;

            let workflow = Workflow::new(config);
            let output_path = workflow
                .generate_single(&script, output_dir.as_deref())
                .await?;
            println!("Subtitle file: {}", output_path.display());
        }
        Commands::Batch {
            input_dir,
            output_dir,
            word_spacing,
            timing_mode,
            start_time,
            end_time,
            no_import,
        } => {
            info!("Generating subtitles for scripts in {}", input_dir.display());

            apply_overrides(
                &mut config,
                word_spacing,
                timing_mode.as_deref(),
                start_time,
                end_time,
                no_import,
            )?;

            let workflow = Workflow::new(config);
            workflow
                .generate_directory(&input_dir, output_dir.as_deref())
                .await?;
        }
        Commands::Duration => {
            let workflow = Workflow::new(config.clone());
            match workflow.host_duration().await? {
                Some(duration) => println!("Active sequence duration: {:.3}s", duration),
                None => println!(
                    "Host reported no duration; generation would fall back to {:.0}s",
                    config.generate.fallback_duration
                ),
            }
        }
        Commands::Init { force } => {
            let path = std::path::Path::new("config.toml");
            if path.exists() && !force {
                return Err(ScriptCueError::Config(
                    "config.toml already exists, pass --force to overwrite".to_string(),
                )
                .into());
            }
            Config::default().save_to_file(path)?;
            println!("Wrote default configuration to config.toml");
        }
    }

    info!("scriptcue completed successfully");
    Ok(())
}

/// Fold CLI overrides into the loaded configuration
fn apply_overrides(
    config: &mut Config,
    word_spacing: Option<f64>,
    timing_mode: Option<&str>,
    start_time: Option<String>,
    end_time: Option<String>,
    no_import: bool,
) -> Result<()> {
    if let Some(spacing) = word_spacing {
        config.generate.word_spacing = spacing;
    }
    if let Some(mode) = timing_mode {
        config.generate.timing_mode = parse_timing_mode(mode)?;
    }
    if start_time.is_some() {
        config.generate.start_time = start_time;
    }
    if end_time.is_some() {
        config.generate.end_time = end_time;
    }
    if no_import {
        config.host.import = false;
    }
    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let scriptcue_dir = std::env::current_dir()?.join(".scriptcue");
    let log_dir = scriptcue_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "scriptcue.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Parse timing mode from string
fn parse_timing_mode(mode: &str) -> Result<TimingMode> {
    match mode.to_lowercase().as_str() {
        "auto" => Ok(TimingMode::Auto),
        "manual" => Ok(TimingMode::Manual),
        _ => Err(ScriptCueError::Config(format!(
            "Invalid timing mode '{}'. Valid modes: auto, manual",
            mode
        ))
        .into()),
    }
}
