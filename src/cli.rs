use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a timed subtitle file from a plain-text script
    Generate {
        /// Input script file
        #[arg(short, long)]
        script: PathBuf,

        /// Output directory for the generated subtitle file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Word spacing factor (1.0 to 15.0)
        #[arg(long)]
        word_spacing: Option<f64>,

        /// Timing mode: auto or manual
        #[arg(long)]
        timing_mode: Option<String>,

        /// Start time for manual mode (HH:MM:SS, optional ,mmm suffix)
        #[arg(long)]
        start_time: Option<String>,

        /// End time for manual mode (HH:MM:SS, optional ,mmm suffix)
        #[arg(long)]
        end_time: Option<String>,

        /// Skip importing the generated file into the host project
        #[arg(long)]
        no_import: bool,
    },

    /// Generate subtitle files for every .txt script in a directory
    Batch {
        /// Input directory containing script files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Output directory for generated subtitle files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Word spacing factor (1.0 to 15.0)
        #[arg(long)]
        word_spacing: Option<f64>,

        /// Timing mode: auto or manual
        #[arg(long)]
        timing_mode: Option<String>,

        /// Start time for manual mode (HH:MM:SS, optional ,mmm suffix)
        #[arg(long)]
        start_time: Option<String>,

        /// End time for manual mode (HH:MM:SS, optional ,mmm suffix)
        #[arg(long)]
        end_time: Option<String>,

        /// Skip importing generated files into the host project
        #[arg(long)]
        no_import: bool,
    },

    /// Query the host bridge for the active sequence duration
    Duration,

    /// Write a default config.toml to the working directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
