//! jsonlog CLI
//!
//! Command-line tools for jsonlog stores.
//!
//! # Commands
//!
//! - `append` - Append records given as JSON
//! - `tail` - Print the last records of the active file
//! - `raw` - Print the active file as is
//! - `clear` - Truncate the active file
//! - `segments` - List archived segments

mod commands;

use clap::{Parser, Subcommand};
use jsonlog_core::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// jsonlog command-line store tools.
#[derive(Parser)]
#[command(name = "jsonlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the active log file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Rotate the active file once it reaches this many bytes
    #[arg(global = true, long)]
    max_file_size: Option<u64>,

    /// Retention cap on archived segments (0 keeps every archive)
    #[arg(global = true, long)]
    max_file_count: Option<usize>,

    /// Never rotate the active file
    #[arg(global = true, long)]
    no_rotation: bool,

    /// Do not add a timestamp field to appended records
    #[arg(global = true, long)]
    no_timestamp: bool,

    /// Fsync the active file after every append
    #[arg(global = true, long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn store_config(&self) -> Config {
        let mut config = Config::new()
            .rotation_enabled(!self.no_rotation)
            .add_timestamp(!self.no_timestamp)
            .sync_on_append(self.sync);
        if let Some(size) = self.max_file_size {
            config = config.max_file_size(size);
        }
        if let Some(count) = self.max_file_count {
            config = config.max_file_count(count);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Append records given as JSON
    Append {
        /// A JSON object, or an array of objects written as one batch.
        /// Reads one JSON value per line from stdin when omitted.
        json: Option<String>,
    },

    /// Print the last records of the active file
    Tail {
        /// Number of records
        #[arg(short = 'n', long, default_value = "10")]
        lines: usize,

        /// Pretty-print each record
        #[arg(long)]
        pretty: bool,
    },

    /// Print the active file as is
    Raw,

    /// Truncate the active file, keeping archived segments
    Clear,

    /// List archived segments, oldest first
    Segments {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.store_config();

    match cli.command {
        Commands::Append { json } => {
            let path = cli.path.ok_or("Log path required for append")?;
            commands::append::run(&path, config, json.as_deref())?;
        }
        Commands::Tail { lines, pretty } => {
            let path = cli.path.ok_or("Log path required for tail")?;
            commands::tail::run(&path, config, lines, pretty)?;
        }
        Commands::Raw => {
            let path = cli.path.ok_or("Log path required for raw")?;
            commands::tail::raw(&path, config)?;
        }
        Commands::Clear => {
            let path = cli.path.ok_or("Log path required for clear")?;
            commands::clear::run(&path, config)?;
        }
        Commands::Segments { format } => {
            let path = cli.path.ok_or("Log path required for segments")?;
            commands::segments::run(&path, config, &format)?;
        }
        Commands::Version => {
            println!("jsonlog CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("jsonlog core v{}", jsonlog_core::VERSION);
        }
    }

    Ok(())
}
