// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! pidnet CLI - Prague PID metro and tram network for the GN course

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use pidnet::commands::{self, Output};
use pidnet::config::{self, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pidnet")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(short, long, env = "PIDNET_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// GTFS cache directory override
    #[arg(long, env = "PIDNET_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,

    /// Data directory override (network snapshot)
    #[arg(long, env = "PIDNET_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_color: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and extract the PID GTFS tables unless already cached
    Fetch {
        /// Download even if the tables are cached
        #[arg(long)]
        force: bool,
    },

    /// Rebuild the network snapshot from the cached tables
    Build,

    /// Print network statistics
    Summary,

    /// List stops with their degree and position
    Stops {
        /// Only stops whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show the segments leaving and entering one stop
    Stop {
        /// Stop name (exact or unambiguous part)
        name: String,
    },

    /// Export the network to various formats
    Export {
        /// Output format (dot, json)
        #[arg(short, long, default_value = "dot")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the course environment setup checklist
    Setup {
        /// Use venv + pip instead of uv
        #[arg(long)]
        venv: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (omit to show all)
        key: Option<String>,

        /// Value to set (omit to get)
        value: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: clap_complete::Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = config::load(Some(config_path.as_path()))
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => tracing::Level::ERROR,
        0 => config.log_level.parse().unwrap_or(tracing::Level::INFO),
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let out = Output {
        json: cli.json,
        color: !cli.no_color,
    };

    // Execute command
    match cli.command {
        Commands::Fetch { force } => commands::fetch::run(&config, force, out),
        Commands::Build => commands::build::run(&config, out),
        Commands::Summary => commands::summary::run(&config, out),
        Commands::Stops { search } => commands::stops::run(&config, search, out),
        Commands::Stop { name } => commands::stop::run(&config, &name, out),
        Commands::Export { format, output } => commands::export::run(&config, &format, output),
        Commands::Setup { venv } => commands::setup::run(venv, out),
        Commands::Config { key, value } => {
            commands::config::run(&config_path, &config, key.as_deref(), value.as_deref())
        }
        Commands::Completions { shell } => commands::completions::run(shell, Cli::command()),
    }
}
