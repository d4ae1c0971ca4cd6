mod colors;
mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use kegbridge::{BridgeConfig, SystemBridge};
use std::path::PathBuf;
use std::process::exit;

#[derive(Parser)]
#[command(name = "kegbridge")]
#[command(author, version, about = "Route brew:, cask: and system: dependencies to Homebrew", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the brew executable (overrides KEGBRIDGE_BREW and probing)
    #[arg(long, global = true, value_name = "PATH")]
    brew: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tell whether a dependency specifier is handled by kegbridge
    Check {
        /// Specifier, e.g. brew:wget
        specifier: String,

        /// Package name used when the specifier names no target
        #[arg(long)]
        package: Option<String>,
    },

    /// Run one specifier against Homebrew
    Awaken {
        /// The host's name for the dependency
        package: String,

        /// Specifier, e.g. cask:firefox or system:update
        specifier: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install formulas, casks and taps listed under system.brew
    Harmonize {
        /// Manifest file (defaults to package.json)
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// Print per-item results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export installed formulas, casks and taps
    Snapshot {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show normalized metadata for a formula or cask
    Info {
        /// Formula or cask name
        name: String,

        /// Treat the name as a cask
        #[arg(long)]
        cask: bool,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Awaken { json, .. }
            | Commands::Harmonize { json, .. }
            | Commands::Snapshot { json }
            | Commands::Info { json, .. } => *json,
            Commands::Check { .. } | Commands::Completions { .. } => false,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    colors::init_colors(cli.command.wants_json());

    let ok = match cli.command {
        Commands::Check { specifier, package } => commands::check(&specifier, package.as_deref()),
        Commands::Completions { shell } => {
            commands::completions::<Cli>(shell);
            true
        }
        command => {
            let config = BridgeConfig::from_env()
                .with_overrides(cli.brew, None)
                .with_brew_output_on_stderr(command.wants_json());
            let config = match &command {
                Commands::Harmonize { manifest, .. } => {
                    config.with_overrides(None, manifest.clone())
                }
                _ => config,
            };

            let mut bridge = match SystemBridge::connect(&config).await {
                Ok(bridge) => bridge,
                Err(e) => {
                    eprintln!("{} {}", "✗".red(), e);
                    eprintln!("Install Homebrew or set {} to its path", "KEGBRIDGE_BREW".cyan());
                    exit(1);
                }
            };

            if let kegbridge::ScanStatus::Degraded { reason } = bridge.scan_status() {
                tracing::warn!("installed scan incomplete: {}", reason);
            }

            match command {
                Commands::Awaken {
                    package,
                    specifier,
                    json,
                } => commands::awaken(&mut bridge, &package, &specifier, json).await?,
                Commands::Harmonize { json, .. } => {
                    commands::harmonize(&mut bridge, &config.manifest_path, json).await?
                }
                Commands::Snapshot { json } => {
                    commands::snapshot(&bridge, json).await?;
                    true
                }
                Commands::Info { name, cask, json } => {
                    commands::info(&bridge, &name, cask, json).await?;
                    true
                }
                Commands::Check { .. } | Commands::Completions { .. } => true,
            }
        }
    };

    if !ok {
        exit(1);
    }

    Ok(())
}
