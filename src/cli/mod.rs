//! Command-line interface for `issuetrack`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::CliOverrides;
use crate::logging;

/// `issuetrack` - project-scoped issue tracker REST API.
#[derive(Parser, Debug)]
#[command(name = "issuetrack")]
#[command(
    author,
    version,
    about = "Project-scoped issue tracker REST API (flat JSON datastore)",
    long_about = None,
    after_help = "Routes: GET|POST|PUT|DELETE /api/issues/:project, GET /healthz"
)]
pub struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to a YAML config file
    #[arg(long, global = true, env = "ISSUETRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),

    /// Create an empty datastore file
    Init(InitArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Datastore file
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Datastore file
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Overwrite an existing datastore with an empty one
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long)]
    pub short: bool,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Collect command-line overrides for config resolution.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            config: self.config.clone(),
            log_json: self.log_json.then_some(true),
            ..Default::default()
        };
        match &self.command {
            Some(Commands::Serve(args)) => {
                overrides.host.clone_from(&args.host);
                overrides.port = args.port;
                overrides.data.clone_from(&args.data);
            }
            Some(Commands::Init(args)) => overrides.data.clone_from(&args.data),
            Some(Commands::Version(_)) | None => {}
        }
        overrides
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    match cli.command {
        Some(Commands::Version(ref args)) => commands::version::execute(args)?,
        Some(Commands::Init(ref args)) => {
            let config = crate::config::Config::load(&overrides)?;
            init_logging(&cli, config.log.json)?;
            commands::init::execute(&config, args.force)?;
        }
        Some(Commands::Serve(_)) => {
            let config = crate::config::Config::load(&overrides)?;
            init_logging(&cli, config.log.json)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(commands::serve::execute(&config))?;
        }
        None => println!("issuetrack - issue tracker REST API. Use --help for usage."),
    }

    Ok(())
}

fn init_logging(cli: &Cli, json: bool) -> Result<()> {
    logging::init_logging(cli.verbose, cli.quiet, json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}
