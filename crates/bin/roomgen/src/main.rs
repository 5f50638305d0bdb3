//! # roomgen: room module generator
//!
//! Composition root that wires the filesystem adapter into the generate
//! service and runs one compilation.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging
//! - Load the house description
//! - Construct the artifact sink and the generate service
//! - Report failures with their full cause chain and a non-zero exit code
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use roomgen_adapter_fs::FsArtifactSink;
use roomgen_app::render::RenderOptions;
use roomgen_app::services::GenerateService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Compile a house description into TypeScript room modules.
#[derive(Debug, Parser)]
#[command(name = "roomgen", version, about)]
struct Cli {
    /// Configuration file (defaults to ./roomgen.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// House description, JSON or TOML
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Directory receiving the generated room folders
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(input) = cli.input {
        config.paths.input = input;
    }
    if let Some(output_dir) = cli.output_dir {
        config.paths.output_dir = output_dir;
    }
    config.validate()?;

    init_tracing(&config.logging.filter, cli.verbose);
    tracing::info!(
        input = %config.paths.input.display(),
        output_dir = %config.paths.output_dir.display(),
        "roomgen starting"
    );

    let house = roomgen_adapter_fs::load_house(&config.paths.input)?;

    let options = RenderOptions {
        runtime_module: config.codegen.runtime_module,
        registry_file: config.paths.registry_file,
    };
    let sink = FsArtifactSink::new(config.paths.output_dir);
    let mut service = GenerateService::new(sink, options);
    service.run(&house).context("generation failed")?;

    Ok(())
}

fn init_tracing(filter: &str, verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("roomgen=info")),
        1 => EnvFilter::new("roomgen=debug"),
        _ => EnvFilter::new("roomgen=trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
