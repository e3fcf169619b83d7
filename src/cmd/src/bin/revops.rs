use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use cmd::command::bowtie;
use cmd::command::funnel;
use cmd::command::strategy;
use cmd::config::LogLevel;
use cmd::error::Error;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Subcommand, Clone)]
enum Commands {
    /// Aggregate funnel steps into the seven bowtie stages
    Bowtie(bowtie::Bowtie),
    /// Step conversions and summary of a raw funnel
    Funnel(funnel::Funnel),
    /// Manage tenant strategies
    Strategy(strategy::Strategy),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the level from the config file
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            cmd::config::load(path).with_context(|| format!("loading config {path:?}"))?
        }
        None => common::config::Config::default(),
    };
    if let Some(level) = args.log_level {
        cfg.log.level = level.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.log.level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;
    info!("RevOps v{}", env!("CARGO_PKG_VERSION"));

    let Some(command) = &args.command else {
        return Err(Error::BadRequest("no command specified".to_string()).into());
    };

    let mut out = io::stdout().lock();
    match command {
        Commands::Bowtie(args) => bowtie::run(args, &mut out)?,
        Commands::Funnel(args) => funnel::run(args, &mut out)?,
        Commands::Strategy(args) => {
            let md = strategy::open(&cfg).context("opening strategy store")?;
            strategy::run(&md, &args.cmd, &mut out)?
        }
    }

    Ok(())
}
