//! CLI module - Command definitions and handlers
//!
//! Handlers return the process exit code; `main` owns the actual exit.
//!
//! Tool flags go before the subcommand. Everything after `compile`'s
//! positionals and after `memory` belongs to the forwarded command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::forward::ForwardError;

pub mod compile;
pub mod config;
pub mod info;
pub mod memory;
pub mod query;

/// Install hint shown when the aura toolchain is missing
pub const INSTALL_HINT: &str = "pip install auralith-aura";

/// aura-gemini - Aura knowledge base helper for agent shells
///
/// Compile directories into .aura archives, search them, inspect them,
/// and manage agent memory.
#[derive(Parser, Debug)]
#[command(name = "aura-gemini")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, env = "AURA_GEMINI_CONFIG")]
    pub config: Option<PathBuf>,

    /// `aura` executable (overrides tools.aura_bin)
    #[arg(long, env = "AURA_BIN")]
    pub aura_bin: Option<String>,

    /// Python interpreter with the aura package (overrides tools.python)
    #[arg(long, env = "AURA_GEMINI_PYTHON")]
    pub python: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a directory into an .aura knowledge base
    Compile(compile::CompileArgs),

    /// Search through an .aura knowledge base
    Query(query::QueryArgs),

    /// Show information about an .aura archive
    Info(info::InfoArgs),

    /// Manage agent memory (arguments go to aura.memory)
    #[command(disable_help_flag = true)]
    Memory(memory::MemoryArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}

/// Run the parsed command line and return the exit code
pub fn run(cli: Cli) -> Result<i32> {
    let load_config = || -> Result<Config> {
        Ok(Config::load_or_default(cli.config.as_deref())?
            .with_overrides(cli.aura_bin.clone(), cli.python.clone()))
    };

    match cli.command {
        Commands::Compile(args) => compile::run(args, &load_config()?),
        Commands::Query(args) => query::run(args, &load_config()?),
        Commands::Info(args) => info::run(args, &load_config()?),
        Commands::Memory(args) => memory::run(args, &load_config()?),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}

/// Attach the install hint when a forwarded executable is missing
pub(crate) fn forward_error(err: ForwardError) -> anyhow::Error {
    if err.is_not_found() {
        let program = err.program().to_string();
        anyhow::Error::new(err).context(format!("{program} not found. Run: {INSTALL_HINT}"))
    } else {
        err.into()
    }
}
