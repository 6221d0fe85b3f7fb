//! `aura-gemini memory` command
//!
//! Manages agent memory through the `aura.memory` module's command line.
//! Every argument, flags included, is passed through untouched.
//!
//! # Usage
//! ```bash
//! aura-gemini memory list
//! aura-gemini memory --help      # help of aura.memory, not of this tool
//! ```

use anyhow::Result;
use clap::Args;

use super::forward_error;
use crate::config::Config;
use crate::core::forward::Invocation;

#[derive(Args, Debug)]
pub struct MemoryArgs {
    /// Arguments for the memory module
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub fn run(args: MemoryArgs, config: &Config) -> Result<i32> {
    Invocation::new(&config.tools.python)
        .arg("-m")
        .arg(&config.tools.memory_module)
        .args(&args.args)
        .run()
        .map_err(forward_error)
}
