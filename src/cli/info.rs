//! `aura-gemini info` command
//!
//! Shows information about an `.aura` archive via `aura info`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::forward_error;
use crate::config::Config;
use crate::core::forward::Invocation;

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Archive to inspect
    pub archive: PathBuf,

    /// Anything after the archive is ignored
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub ignored: Vec<String>,
}

pub fn run(args: InfoArgs, config: &Config) -> Result<i32> {
    if !args.ignored.is_empty() {
        tracing::debug!(ignored = ?args.ignored, "extra info arguments dropped");
    }

    Invocation::new(&config.tools.aura_bin)
        .arg("info")
        .arg(&args.archive)
        .run()
        .map_err(forward_error)
}
