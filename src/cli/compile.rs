//! `aura-gemini compile` command
//!
//! Compiles a directory into an `.aura` knowledge base with the external
//! `aura` executable.
//!
//! # Usage
//! ```bash
//! aura-gemini compile ./docs                      # -> knowledge.aura
//! aura-gemini compile ./docs kb.aura
//! aura-gemini compile ./docs kb.aura --pii-mask   # extra args forwarded
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::forward_error;
use crate::config::Config;
use crate::core::forward::Invocation;

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Directory to compile
    pub input_dir: PathBuf,

    /// Output archive (default: compile.default_output, "knowledge.aura")
    pub output_file: Option<PathBuf>,

    /// Extra arguments passed through to `aura compile`
    #[arg(num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

pub fn run(args: CompileArgs, config: &Config) -> Result<i32> {
    let output = args
        .output_file
        .unwrap_or_else(|| config.compile.default_output.clone());

    let invocation = Invocation::new(&config.tools.aura_bin)
        .arg("compile")
        .arg(&args.input_dir)
        .arg("--output")
        .arg(&output)
        .args(&args.extra);

    println!(
        "🔥 Compiling {} → {}",
        args.input_dir.display(),
        output.display()
    );

    let code = invocation.run().map_err(forward_error)?;

    if code == 0 {
        println!("✅ Knowledge base created: {}", output.display());
    } else {
        println!("❌ Compilation failed with exit code {}", code);
    }

    Ok(code)
}
