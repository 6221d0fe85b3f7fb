//! aura-gemini CLI - Entry point
//!
//! Usage: aura-gemini <command> [args...]
//!
//! Exit codes: usage errors and internal failures exit 1, forwarded
//! commands exit with the child's code.

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aura_gemini::cli::Cli;
use aura_gemini::core::loader::LoaderError;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            // Usage goes to stdout, matching the banners.
            print!("{}", e.render());
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let code = match aura_gemini::cli::run(cli) {
        Ok(code) => code,
        Err(e) => report(&e),
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Print a failure and pick its exit code
fn report(err: &anyhow::Error) -> i32 {
    if let Some(LoaderError::Unavailable) = err.downcast_ref::<LoaderError>() {
        println!("❌ {}", LoaderError::Unavailable);
        return 1;
    }

    tracing::debug!(error = ?err, "command failed");
    eprintln!("❌ {:#}", err);
    1
}
