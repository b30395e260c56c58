use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hotrun::console;
use hotrun::prelude::*;

/// Re-run a script through its interpreter whenever it changes.
///
/// Type `reload` and press Enter to run the file again without editing it.
#[derive(Parser, Debug)]
#[command(name = "hotrun", version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    \
    HOTRUN_INTERPRETERS__<EXT>    Path-list of interpreters to probe for <ext>\n    \
    RUST_LOG=debug                Enable debug logging")]
struct Cli {
    /// Script to watch and run.
    file: PathBuf,

    /// Milliseconds between modification checks.
    #[arg(long = "poll-ms", default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    poll_ms: u64,

    /// Do not read the `reload` command from stdin.
    #[arg(long = "no-stdin")]
    no_stdin: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing based on RUST_LOG env var
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => {
            console::warn("\nBye Bye");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            if e.is_resolution_error() {
                eprintln!("Set HOTRUN_INTERPRETERS__<EXT> to a path-list of interpreters to add or override one.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut builder = WatchSession::builder()
        .with_file(cli.file)
        .with_env_overrides("HOTRUN", "__")
        .with_poll_interval(Duration::from_millis(cli.poll_ms));
    if cli.no_stdin {
        builder = builder.without_input();
    }

    builder.build()?.run().await
}
