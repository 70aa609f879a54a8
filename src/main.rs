//! Demo entrypoint: replays stdin lines as editing sessions and prints frames.

use lineedit::{config::Config, session::run_session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let exit_code = run_and_report(run);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        print_help();
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lineedit=info,lineedit_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "loaded configuration");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let accepted = run_session(&config, stdin.lock(), stdout.lock())?;
    tracing::info!(lines = accepted.len(), "input finished");
    Ok(())
}

fn error_message(err: &anyhow::Error) -> String {
    format!("lineedit error: {:#}", err)
}

fn run_and_report<F>(runner: F) -> i32
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match runner() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", error_message(&err));
            1
        }
    }
}

fn print_help() {
    println!("lineedit demo\n");
    println!("Usage: lineedit [OPTIONS] < input\n");
    println!("Each input line is typed into a fresh editing session; DEL bytes act as");
    println!("Backspace and Ctrl-D on an empty line ends input.\n");
    println!("Options:");
    println!("  -h, --help                     Show this help message");
    println!("\nEnvironment variables:");
    println!("  LINEEDIT_REDRAW_INTERVAL_MS    Render-loop interval (default: 16)");
    println!("  LINEEDIT_JSON_FRAMES           Emit frames as JSON lines (default: false)");
    println!("  LINEEDIT_PROMPT                Prompt text (default: \"> \")");
    println!("  RUST_LOG                       Log filter (default: lineedit=info)");
}
