//! gemit - CLI entry point.

use std::env;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use gemit::{
    EnvSnapshot, GeminiClient, GitGateway, Settings, SystemRunner, TerminalPrompter, Workflow,
    WorkflowOptions,
};

/// Write git commit messages with Gemini.
#[derive(Parser, Debug)]
#[command(name = "gemit")]
#[command(about = "Write git commit messages with Gemini")]
#[command(version)]
struct Cli {
    /// What the change does, in your own words (prompted for if omitted)
    #[arg(value_name = "MESSAGE")]
    message: Vec<String>,

    /// Commit the first suggestion without asking (also accepts /y)
    #[arg(short = 'y', long = "yes")]
    yes: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Gemini model to use (overrides GEMIT_MODEL)
    #[arg(long)]
    model: Option<String>,
}

/// Flags clap knows about. Any other dash-prefixed argument is dropped
/// instead of becoming part of the message.
const KNOWN_LONG_FLAGS: [&str; 5] = ["--yes", "--verbose", "--model", "--help", "--version"];
const KNOWN_SHORT_FLAGS: &str = "yvhV";

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(normalize_args(env::args()));
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let env = EnvSnapshot::from_process();
    let settings = Settings::from_env(&env, cli.model.as_deref());
    debug!(
        "Settings: model={}, api_base={}, timeout={:?}",
        settings.model, settings.api_base, settings.timeout
    );

    let workdir = env::current_dir().context("Failed to read the current directory")?;
    let prompter = TerminalPrompter::new();
    let gateway = GitGateway::new(SystemRunner::new(workdir), &prompter);
    let client = GeminiClient::new(&settings).context("Failed to set up the Gemini client")?;

    let options = WorkflowOptions {
        intent: Some(cli.message.join(" ")).filter(|m| !m.trim().is_empty()),
        auto_confirm: cli.yes,
    };

    let outcome = Workflow::new(&gateway, &client, &prompter, env, options)
        .run()
        .await
        .context("Interactive prompt failed")?;

    debug!("Outcome: {:?}", outcome);
    Ok(())
}

/// Set up tracing on stderr.
fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_new("gemit=debug,warn").unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Rewrite `/y` to `-y` and drop every other dash-prefixed argument clap
/// does not know, so none of them end up in the message.
///
/// The first element (the program name) is kept as is. A bare `-` and `--`
/// are dropped like any other unknown argument.
fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut normalized: Vec<String> = args.next().into_iter().collect();

    for arg in args {
        if arg == "/y" {
            normalized.push("-y".to_string());
        } else if !arg.starts_with('-') || is_known_flag(&arg) {
            normalized.push(arg);
        }
    }

    normalized
}

fn is_known_flag(arg: &str) -> bool {
    if let Some(long) = arg.strip_prefix("--") {
        let name = long.split_once('=').map_or(long, |(name, _)| name);
        return KNOWN_LONG_FLAGS.contains(&format!("--{}", name).as_str());
    }
    arg.strip_prefix('-')
        .is_some_and(|short| !short.is_empty() && short.chars().all(|c| KNOWN_SHORT_FLAGS.contains(c)))
}
