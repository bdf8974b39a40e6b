//! # shiptrack CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;
use zeroize::Zeroizing;

use shiptrack_cli::account::{run_login, run_logout, run_signup, CredentialArgs};
use shiptrack_cli::api::DEFAULT_API_URL;
use shiptrack_cli::session::DEFAULT_SESSION_FILE;
use shiptrack_cli::shipments::{run_create, run_list, run_track, CreateArgs, TrackArgs};
use shiptrack_cli::CliContext;

/// shiptrack: create and track shipments from the terminal.
#[derive(Parser, Debug)]
#[command(name = "shiptrack", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the shiptrack API.
    #[arg(long, env = "SHIPTRACK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: Url,

    /// Session file.
    #[arg(long, env = "SHIPTRACK_SESSION", default_value = DEFAULT_SESSION_FILE, global = true)]
    session: PathBuf,

    /// Platform base URL (account commands).
    #[arg(long, env = "PROJECT_URL", global = true)]
    project_url: Option<String>,

    /// Platform anon key (account commands).
    #[arg(long, env = "ANON_KEY", hide_env_values = true, global = true)]
    anon_key: Option<String>,

    /// HTTP timeout in seconds.
    #[arg(long, env = "SUPABASE_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account.
    Signup(CredentialArgs),
    /// Sign in and save the session.
    Login(CredentialArgs),
    /// Sign out and delete the session.
    Logout,
    /// Create a shipment.
    Create(CreateArgs),
    /// List your shipments, newest first.
    List,
    /// Look up a shipment by tracking number.
    Track(TrackArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext {
        api_url: cli.api_url,
        session_path: cli.session,
        project_url: cli.project_url,
        anon_key: cli.anon_key.map(Zeroizing::new),
        timeout_secs: cli.timeout_secs,
    };
    tracing::debug!(?ctx, "shiptrack CLI starting");

    let result = match cli.command {
        Commands::Signup(args) => run_signup(&ctx, &args).await,
        Commands::Login(args) => run_login(&ctx, &args).await,
        Commands::Logout => run_logout(&ctx).await,
        Commands::Create(args) => run_create(&ctx, args).await,
        Commands::List => run_list(&ctx).await,
        Commands::Track(args) => run_track(&ctx, &args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
