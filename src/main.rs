mod api;
mod app;
mod cache;
mod commands;
mod config;
mod debounce;
mod event;
mod listing;
mod notify;
mod resources;
mod session;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "A terminal dashboard for a portfolio & CV backend")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/folio/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the API base URL from the config file
  #[arg(long)]
  api_url: Option<String>,

  /// Log file path (logs never go to the terminal)
  #[arg(long, default_value = "/tmp/folio.log")]
  log_file: PathBuf,

  /// Increase log verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Forget the stored session token and exit
  #[arg(long)]
  logout: bool,
}

/// Set up file-based tracing. Logging to stdout/stderr would corrupt the
/// TUI, so everything goes to a file through a non-blocking writer. The
/// returned guard must live as long as the application so logs are flushed.
fn setup_tracing(args: &Args) -> WorkerGuard {
  let log_level = match args.verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("folio={log_level}")));

  let log_dir = args
    .log_file
    .parent()
    .unwrap_or(std::path::Path::new("/tmp"));
  let log_filename = args
    .log_file
    .file_name()
    .unwrap_or(std::ffi::OsStr::new("folio.log"));

  let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
    .init();

  guard
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = setup_tracing(&args);

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // Override API URL if specified on command line
  let config = if let Some(url) = args.api_url {
    config::Config {
      api: config::ApiConfig { url },
      ..config
    }
  } else {
    config
  };

  // Restore the persisted session; an environment token takes precedence
  // and is written back for the next run
  let store = session::SessionStore::open()?;
  if args.logout {
    store.clear()?;
    println!("Session cleared.");
    return Ok(());
  }
  let mut session = store.hydrate()?;
  if let Some(token) = config::Config::env_token() {
    session.token = Some(token);
    store.save(&session)?;
  }

  // Initialize and run the app
  let mut app = app::App::new(config, session)?;
  app.run().await?;

  Ok(())
}
