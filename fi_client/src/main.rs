//! A terminal client for the FlexInvest investment platform.
//!
//! The client restores any saved session, opens the requested page and
//! then reads commands from stdin until `quit` or EOF.

use anyhow::{Context, Result};
use fi_client::{config::ClientConfig, logging, shell::Shell};
use flexinvest::{ApiClient, FileStorage, SessionStore};
use pico_args::Arguments;
use std::path::PathBuf;
use std::sync::Arc;

const HELP: &str = "\
Terminal client for the FlexInvest platform

USAGE:
  fi_client [OPTIONS]

OPTIONS:
  --api URL             Backend API URL  [default: http://localhost:8000/api]
  --session PATH        File the session tokens are kept in
  --open PATH           Page to open first  [default: /]

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  FLEXINVEST_API_URL, FLEXINVEST_SESSION_FILE, FLEXINVEST_REQUEST_TIMEOUT_SECS
";

struct Args {
    api_url: Option<String>,
    session_file: Option<PathBuf>,
    open: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        api_url: pargs.opt_value_from_str("--api").ok().flatten(),
        session_file: pargs.opt_value_from_str("--session").ok().flatten(),
        open: pargs
            .value_from_str("--open")
            .unwrap_or_else(|_| "/".to_string()),
    };

    // A missing .env file is fine
    dotenvy::dotenv().ok();
    logging::init();

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.api_url, args.session_file)
        .context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    log::info!("Using backend at {}", config.api_url);
    log::debug!("Session file: {}", config.session_file.display());

    let api = ApiClient::with_timeout(&config.api_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let storage = Arc::new(FileStorage::new(config.session_file.clone()));
    let session = Arc::new(SessionStore::open(api, storage));
    session.initialize().await;

    let mut shell = Shell::new(session);
    print!("{}", shell.go(&args.open).await);
    shell.run().await
}
