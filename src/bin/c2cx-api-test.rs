//! C2CX API integration test.
//!
//! Checks prices, reads balances, places orders that cannot execute, checks
//! and cancels them, then prints a summary of every API call made.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use c2cx_api_client::auth::{Credentials, DEFAULT_CREDENTIALS_FILE, StaticCredentials};
use c2cx_api_client::error::CREDENTIALS_LOAD_MESSAGE;
use c2cx_api_client::rest::{C2CX_BASE_URL, C2cxRestClient};
use c2cx_api_client::workflow::{
    DEFAULT_STALENESS_WINDOW, WorkflowConfig, WorkflowRunner, format_timestamp,
};
use clap::Parser;
use time::OffsetDateTime;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

const SUPPORT_ADVICE: &str = "\
Please let C2CX Customer Service know if you believe any failure is
a C2CX server or API problem.
Double check that your API Key and Secret Key are correct.
Copy and paste results of this test and send to C2CX Customer Service.
Remember never send your API key or Secret Key over e-mail or WeChat!";

/// Run the C2CX API integration test against a live account
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Credentials file path (can also be set via C2CX_CREDENTIALS env var)
    #[arg(short, long)]
    credentials: Option<String>,

    /// REST API base URL
    #[arg(long, default_value = C2CX_BASE_URL)]
    base_url: String,

    /// Maximum order book age in seconds
    #[arg(long, default_value_t = DEFAULT_STALENESS_WINDOW.as_secs())]
    staleness_secs: u64,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure_skip_tls_verify: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting C2CX API test v{}", env!("CARGO_PKG_VERSION"));

    // CLI arg > C2CX_CREDENTIALS env var > default
    let credentials_path = args
        .credentials
        .or_else(|| std::env::var("C2CX_CREDENTIALS").ok())
        .unwrap_or_else(|| DEFAULT_CREDENTIALS_FILE.to_string());

    info!(credentials_path = %credentials_path, base_url = %args.base_url, "Loading credentials");

    let config = WorkflowConfig {
        staleness_window: Duration::from_secs(args.staleness_secs),
        ..WorkflowConfig::default()
    };

    let credentials = match Credentials::from_file(&credentials_path) {
        Ok(credentials) => credentials,
        Err(e) => {
            debug!(error = %e, "credentials not loaded");
            println!("{CREDENTIALS_LOAD_MESSAGE}");
            return ExitCode::FAILURE;
        }
    };

    let client = match C2cxRestClient::builder()
        .base_url(args.base_url)
        .credentials(Arc::new(StaticCredentials::from(credentials)))
        .danger_accept_invalid_certs(args.insecure_skip_tls_verify)
        .try_build()
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to create HTTP client");
            return ExitCode::FAILURE;
        }
    };
    let runner = WorkflowRunner::new(client, config);

    println!(
        "Starting tests ========================== {}",
        format_timestamp(OffsetDateTime::now_utc())
    );

    let report = runner.run().await;

    println!("\n{report}");
    if report.tally.fail() > 0 {
        println!("\n\n{SUPPORT_ADVICE}");
    }
    println!("\nThank you and enjoy trading with C2CX!\n");

    ExitCode::SUCCESS
}
