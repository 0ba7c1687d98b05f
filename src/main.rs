use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::json;
use tracing::info;

use credential_broker::authenticators::build_authenticator;
use credential_broker::cache::caching_authenticator::CachingAuthenticator;
use credential_broker::cache::refresh_policy::RefreshPolicy;
use credential_broker::config::loader::load_config;
use credential_broker::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "credential-broker.yaml")]
    config: String,
    /// Named credential entry to acquire a token for
    #[arg(short = 'n', long, env = "CREDENTIAL")]
    credential: String,
    /// Bypass the cache and contact the identity provider directly
    #[arg(long)]
    force_refresh: bool,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = load_config(&args.config)?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build the requested backend
    // -------------------------------

    let credential_config = service_config
        .credentials
        .get(&args.credential)
        .ok_or_else(|| anyhow!("credential '{}' not found in config", args.credential))?;
    let backend = build_authenticator(credential_config)?;

    // -------------------------------
    // 3. Acquire through the caching layer
    // -------------------------------

    let policy = service_config
        .settings
        .safety_margin_seconds
        .map(RefreshPolicy::with_margin_seconds)
        .unwrap_or_default();
    let authenticator = CachingAuthenticator::new(backend).with_policy(policy);

    info!(credential = %args.credential, "acquiring token");
    let token = authenticator.get_token(args.force_refresh).await?;

    println!(
        "{}",
        json!({
            "access_token": token.access_token,
            "expires_on": token.expires_on.to_rfc3339(),
        })
    );
    Ok(())
}
