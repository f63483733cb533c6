//! Studio Server - release metadata API for the studio site.
//!
//! Product page loaders call this service on each render to populate their
//! download buttons. Lookups are cached in-process by `studio-core`.

mod handler;
mod server;

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use studio_core::{CacheConfig, NetworkConfig, ProviderConfig, ReleaseInfoProvider};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "studio-server")]
#[command(about = "Release metadata API for Randynamic Studio product pages")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Seconds a successful lookup stays cached
    #[arg(long, default_value_t = CacheConfig::SUCCESS_TTL.as_secs())]
    success_ttl_secs: u64,

    /// Seconds a failed lookup's placeholder stays cached
    #[arg(long, default_value_t = CacheConfig::FAILURE_TTL.as_secs())]
    failure_ttl_secs: u64,

    /// Timeout for each upstream request, in seconds
    #[arg(long, default_value_t = NetworkConfig::REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,

    /// Host that conventional manifest URLs are built on
    #[arg(long, default_value = NetworkConfig::GITHUB_HOST)]
    github_host: String,

    /// GitHub REST API base URL
    #[arg(long, default_value = NetworkConfig::GITHUB_API_BASE)]
    github_api_base: String,

    /// Token for authenticated GitHub API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

impl Args {
    fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::default()
            .with_success_ttl(Duration::from_secs(self.success_ttl_secs))
            .with_failure_ttl(Duration::from_secs(self.failure_ttl_secs))
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_github_host(self.github_host.clone())
            .with_github_api_base(self.github_api_base.clone())
            .with_github_token(self.github_token.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting Studio Server");

    let config = args.provider_config();
    info!(
        "Release cache TTLs: success {:?}, failure {:?}",
        config.success_ttl, config.failure_ttl
    );
    let provider = ReleaseInfoProvider::new(config)?;

    let addr = server::start_server(provider, &args.host, args.port).await?;
    info!("Studio server running on {}", addr);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
