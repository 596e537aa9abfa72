//! badge-cli: fetch Open Badges collections through the badgeflow stores
//!
//! Boots the stores against a live server, runs the action loop until every
//! request has resolved and prints the resulting collections as JSON.
//!
//! # Usage
//!
//! ```sh
//! # Earner badges and collections from a local server
//! cargo run -p badge-cli -- fetch earner_badges earner_collections
//!
//! # Assertions of one badge class
//! BADGEFLOW_BASE_URL=https://badges.example.org cargo run -p badge-cli -- \
//!     get /v1/issuer/issuers/acme/badges/gold/assertions issuer_badgeinstances
//! ```

use anyhow::{bail, Context, Result};
use badgeflow_client::events::API_STORE_FAILURE;
use badgeflow_client::{drain_events, App, ClientConfig, RequestContext};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "badge-cli")]
#[command(about = "Fetch Open Badges collections through the badgeflow stores")]
struct Args {
    /// Server origin the API paths are resolved against
    #[arg(long, env = "BADGEFLOW_BASE_URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// CSRF token to send instead of the `csrftoken` cookie
    #[arg(long, env = "BADGEFLOW_CSRF_TOKEN")]
    csrf_token: Option<String>,

    /// JSON client configuration; flags override its values
    #[arg(long, env = "BADGEFLOW_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch registered collections by key
    Fetch {
        #[arg(required = true)]
        collections: Vec<String>,
    },
    /// GET an API path into a collection
    Get { path: String, collection: String },
    /// Wait for actions until Ctrl-C
    Watch { collections: Vec<String> },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,badgeflow_client=info",
        1 => "info,badgeflow_client=debug,badgeflow_core=debug",
        _ => "debug,badgeflow_client=trace,badgeflow_core=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ClientConfig::from_json(&json).context("Invalid client configuration")?
        }
        None => ClientConfig::default(),
    };
    config.base_url = args.base_url.clone();
    if let Some(token) = &args.csrf_token {
        config.csrf_token = Some(token.clone());
    }
    Ok(config)
}

fn print_collections(app: &App, keys: &[String]) -> Result<()> {
    let output: Map<String, Value> = keys
        .iter()
        .map(|key| {
            let items = app.stores().api.get_collection(key).to_vec();
            (key.clone(), Value::Array(items))
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    tracing::info!(base_url = %config.base_url, "Starting badge-cli");
    let mut app = App::new(&config).context("Failed to build client")?;
    let mut failures = app.subscribe(API_STORE_FAILURE);

    let keys = match args.command {
        Command::Fetch { collections } => {
            app.actions().fetch_collections(collections.iter().cloned());
            app.run_until_idle().await;
            collections
        }
        Command::Get { path, collection } => {
            app.actions()
                .get_data(RequestContext::get(path, collection.as_str()).replacing());
            app.run_until_idle().await;
            vec![collection]
        }
        Command::Watch { collections } => {
            let cancel = CancellationToken::new();
            let stopper = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    stopper.cancel();
                }
            });
            app.actions().fetch_collections(collections.iter().cloned());
            app.run(cancel).await;
            collections
        }
    };

    if !drain_events(&mut failures).is_empty() {
        let reason = app
            .stores()
            .api
            .last_failure()
            .map(|m| m.content.clone())
            .unwrap_or_else(|| "request failed".into());
        if !app.stores().api.collections_exist(&keys) {
            bail!(reason);
        }
        tracing::warn!(%reason, "Some requests failed");
    }

    print_collections(&app, &keys)
}
