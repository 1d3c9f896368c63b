//! darki CLI
//!
//! Runs the search API server and offers a one-shot link checker.

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use darki_api::{ApiConfig, ApiServer};
use darki_core::constants::DEFAULT_PORT;
use darki_core::ReleaseId;
use darki_debrid::{LinkResolver, ResolutionPath, ResolverConfig};

/// darki - caching search proxy with debrid link checks
#[derive(Parser)]
#[command(name = "darki")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "DARKIWORLD_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Check which links are alive
    Check {
        /// Links to check
        #[arg(required = true)]
        links: Vec<String>,
        /// AllDebrid API key; without it every link is probed directly
        #[arg(long, env = "DARKIWORLD_ALLDEBRID_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // DEBUG=true behaves like --verbose
    let debug_env = std::env::var("DEBUG")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let filter = if cli.verbose || debug_env {
        "darki=debug,info"
    } else {
        "darki=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Check {
            links,
            api_key,
            json,
        } => cmd_check(links, api_key, json).await,
    }
}

/// Run the API server
async fn cmd_serve(port: u16, bind: &str) -> Result<()> {
    let mut config = ApiConfig::from_env();
    config.port = port;

    println!("{}", "🚀 Starting darki API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    println!(
        "   {} {}",
        "Link checks:".dimmed(),
        if config.alldebrid_key.is_some() {
            "AllDebrid batch"
        } else {
            "direct probes (no AllDebrid key)"
        }
    );
    if !config.allowed_hosters.is_empty() {
        println!(
            "   {} {}",
            "Hosters:".dimmed(),
            config.allowed_hosters.join(", ")
        );
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {bind}:{port}"))?;

    ApiServer::new(config)
        .run(addr)
        .await
        .context("API server stopped with an error")?;

    Ok(())
}

/// Check links once and print the verdicts
async fn cmd_check(links: Vec<String>, api_key: Option<String>, json: bool) -> Result<()> {
    let config = match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => ResolverConfig::with_api_key(key),
        None => ResolverConfig::default(),
    }
    .no_cache();
    let resolver = LinkResolver::from_config(config);

    let input: HashMap<ReleaseId, String> = links
        .iter()
        .enumerate()
        .map(|(i, link)| ((i + 1).to_string(), link.clone()))
        .collect();
    debug!(links = input.len(), "Checking links");

    let resolution = resolver.resolve_links(&input).await;

    if json {
        let report: BTreeMap<&str, serde_json::Value> = links
            .iter()
            .map(|link| {
                let alive = resolution.available.values().any(|l| l == link);
                let entry = serde_json::json!({
                    "alive": alive,
                    "filename": resolution.filename_for(link),
                });
                (link.as_str(), entry)
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report")?
        );
        return Ok(());
    }

    let path = match &resolution.path {
        ResolutionPath::Batch => "AllDebrid batch".to_string(),
        ResolutionPath::Fallback(reason) => format!("direct probes ({reason:?})"),
        ResolutionPath::NotNeeded => "nothing to check".to_string(),
    };
    println!("{} {}\n", "🔍 Checked via".cyan().bold(), path);

    for (i, link) in links.iter().enumerate() {
        let id = (i + 1).to_string();
        if resolution.is_available(&id) {
            match resolution.filename_for(link) {
                Some(name) => println!("   {} {} {}", "✓".green(), link, name.dimmed()),
                None => println!("   {} {}", "✓".green(), link),
            }
        } else {
            println!("   {} {}", "✗".red(), link.dimmed());
        }
    }

    println!(
        "\n   {} {}/{}",
        "Alive:".bold(),
        resolution.available.len(),
        links.len()
    );

    Ok(())
}
