//! Gravity - GitHub activity feed CLI
//!
//! The `gravity` command fetches an activity feed, checks that every
//! checklisted event type carries the payload shape it promises, and prints
//! the verified events of one type as JSON.
//!
//! ## Commands
//!
//! - `events`: fetch (or read) a feed, validate it and print one event type
//! - `webhook`: verify and decode a single webhook delivery
//! - `serve`: accept webhook deliveries on `POST /webhooks`, one JSON line each
//! - `registry`: list the event types with a registered payload shape
//!
//! Logs go to stderr; stdout only ever carries complete output.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gravity_core::{EventKind, FeedDecoder, Registry, METRICS};
use gravity_ingress::{
    fetch_and_validate, serve, FeedClient, FeedConfig, FeedSource, FeedTarget, FileSource,
    ServerState, WebhookDelivery, WebhookReceiver, WebhookVerifier, DEFAULT_API_BASE,
};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "gravity")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decode and validate GitHub activity feeds", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an activity feed, validate it and print one event type
    Events {
        /// Feed to read: owner/name, org:<org>, user:<login> or public
        #[arg(short, long, default_value = "pingcap/tidb")]
        target: FeedTarget,

        /// Read the feed from a local JSON dump instead of the API
        #[arg(short, long, conflicts_with = "target")]
        file: Option<PathBuf>,

        /// Event type to verify (repeatable; default: every registered type)
        #[arg(short, long = "check", value_name = "TYPE")]
        checks: Vec<String>,

        /// Event type whose verified events are printed
        #[arg(short, long, default_value = "ForkEvent")]
        show: String,

        /// API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
        api_url: String,
    },

    /// Verify and decode one webhook delivery
    Webhook {
        /// Value of the X-GitHub-Event header
        #[arg(short, long)]
        event: String,

        /// Value of the X-Hub-Signature-256 header
        #[arg(long)]
        signature: Option<String>,

        /// Shared webhook secret (signature check is skipped when unset)
        #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Delivery body ("-" for stdin)
        #[arg(default_value = "-")]
        body: PathBuf,
    },

    /// Accept webhook deliveries over HTTP and print each as a JSON line
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,

        /// Shared webhook secret (signature check is skipped when unset)
        #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Accept events with no registered payload shape instead of answering 501
        #[arg(long)]
        accept_unknown: bool,
    },

    /// List event types with a registered payload shape
    Registry,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    gravity_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Events {
            target,
            file,
            checks,
            show,
            token,
            api_url,
        } => {
            cmd_events(
                target,
                file.as_deref(),
                &checks,
                &show,
                token.as_deref(),
                &api_url,
            )
            .await
        }
        Commands::Webhook {
            event,
            signature,
            secret,
            body,
        } => cmd_webhook(&event, signature.as_deref(), secret.as_deref(), &body).await,
        Commands::Serve {
            addr,
            secret,
            accept_unknown,
        } => cmd_serve(addr, secret.as_deref(), accept_unknown).await,
        Commands::Registry => cmd_registry(),
    };

    METRICS.flush();
    result
}

/// Checklist for a run: the explicit checks (or every registered type), plus
/// the shown type when it is not already on the list.
fn build_checklist(registry: &Registry, checks: &[String], show: &str) -> Vec<String> {
    let mut checklist: Vec<String> = if checks.is_empty() {
        registry.discriminators().map(str::to_string).collect()
    } else {
        checks.to_vec()
    };
    if !checklist.iter().any(|c| c == show) {
        checklist.push(show.to_string());
    }
    checklist
}

/// Fetch, validate and print the verified events of one type
async fn cmd_events(
    target: FeedTarget,
    file: Option<&Path>,
    checks: &[String],
    show: &str,
    token: Option<&str>,
    api_url: &str,
) -> Result<()> {
    let source: Box<dyn FeedSource> = match file {
        Some(path) => Box::new(FileSource::new(path)),
        None => {
            let mut config = FeedConfig::new(api_url);
            if let Some(token) = token.filter(|t| !t.is_empty()) {
                config = config.with_token(token);
            }
            Box::new(FeedClient::new(config, target).context("Failed to create HTTP client")?)
        }
    };

    let registry = Registry::standard();
    let checklist = build_checklist(registry, checks, show);
    info!("Validating {} against {} event types", source.describe(), checklist.len());

    let mut verified = fetch_and_validate(source.as_ref(), &FeedDecoder::new(registry), &checklist)
        .await
        .with_context(|| format!("Failed to validate feed from {}", source.describe()))?;

    let events = verified.take(show).unwrap_or_default();
    let rendered =
        serde_json::to_string_pretty(&events).context("Failed to render verified events")?;
    println!("{}", rendered);

    Ok(())
}

/// Verify and decode one webhook delivery
async fn cmd_webhook(
    event: &str,
    signature: Option<&str>,
    secret: Option<&str>,
    body: &Path,
) -> Result<()> {
    let bytes = read_body(body)
        .await
        .with_context(|| format!("Failed to read delivery body from {}", body.display()))?;

    let receiver = WebhookReceiver::new(WebhookVerifier::new(secret), Registry::standard());
    let delivery = receiver
        .receive(event, signature, &bytes)
        .with_context(|| format!("Failed to accept {} delivery", event))?;

    println!("{}", serde_json::to_string_pretty(&delivery)?);
    Ok(())
}

/// Serve the webhook endpoint until Ctrl-C
async fn cmd_serve(addr: SocketAddr, secret: Option<&str>, accept_unknown: bool) -> Result<()> {
    let verifier = WebhookVerifier::new(secret);
    if !verifier.is_enabled() {
        warn!("No webhook secret configured; deliveries are not authenticated");
    }

    let (tx, mut rx) = mpsc::channel::<WebhookDelivery>(64);
    let printer = tokio::spawn(async move {
        while let Some(delivery) = rx.recv().await {
            match serde_json::to_string(&delivery) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Failed to render {} delivery: {}", delivery.event, e),
            }
        }
    });

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let state = ServerState::new(
        WebhookReceiver::new(verifier, Registry::standard()),
        tx,
        accept_unknown,
    );
    serve(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
        }
        info!("Shutting down webhook endpoint");
    })
    .await
    .context("Webhook endpoint failed")?;

    printer.await.context("Delivery printer panicked")?;
    Ok(())
}

async fn read_body(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;
        Ok(buf)
    } else {
        tokio::fs::read(path).await
    }
}

#[derive(Serialize)]
struct RegistryRow {
    #[serde(rename = "type")]
    discriminator: &'static str,
    webhook: Option<&'static str>,
}

/// List registered event types
fn cmd_registry() -> Result<()> {
    let rows: Vec<RegistryRow> = Registry::standard()
        .discriminators()
        .map(|discriminator| RegistryRow {
            discriminator,
            webhook: EventKind::from_discriminator(discriminator)
                .and_then(|kind| kind.webhook_name()),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
