//! Sentiscope command line
//!
//! Runs keyword searches across the configured platforms and prints the
//! resulting analytics as JSON. With the file store backend, results,
//! credentials and alert preferences persist between runs.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sentiscope_core::Platform;
use sentiscope_service::{SearchPipeline, SearchRequest, ServiceConfig, DEFAULT_PAGE_SIZE};
use sentiscope_store::{configured_platforms, open_store, PageRequest, StoreBackend};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sentiscope")]
#[command(about = "Social media comment sentiment and topic analytics", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "sentiscope.yaml", env = "SENTISCOPE_CONFIG")]
    config: PathBuf,

    /// Store backend, overrides the configuration file
    #[arg(long, value_enum)]
    store: Option<BackendArg>,

    /// Data directory for the file backend
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Memory,
    File,
}

impl From<BackendArg> for StoreBackend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Memory => StoreBackend::Memory,
            BackendArg::File => StoreBackend::File,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search a keyword and print the analytics
    Search(SearchArgs),

    /// Page through the comments of a stored search
    Comments {
        query_id: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Return every comment instead of one page
        #[arg(long)]
        all: bool,
    },

    /// Manage platform credentials
    #[command(subcommand)]
    Credentials(CredentialsCommand),

    /// Manage alert preferences
    #[command(subcommand)]
    Alerts(AlertsCommand),
}

#[derive(Args, Debug)]
struct SearchArgs {
    keyword: String,

    /// Lookback window in days
    #[arg(short, long, default_value_t = 30)]
    days: u32,

    /// all, youtube, twitter, facebook or instagram
    #[arg(short, long, default_value = "all")]
    platform: String,

    /// Ignore any cached result and collect again
    #[arg(long)]
    refresh: bool,

    /// Treat the keyword as an exact video title
    #[arg(long)]
    video_title: bool,

    #[arg(long)]
    page: Option<usize>,

    #[arg(long)]
    page_size: Option<usize>,

    #[arg(long)]
    user: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CredentialsCommand {
    Set { platform: String, secret: String },
    Remove { platform: String },
    List,
}

#[derive(Subcommand, Debug)]
enum AlertsCommand {
    Set {
        name: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);
    init_metrics();

    let mut config = ServiceConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env();
    if let Some(backend) = cli.store {
        config.store.backend = backend.into();
    }
    if let Some(dir) = &cli.data_dir {
        config.store.data_dir = dir.clone();
    }

    let store = open_store(&config.store)?;
    let seeded = config.seed_credentials(store.as_ref()).await?;
    info!(backend = ?config.store.backend, seeded_credentials = seeded, "Store ready");

    match cli.command {
        Command::Search(args) => {
            let pipeline = SearchPipeline::from_config(&config, store).await?;
            let mut request = SearchRequest::new(args.keyword, args.days, args.platform)
                .with_refresh(args.refresh)
                .with_video_title_search(args.video_title);
            request.page = args.page;
            request.page_size = args.page_size;
            request.user_id = args.user;

            let result = pipeline.search(&request).await?;
            print_json(&result)?;
        }
        Command::Comments {
            query_id,
            page,
            page_size,
            all,
        } => {
            let pipeline = SearchPipeline::from_config(&config, store).await?;
            let page = if all {
                PageRequest::All
            } else {
                PageRequest::page(page, page_size)
            };
            let listing = pipeline.comments(&query_id, page).await?;
            print_json(&listing)?;
        }
        Command::Credentials(command) => match command {
            CredentialsCommand::Set { platform, secret } => {
                let platform = Platform::from(platform);
                store.set_credential(&platform, &secret).await?;
                println!("{platform}: saved");
            }
            CredentialsCommand::Remove { platform } => {
                let platform = Platform::from(platform);
                let removed = store.remove_credential(&platform).await?;
                println!("{platform}: {}", if removed { "removed" } else { "not configured" });
            }
            CredentialsCommand::List => {
                let configured = configured_platforms(store.as_ref()).await?;
                for platform in Platform::KNOWN {
                    let state = if configured.contains(&platform) {
                        "configured"
                    } else {
                        "sample data"
                    };
                    println!("{platform}: {state}");
                }
            }
        },
        Command::Alerts(command) => match command {
            AlertsCommand::Set { name, enabled } => {
                store.set_alert(&name, enabled).await?;
            }
            AlertsCommand::List => {
                print_json(&store.alert_preferences().await?)?;
            }
        },
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiscope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiscope=info"))
    };

    // Logs go to stderr so stdout stays valid JSON
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Describe metrics; the recorder is left to the embedding process
fn init_metrics() {
    metrics::describe_counter!(
        "sentiscope_searches_total",
        "Searches by cache outcome (hit, miss, refresh)"
    );
    metrics::describe_counter!(
        "sentiscope_comments_collected_total",
        "Records collected per platform"
    );
    metrics::describe_counter!(
        "sentiscope_collector_failures_total",
        "Failed or timed out platform collections"
    );
    metrics::describe_histogram!(
        "sentiscope_pipeline_latency_ms",
        metrics::Unit::Milliseconds,
        "End-to-end latency of searches that ran the pipeline"
    );
}
