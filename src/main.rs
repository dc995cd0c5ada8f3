use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vainstats::api::state::{AppState, Dataset, Source};
use vainstats::api::{build_router, with_layers};
use vainstats::calculate::{rank_users, sorted_by_total};
use vainstats::config::{ApiConfig, AppConfig};
use vainstats::fetch::{GameApiClient, MatchQuery};
use vainstats::models::{MatchDocument, Region};
use vainstats::parse::pair_users;
use vainstats::report::{
    divider, document_outline, match_summary, participant_summary, player_summary, ranking_line,
};
use vainstats::storage::{load_document, read_api_key, to_sorted_json, HarvestWriter, StorageConfig};

#[derive(Parser)]
#[command(name = "vainstats")]
#[command(about = "Vainglory game match stats and player ranking")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Query the match API
    Fetch(FetchArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Only matches played by this player
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Look-back window in days
    #[arg(short = 'd', long, default_value_t = 1)]
    days: i64,

    /// Maximum number of matches
    #[arg(short = 'p', long, default_value_t = 3)]
    pages: u32,

    /// Fetch a single match by id
    #[arg(short = 'm', long = "match")]
    match_id: Option<String>,

    /// File whose first line is the API key
    #[arg(short = 'k', long)]
    key_file: Option<PathBuf>,

    /// Region (na, eu, sa, ea, sg)
    #[arg(short = 'r', long)]
    region: Option<Region>,

    /// Print the query as a curl command
    #[arg(long)]
    debug: bool,

    /// Dump the raw document and an index of its resources
    #[arg(short = 'i', long)]
    interactive: bool,

    /// Save the fetched resources as JSON files
    #[arg(long)]
    harvest: bool,

    /// Directory for harvested files [default: <data-dir>/saved_matches]
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Rank the players of the match
    #[arg(long, requires = "match_id")]
    fail: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }

    init_tracing(&cli, &config)?;
    tracing::info!("Starting vainstats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }

            let storage = StorageConfig::new(config.data_dir.clone());
            let demo = match load_document(&storage.demo_data_path()) {
                Ok(document) => {
                    tracing::info!(
                        "Loaded {} demo matches from {}",
                        document.primary().len(),
                        storage.demo_data_path().display()
                    );
                    document
                }
                Err(e) => {
                    tracing::warn!("No demo data: {}", e);
                    MatchDocument::default()
                }
            };
            let api = match fetch_dashboard_matches(&config.api).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("API matches unavailable: {:#}", e);
                    MatchDocument::default()
                }
            };

            let state = AppState::new(vec![
                Dataset::new(Source::Demo, "demo", demo),
                Dataset::new(Source::Api, "API", api),
            ]);
            let app = with_layers(build_router(state), &server, access_log);
            let addr = format!("{}:{}", server.host, server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Fetch(args) => run_fetch(args, &config).await?,
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &AppConfig) -> Result<()> {
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let file = match &config.log_file {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!cli.json_logs).then(|| tracing_subscriber::fmt::layer()))
        .with(file.map(|f| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(f))
        }))
        .init();
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))
}

/// Recent matches shown in the API section of the dashboard.
async fn fetch_dashboard_matches(api: &ApiConfig) -> Result<MatchDocument> {
    let key = read_api_key(&api.key_file)?;
    let client = GameApiClient::new(api.client_config(), key)?;
    let query = MatchQuery::recent(api.days, api.page_limit);
    Ok(client.fetch_matches(api.region, &query).await?)
}

async fn run_fetch(args: FetchArgs, config: &AppConfig) -> Result<()> {
    let api = &config.api;
    let region = args.region.unwrap_or(api.region);
    let key_file = args.key_file.as_deref().unwrap_or(&api.key_file);

    println!(
        "{}",
        divider(&format!(
            "Player name: {}\nRegion: {}",
            args.name.as_deref().unwrap_or("any"),
            region.full_name()
        ))
    );

    let key = read_api_key(key_file)
        .with_context(|| format!("reading API key from {}", key_file.display()))?;
    let client = GameApiClient::new(api.client_config(), key)?;
    let query = MatchQuery::recent(args.days, args.pages).with_player(args.name.clone());

    if let Some(id) = &args.match_id {
        println!("Match id: {}", id);
    }
    println!("Search time: {}", query.search_time());

    if args.debug {
        let url = client.match_url(region, args.match_id.as_deref())?;
        println!("{}", divider("Query"));
        println!("{}", client.debug_command(&url, &query));
    }

    let document = match &args.match_id {
        Some(id) => client.fetch_match(region, id, &query).await?,
        None => client.fetch_matches(region, &query).await?,
    };

    if args.interactive {
        println!("{}", to_sorted_json(&document)?);
        println!("{}", document_outline(&document));
        return Ok(());
    }

    for m in document.primary() {
        println!("{}", match_summary(m));
    }

    if args.harvest {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| StorageConfig::new(config.data_dir.clone()).saved_matches_dir());
        let writer = HarvestWriter::new(output_dir);
        let written = writer.save_document(&document)?;
        tracing::info!(
            "Saved {} files to {}",
            written.len(),
            writer.output_dir().display()
        );
    }

    if args.match_id.is_none() {
        return Ok(());
    }

    let users = pair_users(&document.included);
    for user in &users {
        println!("{}", player_summary(&user.player));
        println!("{}", participant_summary(&user.participant));
    }

    if args.fail {
        println!("{}", divider("Ranking"));
        for ranking in sorted_by_total(rank_users(&users)) {
            println!("{}", ranking_line(&ranking));
        }
    }

    Ok(())
}
