use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use valence_lab::api::{self, AppState, Timing};
use valence_lab::catalog::Catalog;
use valence_lab::config::LabConfig;
use valence_lab::extract::HttpExtractor;
use valence_lab::lab::Resolver;
use valence_lab::render;
use valence_lab::store::LabStore;

#[derive(Parser)]
#[command(name = "valence")]
#[command(about = "Virtual chemistry lab: stage reagents, mix them, see what happens")]
struct Cli {
    /// Catalog file to use instead of the configured or bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the lab API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the reagent catalog and reaction table
    Catalog,
    /// Resolve a set of reagent ids without starting a server
    Mix {
        /// Reagent ids, names or formulas
        #[arg(required = true)]
        reagents: Vec<String>,
    },
    /// Validate a catalog file
    Check {
        /// Path to the catalog JSON file
        path: PathBuf,
    },
}

/// Initialize tracing with output to stderr (for one-shot commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "valence_lab=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Keep stdout clean for command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Periodically drop sessions that have been idle for longer than `max_idle`.
fn spawn_session_sweeper(store: LabStore, max_idle: chrono::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            store.expire_idle(max_idle);
        }
    });
}

async fn serve(config: LabConfig) -> anyhow::Result<()> {
    let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())
        .context("Failed to load reagent catalog")?;
    tracing::info!(
        "Catalog ready: {} reagents, {} reactions",
        catalog.reagents().len(),
        catalog.rules().len()
    );

    let extractor = HttpExtractor::from_config(&config);
    match &extractor {
        Some(extractor) => tracing::info!("Document analysis via {}", extractor.url()),
        None => tracing::info!("No extractor configured; document uploads are disabled"),
    }

    let store = LabStore::with_catalog(catalog);
    if let Some(max_idle) = config.session_idle() {
        spawn_session_sweeper(store.clone(), max_idle);
    }

    let state = AppState::new(store)
        .with_extractor(extractor)
        .with_timing(Timing::from(&config));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", config.port)).await?;
    tracing::info!("Valence lab listening on http://127.0.0.1:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = LabConfig::load()?;
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await?;
        }
        None => serve(config).await?,
        Some(Commands::Catalog) => {
            let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())?;
            print!("{}", render::render_catalog(&catalog));
        }
        Some(Commands::Mix { reagents }) => {
            let catalog = Catalog::load_or_builtin(config.catalog_path.as_deref())?;
            let ids: Vec<String> = reagents
                .iter()
                .map(|r| match catalog.lookup(r) {
                    Some(reagent) => reagent.id.clone(),
                    None => {
                        tracing::warn!("{:?} is not in the catalog; matching by id only", r);
                        r.clone()
                    }
                })
                .collect();

            let resolver = Resolver::new(std::sync::Arc::new(catalog));
            println!("{}", render::render_outcome(&resolver.resolve(ids)));
        }
        Some(Commands::Check { path }) => {
            let catalog = Catalog::load(&path)
                .with_context(|| format!("Catalog {} is invalid", path.display()))?;
            println!(
                "{}: {} reagents, {} reactions, OK",
                path.display(),
                catalog.reagents().len(),
                catalog.rules().len()
            );
        }
    }

    Ok(())
}
