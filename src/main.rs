use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use video_facet_search::{
    catalog::{load_catalog, JsonFavoritesStore},
    config::Config,
    error::AppError,
    search::{ChordsSearchMode, FacetValuesRequest, SearchConfig, SearchRequest, SearchSession},
};

#[derive(Parser)]
#[command(name = "video-search")]
#[command(about = "Faceted search over the tutorial video catalog", long_about = None)]
struct Cli {
    /// Catalog JSON file (overrides config)
    #[arg(short, long, env = "VIDEO_SEARCH_CATALOG")]
    catalog: Option<PathBuf>,

    /// Favorites JSON file (overrides config)
    #[arg(short, long, env = "VIDEO_SEARCH_FAVORITES")]
    favorites: Option<PathBuf>,

    /// Combination mode for the chords facet (overrides config)
    #[arg(short = 'm', long)]
    chords_mode: Option<ChordsSearchMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct QueryArgs {
    /// Text matched against track and title
    #[arg(short, long, default_value = "")]
    query: String,

    /// Zero-based page
    #[arg(short, long, default_value = "0")]
    page: usize,

    /// Page size (defaults to config)
    #[arg(short = 's', long)]
    hits_per_page: Option<usize>,

    /// OR group of comma separated `attribute:value` tokens; repeat for AND
    #[arg(short = 'F', long = "filter")]
    filters: Vec<String>,

    /// Numeric clause such as `chordCount>=3`; repeat for AND
    #[arg(short = 'n', long = "numeric")]
    numeric: Vec<String>,

    /// Index name, `upload_date` sorts newest first
    #[arg(short, long)]
    index: Option<String>,
}

impl QueryArgs {
    fn to_request(&self) -> SearchRequest {
        let mut request = SearchRequest::new(self.query.clone()).with_page(self.page);
        if let Some(hits_per_page) = self.hits_per_page {
            request = request.with_hits_per_page(hits_per_page);
        }
        if let Some(index) = &self.index {
            request = request.with_index(index.clone());
        }
        for group in &self.filters {
            request = request.with_facet_group(group.split(',').map(str::trim).collect::<Vec<_>>());
        }
        for clause in &self.numeric {
            request = request.with_numeric_filter(clause.clone());
        }
        request
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search and print both result sets
    Search {
        #[command(flatten)]
        args: QueryArgs,
    },

    /// Run a search, then list matching values of one facet
    FacetValues {
        /// Facet name, e.g. `chords` or `artists`
        #[arg(value_name = "FACET")]
        facet: String,

        /// Partial facet value
        #[arg(short = 'v', long, default_value = "")]
        facet_query: String,

        #[command(flatten)]
        args: QueryArgs,
    },

    /// List other versions of a video
    Related {
        #[arg(value_name = "VIDEO_ID")]
        id: String,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load_validated().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    init_tracing(&config);

    let Cli {
        catalog,
        favorites,
        chords_mode,
        command,
    } = cli;

    let mut search_config = SearchConfig::from(&config.search);
    if let Some(mode) = chords_mode {
        search_config.chords_search_mode = mode;
    }
    let catalog_path = catalog.unwrap_or_else(|| config.catalog.path.clone());
    let favorites_path = favorites
        .or_else(|| config.catalog.favorites_path.clone())
        .unwrap_or_else(|| PathBuf::from("data/favorites.json"));

    match command {
        Commands::Search { args } => {
            let session = open_session(&catalog_path, favorites_path, search_config).await?;
            let results = session.search(&[args.to_request()]).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Commands::FacetValues {
            facet,
            facet_query,
            args,
        } => {
            let session = open_session(&catalog_path, favorites_path, search_config).await?;
            session.search(&[args.to_request()]).await;
            let response = session
                .search_for_facet_values(&[FacetValuesRequest::new(facet, facet_query)])
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Related { id } => {
            let session = open_session(&catalog_path, favorites_path, search_config).await?;
            let record = session.lookup(&id).map_err(AppError::from)?;
            let related = session.related(record.id());
            println!("{}", serde_json::to_string_pretty(&related)?);
        }
        Commands::Config => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn open_session(
    catalog_path: &Path,
    favorites_path: PathBuf,
    config: SearchConfig,
) -> anyhow::Result<SearchSession> {
    let entries = load_catalog(catalog_path)
        .await
        .with_context(|| format!("loading catalog {}", catalog_path.display()))?;
    let store = JsonFavoritesStore::new(favorites_path);

    Ok(SearchSession::from_store(entries, &store, config).await?)
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("video_facet_search={}", config.logging.level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
