use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use framesearch::api::{AppState, create_router};
use framesearch::config::CONFIG;
use framesearch::data_models::SearchQuery;
use framesearch::db::LazyDatabase;
use framesearch::domain_filter::StaticDomainFilter;
use framesearch::pipeline::{PipelinePolicy, SearchPipeline};
use framesearch::probe::LivenessProbe;
use framesearch::tracking::{EventSink, MongoEventSink, NoopEventSink};
use framesearch::upstream::CustomSearchClient;

#[derive(Parser)]
#[command(name = "framesearch", about = "Web search filtered for frame-embeddable results")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to bind, overrides BIND_ADDR
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run one search and print the results as JSON
    Search {
        query: String,
        #[arg(long)]
        filter_embeddable: bool,
    },
}

fn build_pipeline() -> anyhow::Result<SearchPipeline> {
    let provider = CustomSearchClient::from_config(&CONFIG)?;
    let prober = LivenessProbe::new(
        Duration::from_millis(CONFIG.probe_timeout_ms),
        CONFIG.probe_concurrency,
    )
    .context("Failed to build probe client")?;

    Ok(SearchPipeline::new(
        Arc::new(provider),
        Arc::new(prober),
        StaticDomainFilter::with_extra(&CONFIG.extra_denylist),
        PipelinePolicy::with_concurrency(CONFIG.probe_concurrency),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let pipeline = build_pipeline()?;

    match cli.command {
        Command::Serve { bind } => {
            let events: Arc<dyn EventSink> = match LazyDatabase::from_config(&CONFIG) {
                Some(db) => Arc::new(MongoEventSink::new(Arc::new(db))),
                None => {
                    tracing::warn!("MONGO_URI not set, event tracking disabled");
                    Arc::new(NoopEventSink)
                }
            };
            let state = AppState {
                pipeline: Arc::new(pipeline),
                events,
            };

            let addr = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            tracing::info!("listening on {addr}");
            axum::serve(listener, create_router(state)).await?;
        }
        Command::Search {
            query,
            filter_embeddable,
        } => {
            let query = SearchQuery::new(&query, filter_embeddable)?;
            let results = pipeline.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }
    Ok(())
}
