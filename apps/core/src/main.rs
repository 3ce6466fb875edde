// Brand-site chat assistant - response routing engine.
// Reads turns from stdin and routes each through the decision pipeline.

mod brain;
mod catalog;
mod completion;
mod composer;
mod config;
mod database;
mod error;
mod feedback;
mod knowledge;
mod models;
mod router;
#[cfg(test)]
mod tests;

use anyhow::Context;
use brain::brands::BrandRegistry;
use brain::intent::BagOfWordsModel;
use catalog::IntentCatalog;
use completion::{CompletionService, OpenAiCompletionService, UnconfiguredCompletion};
use composer::AnswerComposer;
use config::AppConfig;
use database::SqliteFeedbackStore;
use knowledge::graph::Neo4jHttpStore;
use knowledge::search::AzureSearchIndex;
use knowledge::{GraphStore, KnowledgeRetriever, SearchIndex};
use router::ResponseRouter;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

async fn build_router(config: &AppConfig) -> anyhow::Result<ResponseRouter> {
    let catalog = IntentCatalog::builtin().context("failed to load intent catalog")?;
    let classifier = Arc::new(BagOfWordsModel::from_catalog(&catalog));

    let graph: Option<Arc<dyn GraphStore>> = match &config.graph {
        Some(cfg) => Some(Arc::new(Neo4jHttpStore::new(cfg.clone()))),
        None => {
            warn!("Graph store not configured; brand and category retrieval disabled");
            None
        }
    };
    let search: Option<Arc<dyn SearchIndex>> = match &config.search {
        Some(cfg) => Some(Arc::new(AzureSearchIndex::new(cfg.clone()))),
        None => {
            warn!("Search index not configured; generic fallback retrieval disabled");
            None
        }
    };
    let completion: Arc<dyn CompletionService> = match &config.completion {
        Some(cfg) => Arc::new(OpenAiCompletionService::new(
            cfg.clone(),
            config.completion_timeout,
        )),
        None => {
            warn!("Completion service not configured; generated answers disabled");
            Arc::new(UnconfiguredCompletion)
        }
    };

    let retriever = KnowledgeRetriever::new(graph, search, config.retrieval_timeout);
    let composer = AnswerComposer::new(completion, config.site.name.clone());
    let feedback_store = Arc::new(
        SqliteFeedbackStore::open(&config.feedback_db_path)
            .await
            .context("failed to open feedback database")?,
    );

    Ok(ResponseRouter::new(
        classifier,
        BrandRegistry::default(),
        catalog,
        retriever,
        composer,
        feedback_store,
        config.site.clone(),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let router = build_router(&config).await?;
    let conversation_id = uuid::Uuid::new_v4().to_string();
    info!(conversation = %conversation_id, "Router ready, reading turns from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout.write_all(b"you: ").await?;
    stdout.flush().await?;
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        let reply = match router.handle_turn(&conversation_id, &line).await {
            Ok(reply) => reply,
            // Completion failure is the one fatal class; render it and keep
            // the REPL alive for the next turn.
            Err(e) => format!("(error) {}", e),
        };
        stdout
            .write_all(format!("Bot: {}\nyou: ", reply).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    Ok(())
}
