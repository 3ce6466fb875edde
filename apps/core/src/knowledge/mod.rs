//! Knowledge retrieval over two optional backends.
//!
//! The primary surface is the graph store (brand- and category-scoped
//! queries); the secondary one is an unscoped full-text index used only when
//! the primary returns nothing. Neither surface may fail a turn: an
//! unconfigured client, a backend error or a timeout all map to an empty
//! result so the router falls through to its next tier.

pub mod graph;
pub mod search;

use crate::error::AppError;
use crate::models::Fragment;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

/// Graph-backed knowledge store. Both queries return fragments ranked by the
/// store's relevance score; that order must be preserved downstream.
#[async_trait]
pub trait GraphStore: Send + Sync {
    async fn query_by_brand(
        &self,
        slug: &str,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Fragment>, AppError>;

    async fn query_by_category(
        &self,
        category: &str,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Fragment>, AppError>;
}

/// Unscoped full-text index over the same corpus.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<Fragment>, AppError>;
}

#[derive(Clone)]
pub struct KnowledgeRetriever {
    graph: Option<Arc<dyn GraphStore>>,
    search: Option<Arc<dyn SearchIndex>>,
    call_timeout: Duration,
}

impl KnowledgeRetriever {
    pub fn new(
        graph: Option<Arc<dyn GraphStore>>,
        search: Option<Arc<dyn SearchIndex>>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            graph,
            search,
            call_timeout,
        }
    }

    /// Fragments from pages of the given brand, ranked against `question`.
    pub async fn by_brand(&self, slug: &str, question: &str, limit: usize) -> Vec<Fragment> {
        let Some(graph) = &self.graph else {
            return Vec::new();
        };
        self.guarded("brand query", graph.query_by_brand(slug, question, limit))
            .await
    }

    /// Fragments from pages tagged with the given category.
    pub async fn by_category(&self, category: &str, question: &str, limit: usize) -> Vec<Fragment> {
        let Some(graph) = &self.graph else {
            return Vec::new();
        };
        self.guarded(
            "category query",
            graph.query_by_category(category, question, limit),
        )
        .await
    }

    /// Unscoped fallback query, used only on a primary-store miss.
    pub async fn generic(&self, question: &str, limit: usize) -> Vec<Fragment> {
        let Some(search) = &self.search else {
            return Vec::new();
        };
        self.guarded("search fallback", search.query(question, limit))
            .await
    }

    async fn guarded(
        &self,
        what: &str,
        call: impl std::future::Future<Output = Result<Vec<Fragment>, AppError>>,
    ) -> Vec<Fragment> {
        match timeout(self.call_timeout, call).await {
            Ok(Ok(fragments)) => fragments,
            Ok(Err(e)) => {
                warn!(error = %e, "Knowledge {} failed, degrading to empty result", what);
                Vec::new()
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Knowledge {} timed out, degrading to empty result", what
                );
                Vec::new()
            }
        }
    }
}
