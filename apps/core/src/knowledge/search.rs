//! Full-text search fallback client (Azure Cognitive Search REST API).

use super::SearchIndex;
use crate::config::SearchConfig;
use crate::error::AppError;
use crate::models::Fragment;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const API_VERSION: &str = "2023-11-01";

pub struct AzureSearchIndex {
    config: SearchConfig,
    client: Client,
}

impl AzureSearchIndex {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl SearchIndex for AzureSearchIndex {
    async fn query(&self, text: &str, limit: usize) -> Result<Vec<Fragment>, AppError> {
        let endpoint = format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.config.endpoint, self.config.index, API_VERSION
        );

        let res = self
            .client
            .post(&endpoint)
            .header("api-key", &self.config.api_key)
            .json(&json!({ "search": text, "top": limit }))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Search query failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = res.json().await?;
        let docs = body["value"].as_array().cloned().unwrap_or_default();

        Ok(docs
            .iter()
            .map(|doc| Fragment {
                text: doc["content"].as_str().unwrap_or_default().to_string(),
                source_url: doc["url"].as_str().unwrap_or_default().to_string(),
                image_url: None,
            })
            .collect())
    }
}
