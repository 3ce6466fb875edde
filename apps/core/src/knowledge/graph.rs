//! Graph knowledge store client (Neo4j HTTP transaction API).
//!
//! Runs full-text ranked Cypher against the crawled page graph. Relevance
//! ordering comes from the store's `sliceFulltext` index; rows are consumed
//! in the order returned.

use super::GraphStore;
use crate::config::GraphConfig;
use crate::error::AppError;
use crate::models::Fragment;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const BRAND_QUERY: &str = r#"
CALL db.index.fulltext.queryNodes('sliceFulltext', $kw) YIELD node AS s, score
MATCH (p:Page)-[:HAS_SLICE]->(s),
      (b:Brand {slug:$brandSlug})<-[:HAS_BRAND]-(p)
WHERE toLower(p.url) CONTAINS toLower($brandSlug)
   OR toLower(p.url) CONTAINS toLower(replace($brandSlug, "-", ""))
OPTIONAL MATCH (p)-[:HAS_IMAGE]->(img:Image)
RETURN s.content AS text, p.url AS page_url, img.url AS img_url, score
ORDER BY score DESC
LIMIT $k
"#;

const CATEGORY_QUERY: &str = r#"
MATCH (c:Category {name:$cat})<-[:IN_CATEGORY]-(p:Page)
CALL db.index.fulltext.queryNodes('sliceFulltext', $kw)
  YIELD node AS s, score
WHERE (p)-[:HAS_SLICE]->(s)
OPTIONAL MATCH (p)-[:HAS_IMAGE]->(img:Image)
RETURN s.content AS text, p.url AS page_url, img.url AS img_url
ORDER BY score DESC
LIMIT $k
"#;

pub struct Neo4jHttpStore {
    config: GraphConfig,
    client: Client,
}

impl Neo4jHttpStore {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    async fn run(&self, statement: &str, parameters: Value) -> Result<Vec<Fragment>, AppError> {
        let endpoint = format!(
            "{}/db/{}/tx/commit",
            self.config.uri, self.config.database
        );
        let payload = json!({
            "statements": [{ "statement": statement, "parameters": parameters }]
        });

        let res = self
            .client
            .post(&endpoint)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Graph query failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = res.json().await?;

        if let Some(errors) = body["errors"].as_array() {
            if let Some(first) = errors.first() {
                return Err(AppError::Store(format!(
                    "Graph query error: {}",
                    first["message"].as_str().unwrap_or("unknown")
                )));
            }
        }

        let rows = body["results"][0]["data"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        Ok(rows
            .iter()
            .filter_map(|entry| {
                let row = entry["row"].as_array()?;
                Some(Fragment {
                    text: row.first()?.as_str().unwrap_or_default().to_string(),
                    source_url: row.get(1)?.as_str().unwrap_or_default().to_string(),
                    image_url: row
                        .get(2)
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
            })
            .collect())
    }
}

/// Category names are stored capitalized in the graph ("recipe" -> "Recipe").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpStore {
    async fn query_by_brand(
        &self,
        slug: &str,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Fragment>, AppError> {
        self.run(
            BRAND_QUERY,
            json!({ "brandSlug": slug, "kw": text, "k": limit }),
        )
        .await
    }

    async fn query_by_category(
        &self,
        category: &str,
        text: &str,
        limit: usize,
    ) -> Result<Vec<Fragment>, AppError> {
        self.run(
            CATEGORY_QUERY,
            json!({ "cat": capitalize(category), "kw": text, "k": limit }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("recipe"), "Recipe");
        assert_eq!(capitalize("Recipe"), "Recipe");
        assert_eq!(capitalize(""), "");
    }
}
