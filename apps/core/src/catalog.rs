//! Static intent catalog loaded once at startup.
//!
//! Maps each tag to its example patterns (used to build the bag-of-words
//! classifier) and, for quick-reply tags, its ordered canned responses.

use crate::error::AppError;
use crate::models::IntentTag;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

const BUILTIN_CATALOG: &str = include_str!("../data/intents.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    intents: Vec<IntentEntry>,
}

#[derive(Debug, Deserialize)]
struct IntentEntry {
    tag: String,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    responses: Vec<String>,
}

/// Immutable for the process lifetime once constructed.
#[derive(Debug, Clone)]
pub struct IntentCatalog {
    patterns: HashMap<IntentTag, Vec<String>>,
    responses: HashMap<IntentTag, Vec<String>>,
}

impl IntentCatalog {
    /// Load the catalog embedded at build time.
    pub fn builtin() -> Result<Self, AppError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut patterns: HashMap<IntentTag, Vec<String>> = HashMap::new();
        let mut responses: HashMap<IntentTag, Vec<String>> = HashMap::new();

        for entry in file.intents {
            let Some(tag) = IntentTag::from_label(&entry.tag) else {
                // Unknown labels are dropped up front rather than carried as
                // strings through the pipeline.
                warn!(label = %entry.tag, "Ignoring catalog entry with unknown tag");
                continue;
            };
            patterns.entry(tag).or_default().extend(entry.patterns);
            if !entry.responses.is_empty() {
                responses.entry(tag).or_default().extend(entry.responses);
            }
        }

        Ok(Self { patterns, responses })
    }

    /// Example patterns for a tag, used to train the classifier vocabulary.
    pub fn patterns(&self, tag: IntentTag) -> &[String] {
        self.patterns.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ordered canned responses for a quick-reply tag, if any.
    pub fn responses(&self, tag: IntentTag) -> Option<&[String]> {
        self.responses
            .get(&tag)
            .map(Vec::as_slice)
            .filter(|r| !r.is_empty())
    }

    /// True when the tag resolves to a canned reply rather than retrieval.
    pub fn has_quick_reply(&self, tag: IntentTag) -> bool {
        !tag.is_category() && self.responses(tag).is_some()
    }

    pub fn tags_with_patterns(&self) -> impl Iterator<Item = (IntentTag, &[String])> {
        self.patterns.iter().map(|(t, p)| (*t, p.as_slice()))
    }
}
