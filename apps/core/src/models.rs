use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Closed vocabulary of intent tags, fixed at catalog-build time.
///
/// Replaces the original's string-membership tests with one enum resolved at
/// startup; callers that need the category subset go through `is_category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    Greeting,
    Thanks,
    Goodbye,
    Feedback,
    Product,
    Recipe,
    Promo,
    Blog,
    Support,
    Article,
    Sustainability,
    Video,
    Search,
    About,
    Document,
    Unknown,
}

impl IntentTag {
    pub const ALL: [IntentTag; 16] = [
        IntentTag::Greeting,
        IntentTag::Thanks,
        IntentTag::Goodbye,
        IntentTag::Feedback,
        IntentTag::Product,
        IntentTag::Recipe,
        IntentTag::Promo,
        IntentTag::Blog,
        IntentTag::Support,
        IntentTag::Article,
        IntentTag::Sustainability,
        IntentTag::Video,
        IntentTag::Search,
        IntentTag::About,
        IntentTag::Document,
        IntentTag::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IntentTag::Greeting => "greeting",
            IntentTag::Thanks => "thanks",
            IntentTag::Goodbye => "goodbye",
            IntentTag::Feedback => "feedback",
            IntentTag::Product => "product",
            IntentTag::Recipe => "recipe",
            IntentTag::Promo => "promo",
            IntentTag::Blog => "blog",
            IntentTag::Support => "support",
            IntentTag::Article => "article",
            IntentTag::Sustainability => "sustainability",
            IntentTag::Video => "video",
            IntentTag::Search => "search",
            IntentTag::About => "about",
            IntentTag::Document => "document",
            IntentTag::Unknown => "unknown",
        }
    }

    /// Parse a catalog label. Unrecognized labels map to `None` so the caller
    /// can take an explicit unknown-tag path instead of silently misrouting.
    pub fn from_label(label: &str) -> Option<IntentTag> {
        IntentTag::ALL.iter().copied().find(|t| t.label() == label)
    }

    /// Tags eligible for category-scoped retrieval rather than a canned reply.
    pub fn is_category(&self) -> bool {
        matches!(
            self,
            IntentTag::Product
                | IntentTag::Recipe
                | IntentTag::Promo
                | IntentTag::Blog
                | IntentTag::Support
                | IntentTag::Article
                | IntentTag::Sustainability
                | IntentTag::Video
                | IntentTag::Search
                | IntentTag::About
                | IntentTag::Document
        )
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of one classifier run: top-1 tag with its softmax probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub tag: IntentTag,
    /// Top-1 softmax probability over the full label set, in [0, 1].
    pub confidence: f32,
}

/// A unit of retrieved knowledge-base content.
///
/// Ordering is owned by the backing store; consumers must not re-rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub source_url: String,
    pub image_url: Option<String>,
}

/// One persisted feedback submission. `handled` is flipped by an external
/// administrative process, never by this service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedbackRecord {
    pub id: i64,
    pub body: String,
    pub email: String,
    pub handled: bool,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for tag in IntentTag::ALL {
            assert_eq!(IntentTag::from_label(tag.label()), Some(tag));
        }
        assert_eq!(IntentTag::from_label("no_such_tag"), None);
    }

    #[test]
    fn test_category_tag_set() {
        assert!(IntentTag::Product.is_category());
        assert!(IntentTag::Recipe.is_category());
        assert!(IntentTag::About.is_category());
        assert!(!IntentTag::Greeting.is_category());
        assert!(!IntentTag::Feedback.is_category());
        assert!(!IntentTag::Unknown.is_category());
    }
}
