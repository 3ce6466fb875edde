//! The response routing engine.
//!
//! One decision pipeline per utterance, strict precedence:
//! active feedback session, feedback trigger, brand-scoped retrieval,
//! canned quick reply, category-scoped retrieval, generic fallback.
//! Brand presence always outranks intent-based routing, at any classifier
//! confidence.

use crate::brain::brands::{is_website_intent, BrandRegistry};
use crate::brain::intent::IntentModel;
use crate::catalog::IntentCatalog;
use crate::composer::{AnswerComposer, MORE_INFO_PREFIX};
use crate::config::SiteConfig;
use crate::database::FeedbackStore;
use crate::error::AppError;
use crate::feedback::{FeedbackOutcome, FeedbackSession};
use crate::knowledge::KnowledgeRetriever;
use crate::models::IntentTag;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Arms the feedback flow (step 2).
const FEEDBACK_CONFIDENCE: f32 = 0.75;
/// Gates canned quick replies (step 4).
const QUICK_REPLY_CONFIDENCE: f32 = 0.85;
/// Gates high-confidence category retrieval (step 5).
const CATEGORY_CONFIDENCE: f32 = 0.90;

const BRAND_LIMIT: usize = 5;
const SITE_LIMIT: usize = 1;
const CATEGORY_LIMIT: usize = 5;

const EMPTY_INPUT_REPLY: &str = "Sorry, I didn't get that.";
const UNSURE_REPLY: &str = "I am not sure about that right now.";

pub struct ResponseRouter {
    classifier: Arc<dyn IntentModel>,
    brands: BrandRegistry,
    catalog: IntentCatalog,
    retriever: KnowledgeRetriever,
    composer: AnswerComposer,
    feedback_store: Arc<dyn FeedbackStore>,
    site: SiteConfig,
    /// Feedback state keyed by conversation id. Each conversation's state is
    /// behind its own lock, held for the whole turn; unrelated conversations
    /// never share feedback flags.
    sessions: Mutex<HashMap<String, Arc<Mutex<FeedbackSession>>>>,
    rng: Mutex<StdRng>,
}

impl ResponseRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        classifier: Arc<dyn IntentModel>,
        brands: BrandRegistry,
        catalog: IntentCatalog,
        retriever: KnowledgeRetriever,
        composer: AnswerComposer,
        feedback_store: Arc<dyn FeedbackStore>,
        site: SiteConfig,
    ) -> Self {
        Self {
            classifier,
            brands,
            catalog,
            retriever,
            composer,
            feedback_store,
            site,
            sessions: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fix the randomness source, for deterministic canned-reply tests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Process one turn. Always yields a reply string except for the single
    /// fatal class: a completion-service failure (or a feedback persistence
    /// failure) surfaces as an error for the transport to render.
    #[instrument(skip(self, utterance), fields(conversation = %conversation_id))]
    pub async fn handle_turn(
        &self,
        conversation_id: &str,
        utterance: &str,
    ) -> Result<String, AppError> {
        if utterance.trim().is_empty() {
            return Ok(EMPTY_INPUT_REPLY.to_string());
        }

        let session = self.session_for(conversation_id).await;
        let mut session = session.lock().await;

        // 1) An active feedback session owns the whole turn.
        if session.is_active() {
            return self.feedback_turn(&mut session, utterance).await;
        }

        // 2) One classification per turn, reused by every later step.
        let classification = self.classifier.classify(utterance);
        debug!(
            tag = %classification.tag,
            confidence = classification.confidence,
            "Classified utterance"
        );

        if classification.tag == IntentTag::Feedback
            && classification.confidence > FEEDBACK_CONFIDENCE
        {
            return Ok(session.arm().to_string());
        }
        drop(session);

        // 3) Brand mention outranks everything the classifier says.
        let matched = self.brands.matches(utterance);
        if let Some(brand) = matched.first() {
            if matched.len() > 1 {
                debug!(
                    chosen = %brand.name,
                    total = matched.len(),
                    "Multiple brands matched, using first in registry order"
                );
            }

            if is_website_intent(utterance) {
                let fragments = self
                    .retriever
                    .by_brand(&brand.slug, utterance, SITE_LIMIT)
                    .await;
                return Ok(match fragments.first() {
                    Some(fragment) => format!("{}{}", MORE_INFO_PREFIX, fragment.source_url),
                    None => format!(
                        "Sorry, I couldn't locate the exact website for {} right now.",
                        brand.name
                    ),
                });
            }

            let mut fragments = self
                .retriever
                .by_brand(&brand.slug, utterance, BRAND_LIMIT)
                .await;
            if fragments.is_empty() {
                fragments = self
                    .retriever
                    .generic(&format!("{} {}", brand.name, utterance), BRAND_LIMIT)
                    .await;
            }
            return if fragments.is_empty() {
                Ok(format!(
                    "Sorry, I found brand \"{}\" but couldn't retrieve relevant content right now.",
                    brand.name
                ))
            } else {
                self.composer.compose(utterance, &fragments).await
            };
        }

        // 4) Canned quick reply for high-confidence non-category tags.
        if classification.confidence > QUICK_REPLY_CONFIDENCE
            && self.catalog.has_quick_reply(classification.tag)
        {
            if let Some(responses) = self.catalog.responses(classification.tag) {
                let index = self.rng.lock().await.gen_range(0..responses.len());
                return Ok(responses[index].clone());
            }
        }

        // 5) High-confidence category retrieval.
        if classification.confidence > CATEGORY_CONFIDENCE && classification.tag.is_category() {
            let mut fragments = self
                .retriever
                .by_category(classification.tag.label(), utterance, CATEGORY_LIMIT)
                .await;
            if fragments.is_empty() {
                fragments = self.retriever.generic(utterance, CATEGORY_LIMIT).await;
            }
            return if fragments.is_empty() {
                Ok(UNSURE_REPLY.to_string())
            } else {
                self.composer.compose(utterance, &fragments).await
            };
        }

        // 6) Fallback tier: category query when the tag allows it, then the
        // generic index, then the guaranteed last line.
        let mut fragments = if classification.tag.is_category() {
            self.retriever
                .by_category(classification.tag.label(), utterance, CATEGORY_LIMIT)
                .await
        } else {
            Vec::new()
        };
        if fragments.is_empty() {
            fragments = self.retriever.generic(utterance, CATEGORY_LIMIT).await;
        }
        if fragments.is_empty() {
            return Ok(format!(
                "{} For more information, please check on {}",
                UNSURE_REPLY, self.site.home_url
            ));
        }
        self.composer.compose(utterance, &fragments).await
    }

    async fn feedback_turn(
        &self,
        session: &mut FeedbackSession,
        utterance: &str,
    ) -> Result<String, AppError> {
        let outcome = session.advance(utterance);
        if let FeedbackOutcome::Submitted { body, email } = &outcome {
            // A lost submission after thanking the user would be worse than a
            // visible failure, so persistence errors are not swallowed.
            self.feedback_store.append(body, email).await?;
        } else if matches!(outcome, FeedbackOutcome::Cancelled) {
            debug!("Feedback flow cancelled");
        }
        Ok(outcome.reply().to_string())
    }

    async fn session_for(&self, conversation_id: &str) -> Arc<Mutex<FeedbackSession>> {
        let mut sessions = self.sessions.lock().await;
        if sessions.len() > 10_000 && !sessions.contains_key(conversation_id) {
            // Idle sessions carry no data worth keeping.
            let before = sessions.len();
            sessions.retain(|_, s| s.try_lock().map(|g| g.is_active()).unwrap_or(true));
            warn!(
                evicted = before - sessions.len(),
                "Pruned idle conversation sessions"
            );
        }
        sessions
            .entry(conversation_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(FeedbackSession::new())))
            .clone()
    }
}
