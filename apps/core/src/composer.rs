//! Answer composition: grounding prompt construction plus the canonical
//! "more information" suffix.

use crate::completion::CompletionService;
use crate::error::AppError;
use crate::models::Fragment;
use std::sync::Arc;

/// Shared by the composer and the router's direct-URL short path.
pub const MORE_INFO_PREFIX: &str = "You can find more information here: ";

/// Grounding fragments beyond this count are not worth the prompt tokens.
const MAX_PROMPT_FRAGMENTS: usize = 5;

pub struct AnswerComposer {
    completion: Arc<dyn CompletionService>,
    site_name: String,
}

impl AnswerComposer {
    pub fn new(completion: Arc<dyn CompletionService>, site_name: String) -> Self {
        Self {
            completion,
            site_name,
        }
    }

    /// Generate a grounded answer for `question` from the retrieved
    /// fragments, preserving their order, and append the source link of the
    /// top fragment. Completion failures propagate; there is no canned
    /// degradation at this layer.
    pub async fn compose(
        &self,
        question: &str,
        fragments: &[Fragment],
    ) -> Result<String, AppError> {
        let prompt = self.build_prompt(question, fragments);
        let mut answer = self.completion.complete(&prompt).await?;

        if let Some(first) = fragments.first() {
            answer.push_str("\n\n");
            answer.push_str(MORE_INFO_PREFIX);
            answer.push_str(&first.source_url);
        }

        Ok(answer)
    }

    fn build_prompt(&self, question: &str, fragments: &[Fragment]) -> String {
        let blocks: Vec<&str> = fragments
            .iter()
            .map(|f| f.text.as_str())
            .filter(|t| !t.is_empty())
            .take(MAX_PROMPT_FRAGMENTS)
            .collect();

        format!(
            "You are a knowledgeable assistant for the {} site.\n\
             Use ONLY the following extracted web content to answer the user's question in a concise way.\n\
             Provide a best-effort answer,\n\
             but always indicate uncertainty. Don't hallucinate new facts.\n\n\
             {}\n\nUser question: {}\nAnswer (in concise form):",
            self.site_name,
            blocks.join("\n\n"),
            question
        )
    }
}
