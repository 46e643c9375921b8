//! AI expansion of a topic into child ideas.
//!
//! The session never awaits a [`Suggester`] itself. It hands out an [`ExpansionRequest`], the
//! caller drives [`fetch_suggestions`] on whatever executor it owns, and the resulting
//! [`Expansion`] is merged back with `EditSession::apply_expansion`.

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::{debug, warn};

/// Number of ideas asked of a remote model.
pub const REQUESTED_IDEAS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SuggestError {
    #[error("suggestion service unavailable: {0}")]
    Unavailable(String),
    #[error("malformed suggestion payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub trait Suggester {
    fn suggest(&self, topic: &str) -> BoxFuture<'static, Result<Vec<Suggestion>, SuggestError>>;
}

/// Prompt sent to a text model for `topic`.
pub fn expansion_prompt(topic: &str) -> String {
    format!(
        "Generate {REQUESTED_IDEAS} concise sub-topics or related ideas for the mind map node: \
         \"{topic}\". Return only the list of strings."
    )
}

#[derive(Debug, Deserialize)]
struct IdeasPayload {
    #[serde(default)]
    ideas: Option<Vec<String>>,
}

/// Reads a `{"ideas": [...]}` response. A blank body or a missing list means no ideas.
pub fn parse_suggestion_payload(text: &str) -> Result<Vec<Suggestion>, SuggestError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let payload: IdeasPayload = serde_json::from_str(text)?;
    Ok(payload
        .ideas
        .unwrap_or_default()
        .into_iter()
        .map(Suggestion::new)
        .collect())
}

/// Canned ideas used when no model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSuggester;

impl Suggester for OfflineSuggester {
    fn suggest(&self, topic: &str) -> BoxFuture<'static, Result<Vec<Suggestion>, SuggestError>> {
        let ideas: Vec<Suggestion> = (1..=3)
            .map(|i| Suggestion::new(format!("Idea {i} for {topic}")))
            .collect();
        Box::pin(futures::future::ready(Ok::<_, SuggestError>(ideas)))
    }
}

/// Snapshot taken when an expansion starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    pub target_id: String,
    pub topic: String,
}

/// Suggestions ready to be grafted under `target_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub target_id: String,
    pub suggestions: Vec<Suggestion>,
}

impl Expansion {
    pub fn texts(&self) -> Vec<&str> {
        self.suggestions.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Runs `suggester` for `request`. Failures are logged and yield an empty expansion.
pub async fn fetch_suggestions<S>(suggester: &S, request: ExpansionRequest) -> Expansion
where
    S: Suggester + ?Sized,
{
    let suggestions = match suggester.suggest(&request.topic).await {
        Ok(suggestions) => {
            debug!(
                target_id = %request.target_id,
                count = suggestions.len(),
                "suggestions received"
            );
            suggestions
        }
        Err(err) => {
            warn!(target_id = %request.target_id, error = %err, "suggestion request failed");
            Vec::new()
        }
    };
    Expansion {
        target_id: request.target_id,
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    struct Failing;

    impl Suggester for Failing {
        fn suggest(&self, _: &str) -> BoxFuture<'static, Result<Vec<Suggestion>, SuggestError>> {
            let err = SuggestError::Unavailable("offline".to_string());
            Box::pin(futures::future::ready(Err::<Vec<Suggestion>, _>(err)))
        }
    }

    fn request(topic: &str) -> ExpansionRequest {
        ExpansionRequest {
            target_id: "n1".to_string(),
            topic: topic.to_string(),
        }
    }

    #[test]
    fn payload_with_ideas() {
        let ideas = parse_suggestion_payload(r#"{"ideas": ["Roots", "Leaves"]}"#).unwrap();
        assert_eq!(ideas, [Suggestion::new("Roots"), Suggestion::new("Leaves")]);
    }

    #[test]
    fn payload_without_ideas_is_empty() {
        assert!(parse_suggestion_payload("{}").unwrap().is_empty());
        assert!(parse_suggestion_payload(r#"{"ideas": null}"#).unwrap().is_empty());
        assert!(parse_suggestion_payload("  ").unwrap().is_empty());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(matches!(
            parse_suggestion_payload("not json"),
            Err(SuggestError::Payload(_))
        ));
    }

    #[test]
    fn offline_ideas_mention_the_topic() {
        let expansion = block_on(fetch_suggestions(&OfflineSuggester, request("Trees")));
        assert_eq!(expansion.target_id, "n1");
        assert_eq!(
            expansion.texts(),
            ["Idea 1 for Trees", "Idea 2 for Trees", "Idea 3 for Trees"]
        );
    }

    #[test]
    fn failures_become_empty_expansions() {
        let expansion = block_on(fetch_suggestions(&Failing, request("Trees")));
        assert!(expansion.suggestions.is_empty());
    }

    #[test]
    fn prompt_names_the_topic() {
        assert!(expansion_prompt("Trees").contains("\"Trees\""));
    }
}
