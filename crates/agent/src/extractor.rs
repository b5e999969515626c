use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use atelier_core::intent::FilterIntent;

use crate::llm::{ChatMessage, CompletionOptions, LlmClient, LlmError};

const EXTRACTION_SYSTEM_PROMPT: &str = "Estrai parametri (categoria, colore, materiale, prezzo, \
     dimensioni) in formato JSON dalla richiesta dell'utente.";

/// Extraction failures are recoverable: the pipeline answers them with an
/// unfiltered search instead of failing the request.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("parameter extraction call failed: {0}")]
    Completion(#[from] LlmError),
    #[error("model output is not a valid parameter object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Turns raw user text into a structured [`FilterIntent`] with one JSON-mode
/// completion call. Single-shot: no retries here.
pub struct ParameterExtractor {
    llm: Arc<dyn LlmClient>,
}

impl ParameterExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// The caller guarantees `user_query` is non-empty; the pipeline rejects
    /// empty input before this point.
    pub async fn extract(&self, user_query: &str) -> Result<FilterIntent, ExtractionError> {
        let messages =
            [ChatMessage::system(EXTRACTION_SYSTEM_PROMPT), ChatMessage::user(user_query)];

        let raw = self.llm.complete(&messages, CompletionOptions::json_object()).await?;
        let intent: FilterIntent = serde_json::from_str(&raw)?;

        debug!(
            event_name = "agent.extractor.completed",
            empty_intent = intent.is_empty(),
            "search parameters extracted"
        );

        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use atelier_core::intent::{PriceQuery, TermQuery};

    use crate::llm::{ChatMessage, CompletionOptions, LlmClient, LlmError, ResponseFormat};

    use super::{ExtractionError, ParameterExtractor};

    struct CannedLlm {
        response: Result<&'static str, ()>,
    }

    #[async_trait::async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            options: CompletionOptions,
        ) -> Result<String, LlmError> {
            assert_eq!(messages.len(), 2, "extraction sends system + user messages");
            assert_eq!(
                options.response_format,
                ResponseFormat::JsonObject,
                "extraction always requests JSON mode"
            );
            self.response
                .map(ToString::to_string)
                .map_err(|_| LlmError::EmptyChoices)
        }
    }

    #[tokio::test]
    async fn extracts_intent_from_json_response() {
        let extractor = ParameterExtractor::new(Arc::new(CannedLlm {
            response: Ok(r#"{"categoria": "lampada", "colore": "giallo", "prezzo": {"max": 200}}"#),
        }));

        let intent = extractor.extract("lampada giallo sotto 200 euro").await.expect("extract");

        assert_eq!(intent.category, Some(TermQuery::One("lampada".to_string())));
        assert_eq!(intent.color, Some(TermQuery::One("giallo".to_string())));
        assert_eq!(intent.price, Some(PriceQuery::Range { min: None, max: Some(200.0) }));
    }

    #[tokio::test]
    async fn non_json_response_is_an_invalid_json_error() {
        let extractor = ParameterExtractor::new(Arc::new(CannedLlm {
            response: Ok("certo! ecco i parametri che ho trovato"),
        }));

        let error = extractor.extract("lampada gialla").await.expect_err("should fail");
        assert!(matches!(error, ExtractionError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn completion_failure_maps_to_completion_error() {
        let extractor = ParameterExtractor::new(Arc::new(CannedLlm { response: Err(()) }));

        let error = extractor.extract("lampada gialla").await.expect_err("should fail");
        assert!(matches!(error, ExtractionError::Completion(_)));
    }
}
