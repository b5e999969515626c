//! JSON API surface.
//!
//! One endpoint: `POST /api/query` with body `{"query": "..."}`. Success
//! answers `{response, products, degraded}`; an empty or missing query is a
//! 400 and every pipeline failure collapses to a generic 500; failure
//! details go to the structured log under the request's correlation id, never
//! to the caller.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use atelier_agent::{PipelineError, QueryPipeline};
use atelier_core::domain::product::Product;

#[derive(Clone)]
pub struct ApiState {
    pipeline: Arc<QueryPipeline>,
}

impl ApiState {
    pub fn new(pipeline: Arc<QueryPipeline>) -> Self {
        Self { pipeline }
    }
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
    pub products: Vec<Product>,
    pub degraded: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/api/query", post(query)).with_state(state)
}

pub async fn query(
    State(state): State<ApiState>,
    Json(body): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    match state.pipeline.run(&body.query).await {
        Ok(result) => {
            info!(
                event_name = "api.query.answered",
                correlation_id = %correlation_id,
                product_count = result.products.len(),
                degraded = result.degraded,
                "query answered"
            );
            Ok(Json(QueryResponse {
                response: result.reply,
                products: result.products,
                degraded: result.degraded,
            }))
        }
        Err(PipelineError::InvalidRequest) => {
            info!(
                event_name = "api.query.rejected",
                correlation_id = %correlation_id,
                "query missing or empty"
            );
            Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError { error: "Query non specificata".to_string() }),
            ))
        }
        Err(pipeline_error) => {
            error!(
                event_name = "api.query.failed",
                correlation_id = %correlation_id,
                error = %pipeline_error,
                "query pipeline failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError { error: "Errore nella richiesta".to_string() }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, Json};

    use atelier_agent::{
        ChatMessage, CompletionOptions, LlmClient, LlmError, QueryPipeline,
    };
    use atelier_db::fixtures::sample_products;
    use atelier_db::repositories::InMemoryCatalogStore;

    use super::{query, ApiState, QueryRequest};

    struct ScriptedLlm {
        responses: Mutex<VecDeque<String>>,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(ToString::to_string).collect()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _options: CompletionOptions,
        ) -> Result<String, LlmError> {
            self.responses.lock().expect("lock").pop_front().ok_or(LlmError::EmptyChoices)
        }
    }

    fn state(llm: Arc<ScriptedLlm>) -> ApiState {
        let catalog = Arc::new(InMemoryCatalogStore::with_products(sample_products()));
        ApiState::new(Arc::new(QueryPipeline::new(llm, catalog)))
    }

    #[tokio::test]
    async fn answers_with_reply_and_products() {
        let llm = ScriptedLlm::new(&[
            r#"{"categoria": "lampada", "colore": "giallo", "prezzo": {"max": 200}}"#,
            "Ho trovato una lampada adatta al suo progetto.",
        ]);

        let response = query(
            State(state(llm)),
            Json(QueryRequest { query: "lampada giallo sotto 200 euro".to_string() }),
        )
        .await
        .expect("request should succeed");

        assert_eq!(response.0.response, "Ho trovato una lampada adatta al suo progetto.");
        assert_eq!(response.0.products.len(), 1);
        assert_eq!(response.0.products[0].name, "Lampada Solair");
        assert!(!response.0.degraded);
    }

    #[tokio::test]
    async fn empty_query_returns_400_with_italian_body() {
        let llm = ScriptedLlm::new(&[]);

        let result =
            query(State(state(llm)), Json(QueryRequest { query: String::new() })).await;

        let (status, body) = result.expect_err("empty query should fail");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0.error, "Query non specificata");
    }

    #[tokio::test]
    async fn pipeline_failure_returns_flattened_500() {
        // Extraction succeeds, synthesis runs out of scripted responses.
        let llm = ScriptedLlm::new(&[r#"{"categoria": "lampada"}"#]);

        let result = query(
            State(state(llm)),
            Json(QueryRequest { query: "lampada gialla".to_string() }),
        )
        .await;

        let (status, body) = result.expect_err("pipeline failure should surface");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.0.error, "Errore nella richiesta");
    }

    #[tokio::test]
    async fn degraded_flag_is_reported_to_the_caller() {
        let llm = ScriptedLlm::new(&["non-json extraction output", "Ecco il nostro catalogo."]);

        let response = query(
            State(state(llm)),
            Json(QueryRequest { query: "qualcosa di bello".to_string() }),
        )
        .await
        .expect("fallback should still answer");

        assert!(response.0.degraded);
        assert_eq!(response.0.products.len(), sample_products().len());
    }
}
