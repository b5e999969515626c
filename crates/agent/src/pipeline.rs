//! The query-to-answer pipeline.
//!
//! Straight-line orchestration: validate → extract → build filter → search →
//! synthesize → package. The only control-flow branch is the extraction
//! fallback: unusable extraction output degrades to an unfiltered broad
//! search (flagged on the result) instead of failing the request. Storage and
//! synthesis failures abort the request: a reply without data, or data
//! without a reply, is not a meaningful partial result.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use atelier_core::domain::product::Product;
use atelier_core::filter::CatalogPredicate;
use atelier_core::intent::FilterIntent;
use atelier_db::repositories::{CatalogGateway, StorageError};

use crate::extractor::ParameterExtractor;
use crate::llm::LlmClient;
use crate::synthesizer::{ResponseSynthesizer, SynthesisError};

/// Upper bound on products returned per request.
pub const RESULT_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("query must not be empty")]
    InvalidRequest,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Answer for one request. `degraded` is true when extraction failed and the
/// search ran unfiltered, so result semantics changed.
#[derive(Debug)]
pub struct PipelineResult {
    pub reply: String,
    pub products: Vec<Product>,
    pub degraded: bool,
}

pub struct QueryPipeline {
    extractor: ParameterExtractor,
    synthesizer: ResponseSynthesizer,
    catalog: Arc<dyn CatalogGateway>,
}

impl QueryPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self {
            extractor: ParameterExtractor::new(llm.clone()),
            synthesizer: ResponseSynthesizer::new(llm),
            catalog,
        }
    }

    pub async fn run(&self, user_query: &str) -> Result<PipelineResult, PipelineError> {
        let query = user_query.trim();
        if query.is_empty() {
            return Err(PipelineError::InvalidRequest);
        }

        let (intent, degraded) = match self.extractor.extract(query).await {
            Ok(intent) => (intent, false),
            Err(error) => {
                warn!(
                    event_name = "agent.pipeline.extraction_fallback",
                    error = %error,
                    "parameter extraction failed, falling back to unfiltered search"
                );
                (FilterIntent::default(), true)
            }
        };

        let predicate = CatalogPredicate::build(&intent);
        let products = self.catalog.find(&predicate, RESULT_LIMIT).await?;
        let reply = self.synthesizer.synthesize(query, &products).await?;

        info!(
            event_name = "agent.pipeline.completed",
            product_count = products.len(),
            degraded,
            unconstrained = predicate.is_unconstrained(),
            "query answered"
        );

        Ok(PipelineResult { reply, products, degraded })
    }
}
