//! Language-model side of the search assistant.
//!
//! This crate turns one free-text request into one answered search:
//! 1. **Parameter extraction** (`extractor`): NL to structured `FilterIntent`
//! 2. **Filter build**: `atelier_core::filter`, pure and deterministic
//! 3. **Catalog lookup**: through the injected `CatalogGateway`
//! 4. **Response synthesis** (`synthesizer`): result count to short reply
//!
//! orchestrated by [`pipeline::QueryPipeline`].
//!
//! The model is strictly a translator on the way in and a copywriter on the
//! way out. It never filters the catalog itself, never sees full product
//! records, and unparseable model output degrades to an unfiltered search
//! rather than a failed request.

pub mod extractor;
pub mod llm;
pub mod openai;
pub mod pipeline;
pub mod synthesizer;

pub use llm::{ChatMessage, ChatRole, CompletionOptions, LlmClient, LlmError, ResponseFormat};
pub use pipeline::{PipelineError, PipelineResult, QueryPipeline};
