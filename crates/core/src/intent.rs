//! Structured search criteria extracted from a free-text request.
//!
//! The extraction model is instructed to answer with a JSON object using the
//! Italian parameter names `categoria`, `colore`, `materiale`, `prezzo` and
//! `dimensioni`. Model output is untrusted: every field is optional and every
//! field may arrive with a shape the instruction did not ask for. Decoding is
//! therefore tolerant: a field of an unexpected shape lands in a catch-all
//! variant and later normalizes to "no constraint" instead of failing the
//! whole decode.

use serde::Deserialize;

/// A term-valued criterion the model may emit as a scalar, a list, or
/// something else entirely.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TermQuery {
    One(String),
    Many(Vec<String>),
    Other(serde_json::Value),
}

/// A price criterion: plain number (upper limit), `{min, max}` object with
/// either bound optional, or an unrecognized shape.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceQuery {
    Limit(f64),
    Range { min: Option<f64>, max: Option<f64> },
    Other(serde_json::Value),
}

/// Partially-populated search criteria for one catalog lookup.
///
/// Produced by the parameter extractor, consumed once by the filter builder,
/// never persisted. `dimensioni` is accepted so that well-behaved model
/// output round-trips, but no catalog constraint is derived from it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FilterIntent {
    #[serde(rename = "categoria")]
    pub category: Option<TermQuery>,
    #[serde(rename = "colore")]
    pub color: Option<TermQuery>,
    #[serde(rename = "materiale")]
    pub material: Option<TermQuery>,
    #[serde(rename = "prezzo")]
    pub price: Option<PriceQuery>,
    #[serde(rename = "dimensioni")]
    pub dimensions: Option<serde_json::Value>,
}

impl FilterIntent {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.color.is_none()
            && self.material.is_none()
            && self.price.is_none()
            && self.dimensions.is_none()
    }
}
