//! Translation of an untrusted [`FilterIntent`] into a safe, bounded catalog
//! predicate.
//!
//! The builder is a pure function: same intent in, same predicate out, input
//! never mutated. Malformed field values degrade to "no constraint on that
//! field"; the predicate only ever carries constraints actually derived from
//! well-formed input.

use std::collections::BTreeSet;

use crate::domain::product::Product;
use crate::intent::{FilterIntent, PriceQuery, TermQuery};

/// Price constraint, decided once at build time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PriceBound {
    Unbounded,
    UpperBound(f64),
    LowerBound(f64),
    Range { min: f64, max: f64 },
}

impl PriceBound {
    pub fn contains(&self, price: f64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::UpperBound(max) => price <= *max,
            Self::LowerBound(min) => price >= *min,
            Self::Range { min, max } => price >= *min && price <= *max,
        }
    }
}

/// Normalized filter expression over the product catalog.
///
/// Term constraints are lowercased and deduplicated; an empty term list means
/// no constraint on that field. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogPredicate {
    pub category: Option<String>,
    pub colors: Vec<String>,
    pub materials: Vec<String>,
    pub price: PriceBound,
}

impl CatalogPredicate {
    pub fn build(intent: &FilterIntent) -> Self {
        Self {
            category: category_needle(intent.category.as_ref()),
            colors: normalize_terms(intent.color.as_ref()),
            materials: normalize_terms(intent.material.as_ref()),
            price: price_bound(intent.price.as_ref()),
        }
    }

    pub fn unconstrained() -> Self {
        Self::build(&FilterIntent::default())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.category.is_none()
            && self.colors.is_empty()
            && self.materials.is_empty()
            && self.price == PriceBound::Unbounded
    }

    /// In-process evaluation of the predicate against one product. The SQL
    /// store compiles the same semantics to a query; this form backs the
    /// in-memory store and tests.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = &self.category {
            if !product.category.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }

        if !self.colors.is_empty() && !intersects(&self.colors, &product.colors) {
            return false;
        }

        if !self.materials.is_empty() && !intersects(&self.materials, &product.materials) {
            return false;
        }

        self.price.contains(product.price)
    }
}

fn category_needle(term: Option<&TermQuery>) -> Option<String> {
    // Only a plain string is recognized for the category; lists and other
    // shapes carry no constraint.
    match term {
        Some(TermQuery::One(value)) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
        }
        _ => None,
    }
}

fn normalize_terms(term: Option<&TermQuery>) -> Vec<String> {
    let values: &[String] = match term {
        Some(TermQuery::One(value)) => std::slice::from_ref(value),
        Some(TermQuery::Many(values)) => values.as_slice(),
        _ => &[],
    };

    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|value| value.trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

fn price_bound(price: Option<&PriceQuery>) -> PriceBound {
    match price {
        Some(PriceQuery::Limit(limit)) if valid_price(*limit) => PriceBound::UpperBound(*limit),
        Some(PriceQuery::Range { min, max }) => {
            let min = min.filter(|value| valid_price(*value));
            let max = max.filter(|value| valid_price(*value));
            match (min, max) {
                (Some(min), Some(max)) if min <= max => PriceBound::Range { min, max },
                // An inverted range is malformed input, not an error.
                (Some(_), Some(_)) => PriceBound::Unbounded,
                (Some(min), None) => PriceBound::LowerBound(min),
                (None, Some(max)) => PriceBound::UpperBound(max),
                (None, None) => PriceBound::Unbounded,
            }
        }
        _ => PriceBound::Unbounded,
    }
}

fn valid_price(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn intersects(wanted: &[String], present: &[String]) -> bool {
    present.iter().any(|value| {
        let normalized = value.trim().to_lowercase();
        wanted.iter().any(|candidate| candidate == &normalized)
    })
}
