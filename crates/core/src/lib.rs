pub mod config;
pub mod domain;
pub mod filter;
pub mod intent;

pub use domain::product::{Dimensions, Product, ProductId};
pub use filter::{CatalogPredicate, PriceBound};
pub use intent::{FilterIntent, PriceQuery, TermQuery};
