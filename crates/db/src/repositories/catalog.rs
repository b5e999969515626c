//! SQL-backed catalog store.
//!
//! Compiles a [`CatalogPredicate`] into a single SELECT: case-insensitive
//! substring match on the category, `json_each` set-membership on the color
//! and material arrays, and plain comparisons for the price bound. Results
//! are ordered by `(name, id)` so a given predicate is stable against an
//! unchanged catalog.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use atelier_core::domain::product::{Dimensions, Product, ProductId};
use atelier_core::filter::{CatalogPredicate, PriceBound};

use super::{CatalogGateway, StorageError};
use crate::DbPool;

pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogGateway for SqlCatalogStore {
    async fn find(
        &self,
        predicate: &CatalogPredicate,
        limit: u32,
    ) -> Result<Vec<Product>, StorageError> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT id, name, category, subcategory, colors, materials, \
                    length_cm, width_cm, height_cm, dimension_unit, \
                    price, images, description, technical_specs, available \
             FROM product WHERE 1=1",
        );

        if let Some(needle) = &predicate.category {
            builder.push(" AND instr(lower(category), ");
            builder.push_bind(needle.clone());
            builder.push(") > 0");
        }

        push_membership(&mut builder, "colors", &predicate.colors);
        push_membership(&mut builder, "materials", &predicate.materials);

        match predicate.price {
            PriceBound::Unbounded => {}
            PriceBound::UpperBound(max) => {
                builder.push(" AND price <= ");
                builder.push_bind(max);
            }
            PriceBound::LowerBound(min) => {
                builder.push(" AND price >= ");
                builder.push_bind(min);
            }
            PriceBound::Range { min, max } => {
                builder.push(" AND price >= ");
                builder.push_bind(min);
                builder.push(" AND price <= ");
                builder.push_bind(max);
            }
        }

        builder.push(" ORDER BY name, id LIMIT ");
        builder.push_bind(i64::from(limit));

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(decode_product).collect()
    }
}

fn push_membership(builder: &mut QueryBuilder<'_, Sqlite>, column: &str, terms: &[String]) {
    if terms.is_empty() {
        return;
    }

    builder.push(format!(
        " AND EXISTS (SELECT 1 FROM json_each(product.{column}) \
          WHERE lower(json_each.value) IN ("
    ));
    let mut separated = builder.separated(", ");
    for term in terms {
        separated.push_bind(term.clone());
    }
    builder.push("))");
}

fn decode_product(row: &SqliteRow) -> Result<Product, StorageError> {
    let colors = decode_json_column(row, "colors")?;
    let materials = decode_json_column(row, "materials")?;
    let images = decode_json_column(row, "images")?;

    let technical_specs_raw: String = row.try_get("technical_specs")?;
    let technical_specs = serde_json::from_str(&technical_specs_raw)
        .map_err(|error| StorageError::Decode(format!("technical_specs: {error}")))?;

    let length: Option<f64> = row.try_get("length_cm")?;
    let width: Option<f64> = row.try_get("width_cm")?;
    let height: Option<f64> = row.try_get("height_cm")?;
    let unit: String = row.try_get("dimension_unit")?;
    let dimensions = match (length, width, height) {
        (Some(length), Some(width), Some(height)) => {
            Some(Dimensions { length, width, height, unit })
        }
        _ => None,
    };

    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        subcategory: row.try_get("subcategory")?,
        colors,
        materials,
        dimensions,
        price: row.try_get("price")?,
        images,
        description: row.try_get("description")?,
        technical_specs,
        available: row.try_get("available")?,
    })
}

fn decode_json_column(row: &SqliteRow, column: &str) -> Result<Vec<String>, StorageError> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw).map_err(|error| StorageError::Decode(format!("{column}: {error}")))
}
