//! Canonical sample catalog used by tests.
//!
//! The set deliberately includes the pairing exercised by the end-to-end
//! search scenario: a yellow lamp under 200 and a table well above it.

use chrono::Utc;
use serde_json::json;

use atelier_core::domain::product::{Dimensions, Product, ProductId};

use crate::connection::DbPool;
use crate::repositories::StorageError;

pub fn sample_products() -> Vec<Product> {
    vec![
        product(
            "lampada-solair",
            "Lampada Solair",
            "lampada",
            Some("da tavolo"),
            &["giallo", "oro"],
            &["ottone", "vetro"],
            Some((18.0, 18.0, 42.0)),
            159.0,
            Some("Lampada da tavolo in ottone satinato con diffusore in vetro."),
            json!({"potenza": "12W", "attacco": "E27"}),
        ),
        product(
            "tavolo-minimal",
            "Tavolo Minimal",
            "tavolo",
            Some("da pranzo"),
            &["naturale"],
            &["rovere"],
            Some((200.0, 90.0, 75.0)),
            695.0,
            Some("Tavolo da pranzo in rovere massello, linea essenziale."),
            json!({"posti": 8}),
        ),
        product(
            "sedia-onda",
            "Sedia Onda",
            "sedia",
            None,
            &["nero", "grigio"],
            &["acciaio", "pelle"],
            Some((55.0, 52.0, 80.0)),
            240.0,
            None,
            json!({"impilabile": false}),
        ),
        product(
            "libreria-modulo",
            "Libreria Modulo",
            "libreria",
            Some("componibile"),
            &["bianco"],
            &["alluminio", "mdf"],
            Some((120.0, 35.0, 200.0)),
            480.0,
            Some("Sistema componibile a moduli aperti."),
            json!({"moduli": 5, "portata_ripiano": "25kg"}),
        ),
        product(
            "lampada-arco",
            "Lampada Arco",
            "lampada",
            Some("da terra"),
            &["nero"],
            &["acciaio", "marmo"],
            Some((60.0, 30.0, 210.0)),
            1150.0,
            Some("Lampada ad arco con base in marmo."),
            json!({"potenza": "20W"}),
        ),
    ]
}

/// Insert the sample catalog and return how many products were written.
pub async fn seed_sample_catalog(pool: &DbPool) -> Result<usize, StorageError> {
    let products = sample_products();
    for product in &products {
        insert_product(pool, product).await?;
    }
    Ok(products.len())
}

async fn insert_product(pool: &DbPool, product: &Product) -> Result<(), StorageError> {
    let colors = encode_json(&product.colors, "colors")?;
    let materials = encode_json(&product.materials, "materials")?;
    let images = encode_json(&product.images, "images")?;
    let technical_specs = encode_json(&product.technical_specs, "technical_specs")?;

    sqlx::query(
        "INSERT INTO product
            (id, name, category, subcategory, colors, materials,
             length_cm, width_cm, height_cm, dimension_unit,
             price, images, description, technical_specs, available, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&product.id.0)
    .bind(&product.name)
    .bind(&product.category)
    .bind(&product.subcategory)
    .bind(colors)
    .bind(materials)
    .bind(product.dimensions.as_ref().map(|d| d.length))
    .bind(product.dimensions.as_ref().map(|d| d.width))
    .bind(product.dimensions.as_ref().map(|d| d.height))
    .bind(product.dimensions.as_ref().map(|d| d.unit.clone()).unwrap_or_else(|| "cm".to_string()))
    .bind(product.price)
    .bind(images)
    .bind(&product.description)
    .bind(technical_specs)
    .bind(product.available)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

fn encode_json<T: serde::Serialize>(value: &T, column: &str) -> Result<String, StorageError> {
    serde_json::to_string(value)
        .map_err(|error| StorageError::Decode(format!("{column}: {error}")))
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    category: &str,
    subcategory: Option<&str>,
    colors: &[&str],
    materials: &[&str],
    dimensions: Option<(f64, f64, f64)>,
    price: f64,
    description: Option<&str>,
    technical_specs: serde_json::Value,
) -> Product {
    let technical_specs = match technical_specs {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };

    Product {
        id: ProductId(id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        subcategory: subcategory.map(ToString::to_string),
        colors: colors.iter().map(ToString::to_string).collect(),
        materials: materials.iter().map(ToString::to_string).collect(),
        dimensions: dimensions.map(|(length, width, height)| Dimensions {
            length,
            width,
            height,
            unit: "cm".to_string(),
        }),
        price,
        images: vec![format!("/images/{id}.jpg")],
        description: description.map(ToString::to_string),
        technical_specs,
        available: true,
    }
}
