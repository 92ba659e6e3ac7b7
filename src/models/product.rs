use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::object_id::ObjectId;

/// A product price, kept exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Integer(n) => write!(f, "{}", n),
            Price::Decimal(n) => write!(f, "{}", n),
            Price::Text(s) => f.write_str(s),
        }
    }
}

fn default_in_stock() -> bool {
    true
}

/// The fields a client supplies when creating a product.
///
/// Unknown fields are ignored, so a client-supplied `createdAt` never
/// reaches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// The product's display name.
    pub product_name: String,
    /// The long-form description.
    #[serde(default)]
    pub description: String,
    /// The price, stored as given.
    pub price: Price,
    /// The category; the dashboard may submit `null`.
    #[serde(default)]
    pub category: Option<String>,
    /// Feature bullet points, in order.
    #[serde(default)]
    pub features: Vec<String>,
    /// Whether the product can be bought.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    /// An image URL.
    #[serde(default)]
    pub product_image: Option<String>,
}

/// The document persisted for each product, keyed by its `ObjectId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(flatten)]
    pub input: ProductInput,
    /// Set by the repository at insertion time.
    pub created_at: DateTime<Utc>,
}

impl ProductDocument {
    /// Stamps an input with its creation time.
    pub fn stamped(input: ProductInput, created_at: DateTime<Utc>) -> Self {
        Self { input, created_at }
    }
}

/// A stored product as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The store-assigned identifier, serialized as a hex string.
    #[serde(alias = "_id")]
    pub id: ObjectId,
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default)]
    pub product_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Combines a stored document with the identifier it was stored under.
    pub fn from_document(id: ObjectId, document: ProductDocument) -> Self {
        let ProductDocument { input, created_at } = document;
        Self {
            id,
            product_name: input.product_name,
            description: input.description,
            price: input.price,
            category: input.category,
            features: input.features,
            in_stock: input.in_stock,
            product_image: input.product_image,
            created_at,
        }
    }

    /// The client-supplied part of this product.
    pub fn input(&self) -> ProductInput {
        ProductInput {
            product_name: self.product_name.clone(),
            description: self.description.clone(),
            price: self.price.clone(),
            category: self.category.clone(),
            features: self.features.clone(),
            in_stock: self.in_stock,
            product_image: self.product_image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_defaults_optional_fields() {
        let input: ProductInput =
            sonic_rs::from_str(r#"{"productName":"Acme CRM","price":"29"}"#).unwrap();
        assert_eq!(input.product_name, "Acme CRM");
        assert_eq!(input.description, "");
        assert_eq!(input.price, Price::Text("29".to_string()));
        assert_eq!(input.category, None);
        assert!(input.features.is_empty());
        assert!(input.in_stock);
        assert_eq!(input.product_image, None);
    }

    #[test]
    fn price_keeps_its_json_type() {
        let int: ProductInput =
            sonic_rs::from_str(r#"{"productName":"a","price":29}"#).unwrap();
        let dec: ProductInput =
            sonic_rs::from_str(r#"{"productName":"a","price":19.5}"#).unwrap();
        assert_eq!(int.price, Price::Integer(29));
        assert_eq!(dec.price, Price::Decimal(19.5));
        assert_eq!(sonic_rs::to_string(&int.price).unwrap(), "29");
        assert_eq!(dec.price.to_string(), "19.5");
    }

    #[test]
    fn input_requires_a_name_and_price() {
        assert!(sonic_rs::from_str::<ProductInput>(r#"{"price":1}"#).is_err());
        assert!(sonic_rs::from_str::<ProductInput>(r#"{"productName":"a"}"#).is_err());
        assert!(sonic_rs::from_str::<ProductInput>(r#"{"productName":"a","price":1,"features":"x"}"#).is_err());
    }

    #[test]
    fn document_round_trips_through_json_value() {
        let input: ProductInput = sonic_rs::from_str(
            r#"{"productName":"DataViz","description":"Charts","price":49,"category":"Analytics",
                "features":["Dashboards"],"inStock":false,"productImage":"https://img/dv.png"}"#,
        )
        .unwrap();
        let document = ProductDocument::stamped(input, Utc::now());
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["productName"], "DataViz");
        assert_eq!(value["inStock"], false);
        assert!(value["createdAt"].is_string());
        let back: ProductDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn product_serializes_id_as_string_and_reads_legacy_underscore_id() {
        let id = ObjectId::parse_str("65a1f0c2b3d4e5f601234567").unwrap();
        let input: ProductInput =
            sonic_rs::from_str(r#"{"productName":"Acme CRM","price":10}"#).unwrap();
        let product = Product::from_document(id, ProductDocument::stamped(input.clone(), Utc::now()));

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], "65a1f0c2b3d4e5f601234567");
        assert_eq!(json["productName"], "Acme CRM");
        assert_eq!(product.input(), input);

        let legacy = serde_json::json!({
            "_id": "65a1f0c2b3d4e5f601234567",
            "productName": "Acme CRM",
            "price": 10,
            "createdAt": "2024-01-01T00:00:00Z"
        });
        let parsed: Product = serde_json::from_value(legacy).unwrap();
        assert_eq!(parsed.id, id);
    }
}
