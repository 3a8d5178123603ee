use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProductId);

/// Timestamp layouts the store has been seen to emit for `fecha_creacion`.
const CREATED_AT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A product as held by the remote store.
///
/// Field names on the wire follow the deployed store (`nombre`, `precio`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    pub stock: i64,
    #[serde(
        rename = "fecha_creacion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl Product {
    /// Description with empty strings folded into `None`.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    pub fn created_at_parsed(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.as_deref()?.trim();
        CREATED_AT_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    }

    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone().unwrap_or_default(),
            stock: self.stock,
        }
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    pub stock: i64,
}

impl ProductDraft {
    /// Checks every field; the returned draft carries the trimmed name.
    pub fn validated(self) -> Result<Self, ApiError> {
        Ok(Self {
            name: validate_name(&self.name)?,
            price: validate_price(self.price)?,
            description: self.description,
            stock: validate_stock(self.stock)?,
        })
    }
}

pub fn validate_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}

pub fn validate_price(price: f64) -> Result<f64, ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::validation(
            "price must be a non-negative number",
        ));
    }
    Ok(price)
}

pub fn validate_stock(stock: i64) -> Result<i64, ApiError> {
    if stock < 0 {
        return Err(ApiError::validation("stock must not be negative"));
    }
    Ok(stock)
}
