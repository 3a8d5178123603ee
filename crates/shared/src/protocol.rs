//! Response envelopes exchanged with the product store.
//!
//! Every endpoint answers with `{ "success": bool, ... }`. A `false` flag is an
//! application failure regardless of the HTTP status, and `error` carries the
//! user-facing message when present.

use serde::{Deserialize, Serialize};

use crate::domain::{Product, ProductDraft};

/// Common view over the envelope variants.
pub trait Envelope {
    fn success(&self) -> bool;
    fn error_message(&self) -> Option<&str>;
}

macro_rules! impl_envelope {
    ($name:ident) => {
        impl Envelope for $name {
            fn success(&self) -> bool {
                self.success
            }

            fn error_message(&self) -> Option<&str> {
                self.error.as_deref()
            }
        }
    };
}

/// `GET /productos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productos: Option<Vec<Product>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /productos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreatedResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producto: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `PUT /productos/{id}` and `DELETE /productos/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl_envelope!(ProductListResponse);
impl_envelope!(ProductCreatedResponse);
impl_envelope!(AckResponse);

impl ProductListResponse {
    pub fn ok(products: Vec<Product>) -> Self {
        Self {
            success: true,
            productos: Some(products),
            error: None,
        }
    }
}

impl ProductCreatedResponse {
    pub fn ok(product: Product) -> Self {
        Self {
            success: true,
            producto: Some(product),
            error: None,
        }
    }
}

impl AckResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Partial update body accepted by `PUT /productos/{id}`.
///
/// Absent fields keep their stored value. A full [`ProductDraft`] decodes into
/// a patch with every field set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "precio", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(
        rename = "descripcion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.stock.is_none()
    }
}

impl From<ProductDraft> for ProductPatch {
    fn from(draft: ProductDraft) -> Self {
        Self {
            name: Some(draft.name),
            price: Some(draft.price),
            description: Some(draft.description),
            stock: Some(draft.stock),
        }
    }
}
