use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Product, ProductDraft, ProductId},
    protocol::{AckResponse, Envelope, ProductCreatedResponse, ProductListResponse},
};
use tracing::{debug, warn};
use url::Url;

mod edit_session;
pub mod error;
pub mod inventory;
pub mod surface;

pub use edit_session::{EditSession, Outcome};
pub use error::{FormError, StoreError};
pub use inventory::{InventoryStats, ProductRow, StockTier};
pub use surface::{
    Connectivity, FormFields, FormMode, Notification, RenderSurface, Severity,
    DEFAULT_NOTIFICATION_TTL,
};

/// The remote product store as seen by an edit session.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn create_product(&self, draft: &ProductDraft) -> Result<(), StoreError>;
    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), StoreError>;
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;
    /// Reachability check, independent of any envelope.
    async fn probe(&self) -> Connectivity;
}

/// [`ProductStore`] over the store's JSON/HTTP interface.
#[derive(Debug, Clone)]
pub struct HttpProductStore {
    http: Client,
    base_url: String,
}

impl HttpProductStore {
    pub fn new(base_url: &Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn product_url(&self, id: ProductId) -> String {
        format!("{}/{}", self.base_url, id.0)
    }
}

/// Reads an envelope regardless of HTTP status; `success: false` is the failure signal.
async fn read_envelope<T>(response: Response) -> Result<T, StoreError>
where
    T: DeserializeOwned + Envelope,
{
    let status = response.status();
    let body = response.bytes().await?;
    let envelope: T = serde_json::from_slice(&body)?;
    if !envelope.success() {
        warn!(%status, error = ?envelope.error_message(), "product store rejected request");
        return Err(StoreError::Rejected {
            message: envelope.error_message().map(str::to_string),
        });
    }
    Ok(envelope)
}

#[async_trait]
impl ProductStore for HttpProductStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let response = self.http.get(&self.base_url).send().await?;
        let envelope: ProductListResponse = read_envelope(response).await?;
        let products = envelope.productos.ok_or(StoreError::Malformed("productos"))?;
        debug!(count = products.len(), "fetched product list");
        Ok(products)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<(), StoreError> {
        let response = self.http.post(&self.base_url).json(draft).send().await?;
        let envelope: ProductCreatedResponse = read_envelope(response).await?;
        if let Some(product) = envelope.producto {
            debug!(product_id = product.id.0, "product created");
        }
        Ok(())
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> Result<(), StoreError> {
        let response = self
            .http
            .put(self.product_url(id))
            .json(draft)
            .send()
            .await?;
        let _: AckResponse = read_envelope(response).await?;
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let response = self.http.delete(self.product_url(id)).send().await?;
        let _: AckResponse = read_envelope(response).await?;
        Ok(())
    }

    async fn probe(&self) -> Connectivity {
        match self.http.get(&self.base_url).send().await {
            Ok(response) if response.status().is_success() => Connectivity::Connected,
            Ok(response) => {
                debug!(status = %response.status(), "store probe returned error status");
                Connectivity::Error
            }
            Err(err) => {
                debug!(error = %err, "store probe failed");
                Connectivity::Disconnected
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
