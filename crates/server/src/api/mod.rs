use shared::{
    domain::{validate_name, validate_price, validate_stock, Product, ProductDraft, ProductId},
    error::ApiError,
    protocol::ProductPatch,
};
use storage::Storage;
use tracing::{error, info};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub fn products_route() -> &'static str {
    "/productos"
}

pub fn product_route() -> &'static str {
    "/productos/:product_id"
}

pub async fn list_products(ctx: &ApiContext) -> Result<Vec<Product>, ApiError> {
    ctx.storage.list_products().await.map_err(internal)
}

pub async fn create_product(ctx: &ApiContext, draft: ProductDraft) -> Result<Product, ApiError> {
    let draft = draft.validated()?;
    let product = ctx.storage.create_product(&draft).await.map_err(internal)?;
    info!(product_id = product.id.0, name = %product.name, "product created");
    Ok(product)
}

pub async fn update_product(
    ctx: &ApiContext,
    product_id: ProductId,
    patch: ProductPatch,
) -> Result<Product, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::validation("no fields provided for update"));
    }
    let patch = ProductPatch {
        name: patch.name.as_deref().map(validate_name).transpose()?,
        price: patch.price.map(validate_price).transpose()?,
        description: patch.description,
        stock: patch.stock.map(validate_stock).transpose()?,
    };

    let product = ctx
        .storage
        .update_product(product_id, &patch)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    info!(product_id = product_id.0, "product updated");
    Ok(product)
}

pub async fn delete_product(ctx: &ApiContext, product_id: ProductId) -> Result<(), ApiError> {
    let removed = ctx
        .storage
        .delete_product(product_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(ApiError::not_found("Product not found"));
    }
    info!(product_id = product_id.0, "product deleted");
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %err, "storage failure");
    ApiError::internal(err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
