use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::{
    domain::{Product, ProductDraft, ProductId},
    protocol::ProductPatch,
};

const PRODUCT_COLUMNS: &str =
    "id, nombre, precio, descripcion, stock, CAST(fecha_creacion AS TEXT) AS fecha_creacion";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM productos ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .context("failed to list products")?;
        rows.iter().map(product_from_row).collect()
    }

    pub async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM productos WHERE id = ?"))
            .bind(product_id.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load product {product_id}"))?;
        row.as_ref().map(product_from_row).transpose()
    }

    /// Inserts a product and returns it as stored, timestamp included.
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product> {
        let row = sqlx::query(&format!(
            "INSERT INTO productos (nombre, precio, descripcion, stock)
             VALUES (?, ?, ?, ?)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(draft.price)
        .bind(&draft.description)
        .bind(draft.stock)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert product")?;
        let product = product_from_row(&row)?;
        debug!(product_id = product.id.0, "product inserted");
        Ok(product)
    }

    /// Applies `patch` over the stored row. Returns `None` when the id is unknown.
    pub async fn update_product(
        &self,
        product_id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>> {
        let mut tx = self.pool.begin().await?;
        let Some(row) =
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM productos WHERE id = ?"))
                .bind(product_id.0)
                .fetch_optional(&mut *tx)
                .await?
        else {
            return Ok(None);
        };
        let current = product_from_row(&row)?;

        let name = patch.name.clone().unwrap_or(current.name);
        let price = patch.price.unwrap_or(current.price);
        let description = patch.description.clone().or(current.description);
        let stock = patch.stock.unwrap_or(current.stock);

        let row = sqlx::query(&format!(
            "UPDATE productos
             SET nombre = ?, precio = ?, descripcion = ?, stock = ?
             WHERE id = ?
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(stock)
        .bind(product_id.0)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("failed to update product {product_id}"))?;
        tx.commit().await?;

        product_from_row(&row).map(Some)
    }

    /// Returns whether a row was removed.
    pub async fn delete_product(&self, product_id: ProductId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM productos WHERE id = ?")
            .bind(product_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete product {product_id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn product_from_row(row: &SqliteRow) -> Result<Product> {
    Ok(Product {
        id: ProductId(row.try_get("id")?),
        name: row.try_get("nombre")?,
        price: row.try_get("precio")?,
        description: row.try_get("descripcion")?,
        stock: row.try_get("stock")?,
        created_at: row.try_get("fecha_creacion")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
