use std::{sync::Arc, time::Duration};

use shared::domain::{Product, ProductDraft, ProductId};
use tracing::{debug, info, warn};

use crate::{
    inventory::{InventoryStats, ProductRow},
    surface::{FormFields, FormMode, Notification, RenderSurface, Severity},
    ProductStore, DEFAULT_NOTIFICATION_TTL,
};

const LOAD_FALLBACK: &str = "Error loading products";
const FETCH_FALLBACK: &str = "Error fetching products";
const CREATE_FALLBACK: &str = "Error creating product";
const UPDATE_FALLBACK: &str = "Error updating product";
const DELETE_FALLBACK: &str = "Error deleting product";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed,
    /// The user declined a confirmation; nothing was sent.
    Cancelled,
}

impl Outcome {
    pub fn is_done(self) -> bool {
        self == Self::Done
    }
}

/// One user's session against the product store.
///
/// Owns the "product being edited" state and drives the surface. Every
/// operation normalizes store failures into surface messages and reports an
/// [`Outcome`]; none of them return errors.
pub struct EditSession<R: RenderSurface> {
    store: Arc<dyn ProductStore>,
    surface: R,
    editing_id: Option<ProductId>,
    products: Vec<Product>,
    loaded: bool,
    stale: bool,
    notification_ttl: Duration,
}

impl<R: RenderSurface> EditSession<R> {
    pub fn new(store: Arc<dyn ProductStore>, surface: R) -> Self {
        Self {
            store,
            surface,
            editing_id: None,
            products: Vec::new(),
            loaded: false,
            stale: false,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn editing_id(&self) -> Option<ProductId> {
        self.editing_id
    }

    /// Products from the last successful load.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn stats(&self) -> InventoryStats {
        InventoryStats::compute(&self.products)
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_surface(self) -> R {
        self.surface
    }

    /// Fetches the full list and re-renders it, then probes connectivity.
    ///
    /// On failure the previously rendered rows stay in place and are flagged
    /// stale.
    pub async fn load(&mut self) -> Outcome {
        self.surface.set_loading(true);
        self.surface.clear_error();
        let result = self.store.list_products().await;
        self.surface.set_loading(false);

        let outcome = match result {
            Ok(products) => {
                self.apply_products(products);
                Outcome::Done
            }
            Err(err) => {
                warn!(error = %err, "failed to load products");
                let message = err.user_message(LOAD_FALLBACK);
                self.surface.show_error(&format!(
                    "Error: {message}. Make sure the product store is running."
                ));
                if self.loaded {
                    self.stale = true;
                    self.surface.set_stale(true);
                }
                Outcome::Failed
            }
        };

        let connectivity = self.store.probe().await;
        self.surface.set_connectivity(connectivity);
        outcome
    }

    fn apply_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loaded = true;
        self.stale = false;
        self.surface.set_stale(false);

        let stats = InventoryStats::compute(&self.products);
        if self.products.is_empty() {
            self.surface.show_empty();
        } else {
            let rows: Vec<ProductRow> = self.products.iter().map(ProductRow::from).collect();
            self.surface.render_rows(&rows);
        }
        self.surface.render_stats(&stats);
        debug!(count = stats.product_count, "rendered product list");
    }

    /// Reads the form currently on the surface and submits it.
    pub async fn submit_current_form(&mut self) -> Outcome {
        let form = self.surface.form_fields();
        self.submit(form).await
    }

    /// Creates when no product is being edited, updates otherwise.
    pub async fn submit(&mut self, form: FormFields) -> Outcome {
        let draft = match form.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                debug!(error = %err, "form rejected before submit");
                self.notify(Severity::Error, format!("Error: {err}"));
                return Outcome::Failed;
            }
        };

        match self.editing_id {
            None => self.create(draft).await,
            Some(id) => self.update(id, draft).await,
        }
    }

    pub async fn create(&mut self, draft: ProductDraft) -> Outcome {
        self.surface.set_submit_busy(Some("Creating..."));
        let result = self.store.create_product(&draft).await;
        self.surface.set_submit_busy(None);

        match result {
            Ok(()) => {
                info!(name = %draft.name, "product created");
                self.notify(Severity::Success, "Product created");
                self.reset_form();
                self.load().await;
                Outcome::Done
            }
            Err(err) => {
                warn!(error = %err, name = %draft.name, "failed to create product");
                self.notify(
                    Severity::Error,
                    format!("Error: {}", err.user_message(CREATE_FALLBACK)),
                );
                Outcome::Failed
            }
        }
    }

    /// Loads a fresh copy of the product into the form and enters edit mode.
    pub async fn begin_edit(&mut self, id: ProductId) -> Outcome {
        let products = match self.store.list_products().await {
            Ok(products) => products,
            Err(err) => {
                warn!(error = %err, product_id = id.0, "failed to fetch products for edit");
                self.notify(
                    Severity::Error,
                    format!("Error: {}", err.user_message(FETCH_FALLBACK)),
                );
                return Outcome::Failed;
            }
        };

        let Some(product) = products.iter().find(|product| product.id == id) else {
            warn!(product_id = id.0, "product to edit not found");
            self.notify(Severity::Error, "Error: Product not found");
            return Outcome::Failed;
        };

        self.surface.fill_form(FormFields::from_product(product));
        self.surface.set_form_mode(FormMode::Editing(id));
        self.editing_id = Some(id);
        self.surface.scroll_to_form();
        debug!(product_id = id.0, "editing product");
        Outcome::Done
    }

    pub async fn update(&mut self, id: ProductId, draft: ProductDraft) -> Outcome {
        self.surface.set_submit_busy(Some("Updating..."));
        let result = self.store.update_product(id, &draft).await;
        self.surface.set_submit_busy(None);

        match result {
            Ok(()) => {
                info!(product_id = id.0, "product updated");
                self.notify(Severity::Success, "Product updated");
                self.reset_form();
                self.load().await;
                Outcome::Done
            }
            Err(err) => {
                warn!(error = %err, product_id = id.0, "failed to update product");
                self.notify(
                    Severity::Error,
                    format!("Error: {}", err.user_message(UPDATE_FALLBACK)),
                );
                Outcome::Failed
            }
        }
    }

    /// Deletes after the surface confirms. A declined prompt sends nothing.
    pub async fn delete(&mut self, id: ProductId, display_name: &str) -> Outcome {
        let prompt = format!("Are you sure you want to delete \"{display_name}\"?");
        if !self.surface.confirm(&prompt) {
            debug!(product_id = id.0, "delete declined");
            return Outcome::Cancelled;
        }

        match self.store.delete_product(id).await {
            Ok(()) => {
                info!(product_id = id.0, "product deleted");
                self.notify(Severity::Success, "Product deleted");
                if self.editing_id == Some(id) {
                    self.reset_form();
                }
                self.load().await;
                Outcome::Done
            }
            Err(err) => {
                warn!(error = %err, product_id = id.0, "failed to delete product");
                self.notify(
                    Severity::Error,
                    format!("Error: {}", err.user_message(DELETE_FALLBACK)),
                );
                Outcome::Failed
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.surface.clear_form();
        self.surface.set_form_mode(FormMode::Create);
        self.editing_id = None;
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        let notification = Notification::new(severity, message, self.notification_ttl);
        self.surface.notify(notification);
    }
}

#[cfg(test)]
#[path = "tests/edit_session_tests.rs"]
mod tests;
