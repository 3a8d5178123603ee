//! The display side of an edit session.
//!
//! [`RenderSurface`] enumerates every region the controller writes into. A
//! terminal front-end prints them; tests record them.

use std::time::Duration;

use shared::domain::{Product, ProductDraft, ProductId};

use crate::{
    error::FormError,
    inventory::{InventoryStats, ProductRow},
};

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Reachability of the product store as last probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Connected,
    Error,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A transient message. The surface hides it after `display_for`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub display_for: Duration,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>, display_for: Duration) -> Self {
        Self {
            message: message.into(),
            severity,
            display_for,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Editing(ProductId),
}

impl FormMode {
    pub fn title(self) -> &'static str {
        match self {
            Self::Create => "Create New Product",
            Self::Editing(_) => "Edit Product",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Create => "Create Product",
            Self::Editing(_) => "Update Product",
        }
    }

    pub fn shows_cancel(self) -> bool {
        matches!(self, Self::Editing(_))
    }
}

/// Raw text of the product form, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: String,
    pub stock: String,
    pub description: String,
}

impl FormFields {
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: Some(product.id),
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            description: product.description.clone().unwrap_or_default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Parses the typed values. Range checks are left to the store.
    pub fn to_draft(&self) -> Result<ProductDraft, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
            .ok_or_else(|| FormError::InvalidPrice(self.price.clone()))?;
        let stock = self
            .stock
            .trim()
            .parse::<i64>()
            .map_err(|_| FormError::InvalidStock(self.stock.clone()))?;

        Ok(ProductDraft {
            name: self.name.clone(),
            price,
            description: self.description.clone(),
            stock,
        })
    }
}

pub trait RenderSurface {
    fn set_connectivity(&mut self, status: Connectivity);
    fn set_loading(&mut self, loading: bool);
    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);
    /// Marks the rendered rows as out of date after a failed reload.
    fn set_stale(&mut self, stale: bool);
    fn show_empty(&mut self);
    fn render_rows(&mut self, rows: &[ProductRow]);
    fn render_stats(&mut self, stats: &InventoryStats);

    fn form_fields(&self) -> FormFields;
    fn fill_form(&mut self, fields: FormFields);
    fn clear_form(&mut self);
    fn set_form_mode(&mut self, mode: FormMode);
    /// `Some(label)` disables the submit control and shows `label`; `None`
    /// re-enables it with the label of the current form mode.
    fn set_submit_busy(&mut self, busy_label: Option<&str>);
    fn scroll_to_form(&mut self);

    fn notify(&mut self, notification: Notification);
    fn confirm(&mut self, prompt: &str) -> bool;
}
