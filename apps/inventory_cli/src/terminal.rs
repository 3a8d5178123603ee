//! Line-oriented rendering surface for terminals.

use std::{
    fmt,
    io::{self, BufRead, Write},
};

use client_core::{
    Connectivity, FormFields, FormMode, InventoryStats, Notification, ProductRow, RenderSurface,
    Severity, StockTier,
};
use shared::domain::Product;
use tracing::debug;

/// All surface output goes through here. Rendering has no error channel, so
/// the first failed write is logged, the surface is marked broken, and later
/// output is dropped.
macro_rules! out_line {
    ($surface:ident, $($arg:tt)*) => {
        emit_line(
            &mut $surface.out,
            &mut $surface.output_broken,
            format_args!($($arg)*),
        )
    };
}

fn emit_line<W: Write>(out: &mut W, broken: &mut bool, line: fmt::Arguments<'_>) {
    if *broken {
        return;
    }
    if let Err(err) = writeln!(out, "{line}") {
        debug!(error = %err, "terminal output failed; dropping further output");
        *broken = true;
    }
}

pub struct TerminalSurface<W: Write, I: BufRead> {
    out: W,
    input: I,
    form: FormFields,
    mode: FormMode,
    assume_yes: bool,
    quiet_form: bool,
    output_broken: bool,
}

impl<W: Write, I: BufRead> TerminalSurface<W, I> {
    pub fn new(out: W, input: I) -> Self {
        Self {
            out,
            input,
            form: FormFields::default(),
            mode: FormMode::Create,
            assume_yes: false,
            quiet_form: false,
            output_broken: false,
        }
    }

    /// Answers every confirmation with yes without reading input.
    pub fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    /// Suppresses form chrome output for one-shot commands.
    pub fn quiet_form(mut self, quiet: bool) -> Self {
        self.quiet_form = quiet;
        self
    }

    pub fn form_mut(&mut self) -> &mut FormFields {
        &mut self.form
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// True once a write to the output has failed.
    pub fn output_broken(&self) -> bool {
        self.output_broken
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Prompts and reads one trimmed line. `None` at end of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn print(&mut self, text: &str) {
        out_line!(self, "{text}");
    }

    pub fn show_form(&mut self) {
        let form = self.form.clone();
        let id = form
            .product_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        out_line!(self, "== {} ==", self.mode.title());
        out_line!(self, "  id:          {id}");
        out_line!(self, "  name:        {}", form.name);
        out_line!(self, "  price:       {}", form.price);
        out_line!(self, "  stock:       {}", form.stock);
        out_line!(self, "  description: {}", form.description);
        let cancel = if self.mode.shows_cancel() {
            "  [cancel]"
        } else {
            ""
        };
        out_line!(self, "  [{}]{cancel}", self.mode.submit_label());
    }
}

pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

pub fn format_created_at(product: &Product) -> String {
    product
        .created_at_parsed()
        .map(|created| created.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn tier_marker(tier: StockTier) -> &'static str {
    match tier {
        StockTier::Low => "!",
        StockTier::Medium => "~",
        StockTier::High => " ",
    }
}

fn connectivity_label(status: Connectivity) -> &'static str {
    match status {
        Connectivity::Connected => "connected",
        Connectivity::Error => "error",
        Connectivity::Disconnected => "disconnected",
    }
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
    }
}

impl<W: Write, I: BufRead> RenderSurface for TerminalSurface<W, I> {
    fn set_connectivity(&mut self, status: Connectivity) {
        out_line!(self, "store: {}", connectivity_label(status));
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            out_line!(self, "loading products...");
        }
    }

    fn show_error(&mut self, message: &str) {
        out_line!(self, "{message}");
    }

    fn clear_error(&mut self) {}

    fn set_stale(&mut self, stale: bool) {
        if stale {
            out_line!(
                self,
                "(showing the last loaded list; it may be out of date)"
            );
        }
    }

    fn show_empty(&mut self) {
        out_line!(self, "No products yet. Add the first one.");
    }

    fn render_rows(&mut self, rows: &[ProductRow]) {
        out_line!(
            self,
            "{:>5}  {:<24} {:>10} {:>7}  {:<28} {}",
            "ID", "NAME", "PRICE", "STOCK", "DESCRIPTION", "CREATED"
        );
        for row in rows {
            let product = &row.product;
            out_line!(
                self,
                "{:>5}  {:<24} {:>10} {:>6}{}  {:<28} {}",
                product.id.0,
                product.name,
                format_price(product.price),
                product.stock,
                tier_marker(row.tier),
                product.description().unwrap_or("(no description)"),
                format_created_at(product),
            );
        }
        if rows.iter().any(|row| row.tier != StockTier::High) {
            out_line!(
                self,
                "(! {} stock, ~ {} stock)",
                StockTier::Low.label(),
                StockTier::Medium.label()
            );
        }
    }

    fn render_stats(&mut self, stats: &InventoryStats) {
        out_line!(
            self,
            "products: {} | inventory value: {} | units in stock: {}",
            stats.product_count,
            format_price(stats.total_value),
            stats.total_stock
        );
    }

    fn form_fields(&self) -> FormFields {
        self.form.clone()
    }

    fn fill_form(&mut self, fields: FormFields) {
        self.form = fields;
    }

    fn clear_form(&mut self) {
        self.form = FormFields::default();
    }

    fn set_form_mode(&mut self, mode: FormMode) {
        self.mode = mode;
        if !self.quiet_form {
            out_line!(self, "-- {} --", mode.title());
        }
    }

    fn set_submit_busy(&mut self, busy_label: Option<&str>) {
        if let Some(label) = busy_label {
            out_line!(self, "{label}");
        }
    }

    fn scroll_to_form(&mut self) {
        if !self.quiet_form {
            self.show_form();
        }
    }

    fn notify(&mut self, notification: Notification) {
        out_line!(
            self,
            "[{}] {}",
            severity_tag(notification.severity),
            notification.message
        );
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match self.read_line(&format!("{prompt} [y/N] ")) {
            Ok(Some(answer)) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
