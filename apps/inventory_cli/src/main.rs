mod config;
mod shell;
mod terminal;

use std::{io, path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{EditSession, FormFields, HttpProductStore, Outcome, RenderSurface};
use shared::domain::ProductId;
use tracing_subscriber::EnvFilter;

use crate::terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Manage the product inventory from a terminal")]
struct Cli {
    /// Products collection URL, e.g. http://localhost:4000/productos
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file (defaults to ./inventory.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the product table and inventory totals
    List,
    /// Create a product
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        stock: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change fields of an existing product
    Edit {
        id: i64,
        #[command(flatten)]
        fields: EditFields,
    },
    /// Delete a product
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Interactive session (default)
    Shell,
}

#[derive(Args, Debug, Default)]
struct EditFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

impl EditFields {
    fn apply(self, form: &mut FormFields) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(stock) = self.stock {
            form.stock = stock;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Cancelled) => ExitCode::from(2),
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("inventory: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Outcome> {
    let settings = config::load_settings(cli.config.as_deref(), cli.api_url.as_deref())?;
    tracing::info!(api_url = %settings.api_url, "using product store");

    let command = cli.command.unwrap_or(Command::Shell);
    let one_shot = !matches!(command, Command::Shell);
    let assume_yes = matches!(command, Command::Delete { yes: true, .. });

    let stdin = io::stdin();
    let surface = TerminalSurface::new(io::stdout(), stdin.lock())
        .quiet_form(one_shot)
        .assume_yes(assume_yes);
    let store = Arc::new(HttpProductStore::new(&settings.api_url));
    let mut session =
        EditSession::new(store, surface).with_notification_ttl(settings.notification_ttl);

    let outcome = match command {
        Command::List => session.load().await,
        Command::Add {
            name,
            price,
            stock,
            description,
        } => {
            session.surface_mut().fill_form(FormFields {
                product_id: None,
                name,
                price,
                stock,
                description,
            });
            session.submit_current_form().await
        }
        Command::Edit { id, fields } => {
            let outcome = session.begin_edit(ProductId(id)).await;
            if !outcome.is_done() {
                return Ok(outcome);
            }
            fields.apply(session.surface_mut().form_mut());
            session.submit_current_form().await
        }
        Command::Delete { id, .. } => {
            let id = ProductId(id);
            session.load().await;
            let name = session
                .products()
                .iter()
                .find(|product| product.id == id)
                .map(|product| product.name.clone())
                .unwrap_or_else(|| format!("product #{id}"));
            session.delete(id, &name).await
        }
        Command::Shell => {
            shell::run(&mut session).await?;
            Outcome::Done
        }
    };
    Ok(outcome)
}
