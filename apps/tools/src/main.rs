use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::ProductDraft;
use storage::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/productos.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Insert a small demo catalogue
    Seed {
        /// Seed even when products already exist
        #[arg(long)]
        force: bool,
    },
    AddProduct {
        name: String,
        price: f64,
        stock: i64,
        #[arg(long, default_value = "")]
        description: String,
    },
    List,
}

fn demo_catalogue() -> Vec<ProductDraft> {
    [
        ("Laptop", 899.0, "14 inch, 16 GB RAM", 8),
        ("Wireless mouse", 24.5, "", 42),
        ("Mechanical keyboard", 79.9, "Brown switches", 15),
        ("USB-C hub", 39.0, "7 ports", 27),
        ("Monitor 27\"", 249.99, "1440p IPS", 5),
    ]
    .into_iter()
    .map(|(name, price, description, stock)| ProductDraft {
        name: name.into(),
        price,
        description: description.into(),
        stock,
    })
    .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::Seed { force } => {
            let existing = storage.list_products().await?.len();
            if existing > 0 && !force {
                bail!("database already holds {existing} products; pass --force to seed anyway");
            }
            for draft in demo_catalogue() {
                let product = storage.create_product(&draft).await?;
                tracing::info!(product_id = product.id.0, name = %product.name, "seeded product");
            }
            println!("seeded {} products", demo_catalogue().len());
        }
        Command::AddProduct {
            name,
            price,
            stock,
            description,
        } => {
            let draft = ProductDraft {
                name,
                price,
                description,
                stock,
            }
            .validated()
            .map_err(|err| anyhow!(err.message))?;
            let product = storage.create_product(&draft).await?;
            println!("created product_id={}", product.id.0);
        }
        Command::List => {
            for product in storage.list_products().await? {
                println!(
                    "{:>5}  {:<24} {:>10.2} {:>6}  {}",
                    product.id.0,
                    product.name,
                    product.price,
                    product.stock,
                    product.description().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}
