//! # Seed Data Generator
//!
//! Populates an empty database with demo data for development.
//!
//! ## Usage
//! ```bash
//! # Use BALCAO_DB_PATH (default ./balcao.db)
//! cargo run -p balcao-db --bin seed
//!
//! # Specify database path
//! cargo run -p balcao-db --bin seed -- --db ./data/balcao.db
//! ```
//!
//! ## Generated Data
//! - One store
//! - One note
//! - One open sale with a unit-priced line and a weighed (kg) line
//!
//! Nothing is written when the database already has a store.

use std::env;

use balcao_core::{NewSale, NewSaleItem, Note, QuantityKind, Store};
use balcao_db::{Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut config = DbConfig::from_env()?;

    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Balcao Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $BALCAO_DB_PATH or ./balcao.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Balcao Seed Data Generator");
    println!("=============================");
    println!("Database: {}", config.database_path.display());
    println!("Sale timezone: {}", config.sale_timezone);
    println!();

    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.stores().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} stores", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        db.close().await;
        return Ok(());
    }

    let store = Store::new(
        "Mercadinho Bom Preço",
        "Rua Augusta, 1500 - São Paulo, SP",
        "(11) 3255-0199",
    )?;
    db.stores().insert(&store).await?;
    println!("✓ Store: {}", store.name);

    let note = db
        .notes()
        .insert(Note::new(
            "Abertura do caixa",
            "Conferir o troco inicial e a balança antes de abrir.",
        )?)
        .await?;
    println!("✓ Note: {}", note.title);

    let sales = db.sales();
    let sale = sales.create(NewSale::default()).await?;
    sales
        .add_item(
            &sale.id,
            NewSaleItem::new("Pão de forma", 2.0, QuantityKind::Unit, 8.49),
        )
        .await?;
    let sale = sales
        .add_item(
            &sale.id,
            NewSaleItem::new("Queijo minas", 0.45, QuantityKind::Kg, 39.9),
        )
        .await?;

    info!(
        id = %sale.id,
        items = sale.items.len(),
        total = sale.total,
        "Seeded open sale"
    );
    println!(
        "✓ Open sale with {} items, total {:.2}",
        sale.items.len(),
        sale.total
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Structured logging; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,balcao=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
