//! Bulk-load catalogue data from CSV files.
//!
//! ```bash
//! load-catalog --database-url postgres://localhost/foodgram ingredients data/ingredients.csv
//! load-catalog --database-url postgres://localhost/foodgram tags --has-headers data/tags.csv
//! ```
//!
//! Re-running with the same file inserts nothing.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use foodgram_core::tracing::init_tracing;

mod load;
mod parse;

#[derive(Parser)]
#[command(about = "Load the ingredient and tag catalogues from CSV files")]
struct Cli {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// `name,measurement_unit` rows
    Ingredients(CsvFile),
    /// `name,slug,color` rows; colours are `#RRGGBB`
    Tags(CsvFile),
}

#[derive(Args)]
struct CsvFile {
    /// Skip the first row of the file
    #[arg(long)]
    has_headers: bool,

    file: PathBuf,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("open {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .context("--database-url or DATABASE_URL is required")?;

    match cli.command {
        Command::Ingredients(csv) => {
            let rows = parse::read_ingredient_rows(open(&csv.file)?, csv.has_headers)?;
            info!(rows = rows.len(), file = %csv.file.display(), "parsed ingredient rows");

            let db = Database::connect(&database_url)
                .await
                .context("connect to database")?;
            let report = load::load_ingredients(&db, &rows).await?;
            info!(
                units = report.units,
                ingredients = report.ingredients,
                ingredient_units = report.ingredient_units,
                "ingredients loaded"
            );
            println!("{} new ingredient-units", report.ingredient_units);
        }
        Command::Tags(csv) => {
            let rows = parse::read_tag_rows(open(&csv.file)?, csv.has_headers)?;
            info!(rows = rows.len(), file = %csv.file.display(), "parsed tag rows");

            let db = Database::connect(&database_url)
                .await
                .context("connect to database")?;
            let inserted = load::load_tags(&db, &rows).await?;
            info!(inserted, "tags loaded");
            println!("{inserted} new tags");
        }
    }
    Ok(())
}
