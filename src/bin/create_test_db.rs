use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use product_dashboard::{
    count_product_transactions, initialize_db, parse_seed_data, replace_product_transactions,
};

/// A utility for creating a test database for the product dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// File path to a JSON file in the same format as the seed feed.
    #[arg(long, short)]
    seed_file: String,
}

/// Create a database and fill it from a local copy of the seed feed.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path needs a file extension, e.g. 'products.db'.");
        exit(1);
    }

    if output_path.exists() {
        eprintln!("Refusing to overwrite existing file {output_path:#?}.");
        exit(1);
    }

    println!("Reading seed data from {:#?}", args.seed_file);
    let seed_text = fs::read_to_string(&args.seed_file)?;
    let new_transactions = parse_seed_data(&seed_text)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    replace_product_transactions(&new_transactions, &conn)?;

    let stored = count_product_transactions(&conn)?;
    println!("Database now holds {stored} product transactions.");

    Ok(())
}
