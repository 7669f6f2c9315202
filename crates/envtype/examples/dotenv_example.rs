//! Example: loading a `.env` file before reading typed values.
//!
//! Run with:
//! ```sh
//! # Create a .env file first
//! echo 'DATABASE_URL=postgres://localhost/mydb' > .env
//! echo 'APP_PORT=3000' >> .env
//! echo 'not a valid line' >> .env
//!
//! cargo run --example dotenv_example
//! ```

use envtype::{Source, declare};

fn main() -> envtype::Result<()> {
    // Malformed lines and a missing file are logged, never fatal
    let summary = envtype::load_default();
    println!(
        "=== .env: {} applied, {} malformed ===\n",
        summary.applied, summary.malformed
    );

    let db_url = declare("DATABASE_URL").as_string().required().resolve()?;
    let (port, source) = declare("APP_PORT")
        .as_int()
        .with_default(8080)
        .resolve_with_source()?;

    println!("Database URL: {db_url}");
    println!("Port: {port}");
    if source == Source::Default {
        println!("  (APP_PORT not set, using default)");
    }

    Ok(())
}
