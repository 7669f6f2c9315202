//! Example: typed environment variables with defaults
//!
//! Run with missing vars to see the diagnostic:
//!   cargo run --package envtype --example basic
//!
//! Run with required vars set:
//!   `DATABASE_URL=postgres://localhost TIMEOUT=1m30s cargo run --package envtype --example basic`

use std::time::Duration;

use envtype::declare;

fn main() -> envtype::Result<()> {
    let db_url = declare("DATABASE_URL").as_string().required().resolve()?;
    let port = declare("PORT").as_int().with_default(8080).resolve()?;
    let debug = declare("DEBUG").as_bool().with_default(false).resolve()?;
    let ratio = declare("SAMPLE_RATIO").as_float().with_default(0.1).resolve()?;
    let timeout = declare("TIMEOUT")
        .as_duration()
        .with_default(Duration::from_secs(30))
        .resolve()?;
    let api_key = declare("API_KEY").as_string().optional().resolve()?;

    println!("Successfully loaded config!");
    println!("  DATABASE_URL = {db_url}");
    println!("  PORT         = {port} (default: 8080)");
    println!("  DEBUG        = {debug} (default: false)");
    println!("  SAMPLE_RATIO = {ratio} (default: 0.1)");
    println!("  TIMEOUT      = {timeout:?} (default: 30s)");
    println!("  API_KEY      = {api_key:?} (optional)");

    Ok(())
}
