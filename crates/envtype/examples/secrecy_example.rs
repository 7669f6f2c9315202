//! Example demonstrating secrecy integration with envtype.
//!
//! Run with:
//! ```sh
//! API_KEY="super-secret-key" \
//! SIGNING_TTL="not-a-duration" \
//! cargo run --example secrecy_example --features secrecy
//! ```

use envtype::{ExposeSecret, declare};

fn main() -> envtype::Result<()> {
    let api_key = declare("API_KEY").as_secret_string().required().resolve()?;
    println!("API_KEY (debug): {api_key:?}");
    println!("API_KEY length: {}", api_key.expose_secret().len());

    // `secret()` keeps the raw value out of the error message
    match declare("SIGNING_TTL").as_duration().secret().optional().resolve() {
        Ok(ttl) => println!("SIGNING_TTL: {ttl:?}"),
        Err(e) => eprintln!("{e}"),
    }

    Ok(())
}
