//! Example: Delete a file or directory
//!
//! Usage:
//!   cargo run --example rm -- --url http://192.168.4.1 <PATH>

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example rm -- (--url URL | --config FILE) [--proxy PROXY] <PATH>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    if server.positionals.len() != 1 {
        usage_and_exit(USAGE);
    }
    let path = &server.positionals[0];

    let client = server.connect()?;
    println!("Deleting {}...", path);
    client.remove(path).await?;
    println!("Deleted.");

    Ok(())
}
