//! Example: Create a directory
//!
//! Usage:
//!   cargo run --example mkdir -- --url http://192.168.4.1 <PARENT_DIR> <NAME>

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example mkdir -- (--url URL | --config FILE) [--proxy PROXY] <PARENT_DIR> <NAME>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    let [parent, name] = server.positionals.as_slice() else {
        usage_and_exit(USAGE);
    };

    let view = server.view(parent)?;
    println!("Creating {} in {}...", name, parent);
    if let Some(listing) = view.create_directory(name).await?.listing() {
        print!("{}", listing);
    }

    Ok(())
}
