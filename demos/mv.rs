//! Example: Move a file into another directory
//!
//! Usage:
//!   cargo run --example mv -- --url http://192.168.4.1 <DIRECTORY> <FILE_NAME> <DEST_DIR>

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};
use davlib::Entry;

const USAGE: &str =
    "Usage: cargo run --example mv -- (--url URL | --config FILE) [--proxy PROXY] <DIRECTORY> <FILE_NAME> <DEST_DIR>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    let [directory, name, dest] = server.positionals.as_slice() else {
        usage_and_exit(USAGE);
    };

    let view = server.view(directory)?;
    println!("Moving {} to {}...", name, dest);
    view.move_entry(&Entry::file(name.as_str()), dest).await?;
    println!("Move complete!");

    Ok(())
}
