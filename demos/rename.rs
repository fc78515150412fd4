//! Example: Rename a file
//!
//! Usage:
//!   cargo run --example rename -- --url http://192.168.4.1 <DIRECTORY> <NAME> <NEW_NAME>

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};
use davlib::RefreshOutcome;

const USAGE: &str =
    "Usage: cargo run --example rename -- (--url URL | --config FILE) [--proxy PROXY] <DIRECTORY> <NAME> <NEW_NAME>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    let [directory, name, new_name] = server.positionals.as_slice() else {
        usage_and_exit(USAGE);
    };

    let view = server.view(directory)?;
    println!("Renaming {} to {}...", name, new_name);
    match view.rename(name, new_name).await? {
        RefreshOutcome::Skipped => println!("Nothing to do."),
        _ => println!("Rename complete!"),
    }

    Ok(())
}
