//! Example: List a directory
//!
//! Usage:
//!   cargo run --example ls -- --url http://192.168.4.1 [--mount /dav] [PATH]

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};
use davlib::RefreshOutcome;

const USAGE: &str =
    "Usage: cargo run --example ls -- (--url URL | --config FILE) [--mount MOUNT] [--proxy PROXY] [PATH]";

#[tokio::main]
async fn main() {
    init_tracing();
    let server = parse_server(USAGE);
    if server.positionals.len() > 1 {
        usage_and_exit(USAGE);
    }
    let path = server.positionals.first().map(String::as_str).unwrap_or("/");

    let view = match server.view(path) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };

    match view.refresh().await {
        Ok(RefreshOutcome::Current(listing)) => print!("{}", listing),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Failed to list: {}", e);
            std::process::exit(1);
        }
    }
}
