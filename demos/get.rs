//! Example: Download a file
//!
//! Usage:
//!   cargo run --example get -- --url http://192.168.4.1 <REMOTE_PATH> [LOCAL_FILE]

mod cli;

use cli::{init_tracing, parse_server, usage_and_exit};

const USAGE: &str =
    "Usage: cargo run --example get -- (--url URL | --config FILE) [--proxy PROXY] <REMOTE_PATH> [LOCAL_FILE]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    let (remote, local) = match server.positionals.as_slice() {
        [remote] => {
            let name = remote.rsplit('/').next().unwrap_or(remote.as_str()).to_string();
            (remote.clone(), name)
        }
        [remote, local] => (remote.clone(), local.clone()),
        _ => usage_and_exit(USAGE),
    };
    if local.is_empty() {
        usage_and_exit(USAGE);
    }

    let client = server.connect()?;
    println!("Downloading {} to {}...", remote, local);
    let bytes = client.download_to(&remote, &local).await?;
    println!("Download complete! ({} bytes)", bytes);

    Ok(())
}
