//! Example: Upload files concurrently
//!
//! Usage:
//!   cargo run --example upload -- --url http://192.168.4.1 <REMOTE_DIR> <LOCAL_FILE>...

mod cli;

use std::io::Write;
use std::process;

use cli::{init_tracing, parse_server, usage_and_exit};
use davlib::{LocalFile, ProgressIndicator, UploadEvent, UploadPipeline};

const USAGE: &str =
    "Usage: cargo run --example upload -- (--url URL | --config FILE) [--proxy PROXY] <REMOTE_DIR> <LOCAL_FILE>...";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let server = parse_server(USAGE);
    if server.positionals.len() < 2 {
        usage_and_exit(USAGE);
    }
    let remote_dir = &server.positionals[0];

    let mut files = Vec::new();
    for local in &server.positionals[1..] {
        files.push(LocalFile::from_path(local).await?);
    }

    let view = server.view(remote_dir)?;
    let mut batch = UploadPipeline::new(view).submit(files).await;
    println!("Uploading {} file(s) to {}...", batch.tasks().len(), remote_dir);

    let mut indicator = ProgressIndicator::new();
    while let Some(event) = batch.next_event().await {
        match event {
            UploadEvent::Started { progress, .. } => {
                indicator.start(&progress.filename, progress.total)
            }
            UploadEvent::Progress { progress, .. } => indicator.update(progress),
            UploadEvent::Completed { name, .. } => println!("\n{} uploaded", name),
            UploadEvent::Failed { name, error, .. } => eprintln!("\n{} failed: {}", name, error),
        }
        if let Some(bar) = indicator.render(30) {
            print!("\r{}", bar);
            std::io::stdout().flush()?;
        }
    }
    println!();

    let reports = batch.wait().await?;
    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        eprintln!("{} of {} uploads failed", failed, reports.len());
        process::exit(1);
    }
    println!("Upload complete!");

    Ok(())
}
