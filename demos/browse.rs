//! Example: Interactive file manager shell
//!
//! Usage:
//!   cargo run --example browse -- --url http://192.168.4.1 ["fileman.html?dir=/docs"]
//!
//! Commands: ls, cd <DIR>, up, open|get|rm|rename|mv|edit <NAME>, mkdir, put <LOCAL_FILE>..., quit

mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use cli::{init_tracing, parse_server, usage_and_exit};
use davlib::{
    ActionKind, ActionOutcome, DirectoryView, LocalFile, ProgressIndicator, Prompter,
    RefreshOutcome, UploadPipeline,
};

const USAGE: &str =
    "Usage: cargo run --example browse -- (--url URL | --config FILE) [--proxy PROXY] [LAUNCH_URL]";

struct Terminal;

impl Terminal {
    fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for Terminal {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        let _ = io::stdout().flush();
        self.read_line()
            .is_some_and(|answer| answer.eq_ignore_ascii_case("y"))
    }

    fn prompt(&self, message: &str, default: Option<&str>) -> Option<String> {
        match default {
            Some(default) => print!("{} [{}] ", message, default),
            None => print!("{} ", message),
        }
        let _ = io::stdout().flush();
        let answer = self.read_line()?;
        if answer.is_empty() {
            default.map(str::to_string)
        } else {
            Some(answer)
        }
    }
}

fn show(outcome: &RefreshOutcome) {
    if let Some(listing) = outcome.listing() {
        print!("{}", listing);
    }
}

async fn upload(view: &Arc<DirectoryView>, paths: &[&str]) -> davlib::Result<()> {
    let mut files = Vec::new();
    for path in paths {
        files.push(LocalFile::from_path(path).await?);
    }
    let mut indicator = ProgressIndicator::new();
    let reports = UploadPipeline::new(view.clone())
        .submit(files)
        .await
        .drive(&mut indicator)
        .await?;
    for report in reports {
        match report.error {
            Some(e) => eprintln!("{}: {}", report.task.name, e),
            None => println!("{} uploaded ({} bytes)", report.task.name, report.task.bytes_total),
        }
    }
    if let Some(listing) = view.listing().await {
        print!("{}", listing);
    }
    Ok(())
}

async fn run(view: &Arc<DirectoryView>, terminal: &Terminal, line: &str) -> davlib::Result<bool> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = words.collect();
    let argument = rest.join(" ");

    let action = match command {
        "quit" | "exit" => return Ok(false),
        "ls" => {
            show(&view.refresh().await?);
            return Ok(true);
        }
        "cd" => {
            let target = if argument.starts_with('/') {
                argument
            } else {
                format!("{}{}", view.current_directory().await, argument)
            };
            show(&view.navigate(&target).await?);
            return Ok(true);
        }
        "up" => {
            let parent = view
                .listing()
                .await
                .and_then(|l| {
                    let n = l.breadcrumbs.len();
                    n.checked_sub(2).map(|i| l.breadcrumbs[i].path.clone())
                })
                .unwrap_or_else(|| "/".to_string());
            show(&view.navigate(&parent).await?);
            return Ok(true);
        }
        "mkdir" => {
            if let ActionOutcome::Refreshed(outcome) = view.new_folder(terminal).await? {
                show(&outcome);
            }
            return Ok(true);
        }
        "put" => {
            upload(view, &rest).await?;
            return Ok(true);
        }
        "open" => ActionKind::Open,
        "get" => ActionKind::Download,
        "rm" => ActionKind::Delete,
        "rename" => ActionKind::Rename,
        "mv" => ActionKind::Move,
        "edit" => ActionKind::Edit,
        other => {
            eprintln!("Unknown command: {}", other);
            return Ok(true);
        }
    };

    match view.dispatch(&argument, action, terminal).await? {
        ActionOutcome::Refreshed(outcome) => show(&outcome),
        ActionOutcome::Downloaded { name, data } => {
            tokio::fs::write(&name, &data).await?;
            println!("Saved {} ({} bytes)", name, data.len());
        }
        ActionOutcome::OpenEditor(url) => {
            println!("Open in editor: {}", view.client().config().absolute_url(&url))
        }
        ActionOutcome::Cancelled => println!("Cancelled."),
    }
    Ok(true)
}

#[tokio::main]
async fn main() {
    init_tracing();
    let server = parse_server(USAGE);
    let launch = match server.positionals.as_slice() {
        [] => String::new(),
        [launch] => launch.clone(),
        _ => usage_and_exit(USAGE),
    };

    let client = match server.connect() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            std::process::exit(1);
        }
    };
    let view = Arc::new(DirectoryView::from_launch_url(client, &launch));
    let terminal = Terminal;

    match view.refresh().await {
        Ok(outcome) => show(&outcome),
        Err(e) => eprintln!("Error: {}", e),
    }

    loop {
        let directory = view.current_directory().await;
        print!("{}> ", directory);
        let _ = io::stdout().flush();
        let Some(line) = terminal.read_line() else {
            break;
        };
        match run(&view, &terminal, &line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}
