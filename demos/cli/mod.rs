use std::env;
use std::process;
use std::sync::Arc;

use davlib::{DavClient, DavConfig, DirectoryView};
use tracing_subscriber::{fmt, EnvFilter};

pub fn usage_and_exit(usage: &str) -> ! {
    eprintln!("{usage}");
    process::exit(1);
}

pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("davlib=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

pub struct ArgParser {
    args: Vec<String>,
    usage: &'static str,
}

impl ArgParser {
    pub fn new(usage: &'static str) -> Self {
        let args: Vec<String> = env::args().skip(1).collect();

        if args.iter().any(|a| a == "--help" || a == "-h") {
            println!("{usage}");
            process::exit(0);
        }

        Self { args, usage }
    }

    pub fn take_value(&mut self, names: &[&str]) -> Option<String> {
        let mut i = 0;
        while i < self.args.len() {
            if names.contains(&self.args[i].as_str()) {
                let value = self.args.get(i + 1).cloned();
                if value.is_none() {
                    usage_and_exit(self.usage);
                }
                self.args.drain(i..=i + 1);
                return value;
            }
            i += 1;
        }
        None
    }

    pub fn remaining(self) -> Vec<String> {
        self.args
    }
}

/// Server settings shared by every demo.
pub struct Server {
    pub config: DavConfig,
    pub positionals: Vec<String>,
}

/// Parse `--config FILE`, `--url URL`, `--mount PATH` and `--proxy PROXY`.
///
/// Flags override values loaded from the config file.
pub fn parse_server(usage: &'static str) -> Server {
    let mut parser = ArgParser::new(usage);
    let config_file = parser.take_value(&["--config", "-c"]);
    let url = parser.take_value(&["--url", "-u"]);
    let mount = parser.take_value(&["--mount"]);
    let proxy = parser.take_value(&["--proxy"]);

    let mut config = match config_file {
        Some(file) => match DavConfig::load(&file) {
            Ok(Some(config)) => config,
            Ok(None) => {
                eprintln!("Config file not found: {}", file);
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}", file, e);
                process::exit(1);
            }
        },
        None if url.is_none() => usage_and_exit(usage),
        None => DavConfig::default(),
    };
    if let Some(url) = url {
        config.base_url = url;
    }
    if let Some(mount) = mount {
        config.mount = mount;
    }
    if proxy.is_some() {
        config.proxy = proxy;
    }

    Server {
        config,
        positionals: parser.remaining(),
    }
}

impl Server {
    pub fn connect(&self) -> davlib::Result<DavClient> {
        DavClient::connect(self.config.clone())
    }

    #[allow(dead_code)] // Only the view-based demos need this.
    pub fn view(&self, initial_directory: &str) -> davlib::Result<Arc<DirectoryView>> {
        Ok(Arc::new(DirectoryView::new(
            self.connect()?,
            initial_directory,
        )))
    }
}
