mod args;
mod logging;
mod print;
mod shell;

use args::Cli;
use clap::Parser;
use pocketbook::api::AssistantApi;
use pocketbook::config::{self, AppConfig};
use pocketbook::error::Result;
use shell::Shell;
use std::io;
use std::path::Path;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let data_dir = config::resolve_data_dir(cli.data_dir.clone())?;
    let config = load_config(&data_dir);

    let mut api = AssistantApi::open(&data_dir, config);
    if let Some(language) = cli.lang {
        api.use_language(language);
    }

    let stdin = io::stdin();
    let mut shell = Shell::new(api, stdin.lock());
    match cli.command_line() {
        Some(line) => {
            shell.execute(&line);
            Ok(())
        }
        None => shell.run(),
    }
}

/// A broken config file falls back to defaults rather than blocking startup.
fn load_config(data_dir: &Path) -> AppConfig {
    AppConfig::load(data_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring unreadable config.json");
        AppConfig::default()
    })
}
