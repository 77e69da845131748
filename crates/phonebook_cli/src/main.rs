//! Phonebook CLI entry point.
//!
//! # Responsibility
//! - Resolve configuration from arguments and environment.
//! - Start logging, load the directory and run the interactive menu.
//!
//! # Invariants
//! - A corrupt store aborts startup; existing data is never overwritten.

mod menu;
mod render;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::error;
use phonebook_core::{
    core_version, default_log_level, init_logging, ContactService, JsonFileStore,
    PhonebookConfig, DEFAULT_STORE_FILE,
};
use std::io;
use std::path::PathBuf;

use crate::menu::Menu;

/// Interactive contact directory backed by a JSON file
#[derive(Debug, Parser)]
#[command(name = "phonebook")]
#[command(version)]
struct Cli {
    /// JSON file holding the directory
    #[arg(long, env = "PHONEBOOK_FILE", default_value = DEFAULT_STORE_FILE)]
    file: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, env = "PHONEBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rolling log files
    #[arg(long, env = "PHONEBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<PhonebookConfig> {
        let defaults = PhonebookConfig::default();
        let log_dir = match self.log_dir {
            Some(dir) if dir.is_relative() => std::env::current_dir()
                .context("failed to resolve current directory")?
                .join(dir),
            Some(dir) => dir,
            None => defaults.log_dir,
        };

        let mut config = PhonebookConfig {
            store_path: self.file,
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        };
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let store = JsonFileStore::new(&config.store_path);
    let mut service = match ContactService::open(store) {
        Ok(service) => service,
        Err(err) => {
            error!("event=startup module=cli status=error error_code=store_open_failed");
            return Err(err).with_context(|| {
                format!(
                    "cannot load `{}`; fix or move the file and restart",
                    config.store_path.display()
                )
            });
        }
    };

    println!("phonebook {}", core_version());
    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&mut service, stdin.lock(), stdout.lock(), today).run()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
