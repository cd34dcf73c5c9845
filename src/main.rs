mod app;
mod clock;
mod config;
mod constants;
mod input;
mod mail;
mod score;
mod tasks;
#[cfg(test)]
mod testing;
mod triage;
mod ui;

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::Config;
use crate::mail::local::LocalMailbox;
use crate::mail::types::Scope;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,triage=debug"));

    // Log into the config directory; the terminal belongs to the UI
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("triage.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"triage - Rank unread mail and clear it fast

Usage: triage [command | scope]

Commands:
    (none)      Start the dashboard
    <scope>     Start on a scope: today, yesterday, 7d, 30d, 60d or 90d
    setup       Write a default config and a sample mailbox
    help        Show this help message

Configuration file: ~/.config/triage/config.toml
"#
    );
}

fn run_setup() -> Result<()> {
    use std::io::{self, Write};

    println!("Triage Setup");
    println!("============\n");

    let config_path = Config::config_path()?;
    if config_path.exists() {
        print!("Configuration already exists. Overwrite? [y/N]: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    let config = Config::default();
    config.ensure_dirs()?;
    config.save()?;
    println!("Configuration saved to {}", config_path.display());

    let mailbox_path = config.mailbox_path()?;
    if mailbox_path.exists() {
        println!("Keeping existing mailbox at {}", mailbox_path.display());
    } else {
        LocalMailbox::write_sample(&mailbox_path)?;
        println!("Sample mailbox written to {}", mailbox_path.display());
    }

    println!("\nSetup complete! Run 'triage' to start.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some(arg) if Scope::parse(arg).is_none() => {
            eprintln!("Unknown command: {}", arg);
            print_usage();
            std::process::exit(1);
        }
        scope => {
            setup_logging();

            let mut config = Config::load()?;
            config.ensure_dirs()?;
            if let Some(scope) = scope.and_then(Scope::parse) {
                config.triage.default_scope = scope;
            }

            if !config.mailbox_path()?.exists() {
                eprintln!("No mailbox found. Run 'triage setup' first.");
                std::process::exit(1);
            }

            let mut app = App::new(config)?;
            app.run().await
        }
    }
}
