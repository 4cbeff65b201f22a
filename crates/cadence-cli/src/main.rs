use cadence_core::error::CoreError;
use cadence_core::messages::message;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod parser;
mod timezone;
mod views;

fn main() {
    let cli = cli::Cli::parse();
    let config = config::Config::new().unwrap_or_else(|e| {
        eprintln!("{} Ignoring invalid configuration: {}", "Warning:".yellow().bold(), e);
        config::Config::default()
    });

    // Logs go to stderr so occurrences on stdout stay pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let locale = cli.locale.clone().unwrap_or_else(|| config.locale.clone());
    tracing::debug!(%locale, timezone = %config.timezone, "Loaded configuration");

    let result = match cli.command {
        cli::Commands::Parse(command) => commands::parse::parse_rule(command),
        cli::Commands::Expand(command) => commands::expand::expand_rule(command, &config, &locale),
        cli::Commands::Natural(command) => commands::natural::translate(command, &config, &locale),
    };

    if let Err(e) = result {
        handle_error(e, &locale);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error, locale: &str) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        eprintln!("{} {}", "Error:".style(error_style), message(locale, core_error));
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
