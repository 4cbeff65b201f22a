use anyhow::Result;
use cadence_core::natural;
use cadence_core::recurrence::Recurrence;
use chrono::Utc;
use owo_colors::OwoColorize;

use crate::cli::NaturalCommand;
use crate::commands::expand::print_occurrences;
use crate::config::Config;
use crate::parser::parse_start;
use crate::timezone::validate_timezone;

pub fn translate(command: NaturalCommand, config: &Config, locale: &str) -> Result<()> {
    let translated = natural::parse(&command.text, locale)?;

    if !command.expand {
        println!("{}", translated.rule());
        return Ok(());
    }

    let start = match &command.start {
        Some(text) => parse_start(text, validate_timezone(&config.timezone)?)?,
        None => translated.default_start(Utc::now().date_naive())?,
    };

    println!("{} {}", "Rule:".bold(), translated.rule());
    let engine = Recurrence::new(translated.into_rule(), Some(start), locale);
    let occurrences = engine.occurrences()?;
    print_occurrences(&occurrences, command.limit, command.table || config.table);
    Ok(())
}
