use anyhow::Result;
use cadence_core::parser::parse_string;
use cadence_core::recurrence::Recurrence;
use cadence_core::timezone::format_instant;
use chrono::{DateTime, FixedOffset};

use crate::cli::ExpandCommand;
use crate::config::Config;
use crate::parser::parse_start;
use crate::timezone::validate_timezone;
use crate::views::table::display_occurrences;

pub fn expand_rule(command: ExpandCommand, config: &Config, locale: &str) -> Result<()> {
    let rule = parse_string(&command.rule)?;
    let timezone = validate_timezone(&config.timezone)?;
    let start = parse_start(&command.start, timezone)?;

    let engine = Recurrence::new(rule, Some(start), locale);
    let occurrences = engine.occurrences()?;
    print_occurrences(&occurrences, command.limit, command.table || config.table);
    Ok(())
}

/// Prints occurrences one per line, or as a table.
pub fn print_occurrences(occurrences: &[DateTime<FixedOffset>], limit: Option<usize>, table: bool) {
    let shown = &occurrences[..limit.map_or(occurrences.len(), |n| n.min(occurrences.len()))];

    if table {
        display_occurrences(shown);
    } else {
        for occurrence in shown {
            println!("{}", format_instant(occurrence));
        }
    }
}
