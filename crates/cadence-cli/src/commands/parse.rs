use anyhow::Result;
use cadence_core::parser::parse_string;

use crate::cli::ParseCommand;

pub fn parse_rule(command: ParseCommand) -> Result<()> {
    let rule = parse_string(&command.rule)?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&rule.to_parts())?);
    } else {
        println!("{}", rule);
    }
    Ok(())
}
