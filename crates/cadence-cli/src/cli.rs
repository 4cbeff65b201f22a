use clap::{Parser, Subcommand};

/// Parse, expand and translate calendar recurrence rules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Locale for natural-language input and error messages (en, de, es, fr, it)
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate a rule and print it in canonical form
    Parse(ParseCommand),
    /// Expand a rule into its occurrences
    Expand(ExpandCommand),
    /// Translate a natural-language phrase into a rule
    Natural(NaturalCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct ParseCommand {
    /// The rule, e.g. "FREQ=WEEKLY;BYDAY=MO,FR;COUNT=4"
    pub rule: String,
    /// Print the rule parts as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ExpandCommand {
    /// The rule to expand
    pub rule: String,
    /// First occurrence (e.g., '2025-08-20T09:00:00Z', '2025-08-20', 'next friday')
    #[arg(long, short)]
    pub start: String,
    /// Show occurrences as a table
    #[arg(long)]
    pub table: bool,
    /// Print at most N occurrences
    #[arg(long, short)]
    pub limit: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct NaturalCommand {
    /// The phrase, e.g. "weekly every 2 monday for 6 at 09:30"
    pub text: String,
    /// First occurrence; defaults to today at the phrase's time
    #[arg(long, short)]
    pub start: Option<String>,
    /// Expand the translated rule as well
    #[arg(long)]
    pub expand: bool,
    /// Show occurrences as a table
    #[arg(long, requires = "expand")]
    pub table: bool,
    /// Print at most N occurrences
    #[arg(long, short, requires = "expand")]
    pub limit: Option<usize>,
}
