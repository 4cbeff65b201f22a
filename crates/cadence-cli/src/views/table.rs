use cadence_core::filter::week_number;
use cadence_core::models::Weekday;
use cadence_core::timezone::format_instant;
use chrono::{DateTime, Datelike, FixedOffset};
use comfy_table::{Attribute, Cell, Color, Row, Table};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOccurrence {
    pub position: usize,
    pub instant: String,
    pub weekday: Weekday,
    pub day_of_year: u32,
    pub week: i64,
    pub weekend: bool,
}

impl From<(usize, &DateTime<FixedOffset>)> for ViewOccurrence {
    fn from((index, instant): (usize, &DateTime<FixedOffset>)) -> Self {
        let weekday = Weekday::from(instant.weekday());
        Self {
            position: index + 1,
            instant: format_instant(instant),
            weekday,
            day_of_year: instant.ordinal(),
            week: week_number(instant),
            weekend: matches!(weekday, Weekday::Sa | Weekday::Su),
        }
    }
}

pub fn occurrence_rows(occurrences: &[DateTime<FixedOffset>]) -> Vec<ViewOccurrence> {
    occurrences.iter().enumerate().map(ViewOccurrence::from).collect()
}

pub fn build_table(rows: &[ViewOccurrence]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Occurrence", "Weekday", "Day of Year", "Week"]);

    for occurrence in rows {
        let mut row = Row::new();
        row.add_cell(Cell::new(occurrence.position).fg(Color::DarkGrey));
        row.add_cell(Cell::new(&occurrence.instant).add_attribute(Attribute::Bold));

        let weekday_cell = Cell::new(occurrence.weekday);
        row.add_cell(if occurrence.weekend {
            weekday_cell.fg(Color::Yellow)
        } else {
            weekday_cell
        });

        row.add_cell(Cell::new(occurrence.day_of_year));
        row.add_cell(Cell::new(occurrence.week));
        table.add_row(row);
    }
    table
}

pub fn display_occurrences(occurrences: &[DateTime<FixedOffset>]) {
    if occurrences.is_empty() {
        println!("No occurrences.");
        return;
    }

    println!("{}", build_table(&occurrence_rows(occurrences)));
}
