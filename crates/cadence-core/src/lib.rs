//! # Cadence Core Library
//!
//! A recurrence rule engine: parses iCalendar-style RRULE strings, expands them
//! from a start instant into occurrence dates, and reads simple rules out of
//! natural-language phrases in several locales.
//!
//! ## Features
//!
//! - **Rule Parsing**: `FREQ=...;INTERVAL=...` strings into validated rules,
//!   and back again in a fixed key order
//! - **Expansion**: Frequency stepping with BY* filters, COUNT, UNTIL and BYSETPOS
//! - **Natural Language**: Phrases such as "every 2 weeks on monday for 5" in
//!   English, German, Spanish, French and Italian
//! - **Localized Errors**: Every error renders in the caller's locale
//! - **Bounded Work**: Expansion is capped at [`recurrence::MAX_ITERATIONS`]
//!
//! ## Core Modules
//!
//! - [`models`]: Rule data structures and validation
//! - [`parser`]: RRULE string parsing and serialization
//! - [`filter`]: BY* candidate filters
//! - [`recurrence`]: Occurrence expansion engine
//! - [`natural`]: Natural-language rule translation
//! - [`messages`]: Localized error message catalogs
//! - [`locale`]: Supported locales
//! - [`timezone`]: Instant parsing and formatting
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use cadence_core::{parser, recurrence::Recurrence, timezone};
//!
//! fn main() -> Result<(), cadence_core::error::CoreError> {
//!     let rule = parser::parse_string("FREQ=DAILY;INTERVAL=1;COUNT=3")?;
//!     let start = timezone::parse_instant_utc("2023-10-01T00:00:00Z")?;
//!
//!     let dates = Recurrence::with_start(rule, start).get_all_dates()?;
//!     assert_eq!(
//!         dates,
//!         vec![
//!             "2023-10-01T00:00:00Z",
//!             "2023-10-02T00:00:00Z",
//!             "2023-10-03T00:00:00Z",
//!         ]
//!     );
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod filter;
pub mod locale;
pub mod messages;
pub mod models;
pub mod natural;
pub mod parser;
pub mod recurrence;
pub mod timezone;

pub use error::CoreError;
pub use models::{Frequency, RecurrenceRule, RuleParts};
pub use recurrence::Recurrence;
