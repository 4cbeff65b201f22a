use cadence_core::locale::DEFAULT_LOCALE;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::timezone::detect_system_timezone;

pub const CONFIG_FILE: &str = "cadence.toml";
pub const ENV_PREFIX: &str = "CADENCE_";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Locale for natural-language input and error messages
    pub locale: String,
    /// IANA timezone applied to start instants written without an offset
    pub timezone: String,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// Show expanded occurrences as a table by default
    pub table: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            timezone: detect_system_timezone(),
            log_level: "warn".to_string(),
            table: false,
        }
    }
}

impl Config {
    /// Layers defaults, `cadence.toml` in the working directory and `CADENCE_*` variables.
    pub fn new() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
    }
}
