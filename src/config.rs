use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Name of the optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "bikeshare.json";

/// Filter value meaning "do not narrow by this field".
pub const ALL: &str = "all";

/// City identifiers, sorted.
const SUPPORTED_CITIES: [&str; 3] = ["chicago", "new york", "washington"];

/// Number of leading calendar months that can be filtered on.
const SUPPORTED_MONTHS: usize = 6;

pub const CALENDAR_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

// ---------------------------------------------------------------------------
// CitySource – one selectable city and its backing file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySource {
    /// Lowercase identifier typed by the user.
    pub name: String,
    /// Source file, relative to `data_dir` unless absolute.
    pub file: PathBuf,
}

impl CitySource {
    fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            file: PathBuf::from(file),
        }
    }
}

// ---------------------------------------------------------------------------
// ExplorerConfig – the fixed vocabularies shared by collector and loader
// ---------------------------------------------------------------------------

/// Immutable configuration handed to the input collector and the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub data_dir: PathBuf,
    pub cities: Vec<CitySource>,
    /// Supported month filters, in calendar order starting at January.
    pub months: Vec<String>,
    pub days: Vec<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities: vec![
                CitySource::new("chicago", "chicago.csv"),
                CitySource::new("new york", "new_york_city.csv"),
                CitySource::new("washington", "washington.csv"),
            ],
            months: CALENDAR_MONTHS[..SUPPORTED_MONTHS]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            days: WEEKDAYS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl ExplorerConfig {
    /// Read `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using built-in configuration", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check the vocabularies: exactly the three supported cities, each
    /// once; January through June in order; every weekday exactly once.
    pub fn validate(&self) -> Result<(), DataError> {
        let mut names: Vec<&str> = self.cities.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        if names != SUPPORTED_CITIES {
            return Err(DataError::InvalidConfig(format!(
                "cities must be exactly {} (each once), got {:?}",
                SUPPORTED_CITIES.join(", "),
                self.city_options()
            )));
        }
        if self.months.len() != SUPPORTED_MONTHS
            || self
                .months
                .iter()
                .zip(CALENDAR_MONTHS)
                .any(|(m, expected)| m != expected)
        {
            return Err(DataError::InvalidConfig(
                "months must be january through june, in order".into(),
            ));
        }
        let mut days: Vec<&str> = self.days.iter().map(String::as_str).collect();
        days.sort_unstable();
        let mut weekdays = WEEKDAYS;
        weekdays.sort_unstable();
        if days != weekdays {
            return Err(DataError::InvalidConfig(
                "days must list every weekday exactly once".into(),
            ));
        }
        Ok(())
    }

    /// Resolve a city identifier to its source file.
    pub fn city_file(&self, city: &str) -> Result<PathBuf, DataError> {
        self.cities
            .iter()
            .find(|c| c.name == city)
            .map(|c| self.data_dir.join(&c.file))
            .ok_or_else(|| DataError::UnknownCity(city.to_string()))
    }

    pub fn city_options(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }

    /// `all` followed by the supported month names.
    pub fn month_options(&self) -> Vec<&str> {
        std::iter::once(ALL)
            .chain(self.months.iter().map(String::as_str))
            .collect()
    }

    /// `all` followed by the supported day names.
    pub fn day_options(&self) -> Vec<&str> {
        std::iter::once(ALL)
            .chain(self.days.iter().map(String::as_str))
            .collect()
    }

    /// 1-based calendar month for a supported month name.
    pub fn month_number(&self, month: &str) -> Option<u32> {
        self.months
            .iter()
            .position(|m| m == month)
            .map(|i| i as u32 + 1)
    }
}
