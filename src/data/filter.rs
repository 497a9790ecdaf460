use super::model::{Trip, TripTable};
use crate::config::{ExplorerConfig, ALL};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Selection – one iteration's city / month / day choice
// ---------------------------------------------------------------------------

/// What the user asked to analyse.  Month and day are `"all"` or one of the
/// configured names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub city: String,
    pub month: String,
    pub day: String,
}

// ---------------------------------------------------------------------------
// Filter predicate: which month and day survive
// ---------------------------------------------------------------------------

/// A resolved month/day filter.  `None` means "all" (no constraint).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripFilter {
    /// 1-based calendar month.
    pub month: Option<u32>,
    /// Lowercase weekday name.
    pub day: Option<String>,
}

impl TripFilter {
    /// Resolve the user's month/day strings against the configured
    /// vocabularies.
    pub fn from_selection(
        config: &ExplorerConfig,
        selection: &Selection,
    ) -> Result<Self, DataError> {
        let month = match selection.month.as_str() {
            ALL => None,
            name => Some(
                config
                    .month_number(name)
                    .ok_or_else(|| DataError::UnknownMonth(name.to_string()))?,
            ),
        };
        let day = match selection.day.as_str() {
            ALL => None,
            name if config.days.iter().any(|d| d == name) => Some(name.to_string()),
            name => return Err(DataError::UnknownDay(name.to_string())),
        };
        log::debug!("Resolved filter month={month:?} day={day:?}");
        Ok(Self { month, day })
    }

    pub fn matches(&self, trip: &Trip) -> bool {
        let month_ok = self.month.map_or(true, |m| trip.month == m);
        let day_ok = self.day.as_deref().map_or(true, |d| trip.day_of_week == d);
        month_ok && day_ok
    }
}

/// Narrow the table in place.  The schema, including its optional-column
/// capabilities, is kept even when no trips remain.
pub fn apply_filter(mut table: TripTable, filter: &TripFilter) -> TripTable {
    table.trips.retain(|trip| filter.matches(trip));
    table
}
