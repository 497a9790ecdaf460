use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::error::DataError;

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

pub const START_TIME: &str = "Start Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Names of the columns derived from the start time at load time.
pub const DERIVED_COLUMNS: [&str; 3] = ["month", "day_of_week", "hour"];

const START_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a start-time cell in any of the accepted layouts.
pub fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Lowercase full weekday name, e.g. `"wednesday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

// ---------------------------------------------------------------------------
// TripSchema – column layout plus optional-column capabilities
// ---------------------------------------------------------------------------

/// Column layout of a loaded source file.  Optional columns are detected
/// once here so reporters never re-inspect the header.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSchema {
    /// Source header, in file order.
    pub columns: Vec<String>,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl TripSchema {
    pub fn new(columns: Vec<String>) -> Self {
        let has = |name: &str| columns.iter().any(|c| c == name);
        let has_gender = has(GENDER);
        let has_birth_year = has(BIRTH_YEAR);
        Self {
            columns,
            has_gender,
            has_birth_year,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require(&self, name: &'static str) -> Result<usize, DataError> {
        self.index_of(name).ok_or(DataError::MissingColumn(name))
    }
}

// ---------------------------------------------------------------------------
// Trip – one row of the source table
// ---------------------------------------------------------------------------

/// A single trip record.  Blank cells become `None` and are skipped by
/// every aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Raw source cells, aligned with `TripSchema::columns`.
    pub cells: Vec<String>,
    pub start_time: NaiveDateTime,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// Seconds; may carry a fractional part in some sources.
    pub duration: Option<f64>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i64>,

    // Derived from `start_time`.
    pub month: u32,
    pub day_of_week: &'static str,
    pub hour: u32,
}

impl Trip {
    /// `"<start> to <end>"`, when both stations are known.
    pub fn route(&self) -> Option<String> {
        match (&self.start_station, &self.end_station) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            _ => None,
        }
    }

    /// Values of the derived columns, in `DERIVED_COLUMNS` order.
    pub fn derived_cells(&self) -> [String; 3] {
        [
            self.month.to_string(),
            self.day_of_week.to_string(),
            self.hour.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// TripTable – a loaded (and possibly filtered) city dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TripTable {
    pub schema: TripSchema,
    pub trips: Vec<Trip>,
}

/// Column positions resolved once per load.
struct ColumnIndex {
    start_time: usize,
    start_station: usize,
    end_station: usize,
    duration: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl TripTable {
    /// Build a table from a header and string rows, typing the known
    /// columns and deriving month, day-of-week and hour.
    ///
    /// Row numbers in errors are 1-based data rows (header excluded).
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DataError> {
        let schema = TripSchema::new(columns);
        let idx = ColumnIndex {
            start_time: schema.require(START_TIME)?,
            start_station: schema.require(START_STATION)?,
            end_station: schema.require(END_STATION)?,
            duration: schema.require(TRIP_DURATION)?,
            user_type: schema.require(USER_TYPE)?,
            gender: schema.index_of(GENDER),
            birth_year: schema.index_of(BIRTH_YEAR),
        };

        let trips = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| parse_trip(&schema, &idx, i + 1, cells))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { schema, trips })
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Source columns followed by the derived ones.
    pub fn display_columns(&self) -> Vec<String> {
        self.schema
            .columns
            .iter()
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }
}

fn parse_trip(
    schema: &TripSchema,
    idx: &ColumnIndex,
    row: usize,
    cells: Vec<String>,
) -> Result<Trip, DataError> {
    if cells.len() != schema.columns.len() {
        return Err(DataError::RaggedRow {
            row,
            expected: schema.columns.len(),
            found: cells.len(),
        });
    }

    let raw_start = &cells[idx.start_time];
    let start_time = parse_start_time(raw_start).ok_or_else(|| DataError::InvalidStartTime {
        row,
        value: raw_start.clone(),
    })?;

    let duration = parse_number(&cells[idx.duration], row, TRIP_DURATION)?;
    let birth_year = match idx.birth_year {
        Some(i) => parse_number(&cells[i], row, BIRTH_YEAR)?.map(|y| y.trunc() as i64),
        None => None,
    };

    Ok(Trip {
        start_station: non_blank(&cells[idx.start_station]),
        end_station: non_blank(&cells[idx.end_station]),
        duration,
        user_type: non_blank(&cells[idx.user_type]),
        gender: idx.gender.and_then(|i| non_blank(&cells[i])),
        birth_year,
        month: start_time.month(),
        day_of_week: weekday_name(start_time.weekday()),
        hour: start_time.hour(),
        start_time,
        cells,
    })
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_number(s: &str, row: usize, column: &'static str) -> Result<Option<f64>, DataError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(v) if v.is_nan() => Ok(None),
        _ => Err(DataError::InvalidNumber {
            row,
            column,
            value: s.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(with_optional: bool) -> Vec<String> {
        let mut cols = vec![
            "",
            START_TIME,
            "End Time",
            TRIP_DURATION,
            START_STATION,
            END_STATION,
            USER_TYPE,
        ];
        if with_optional {
            cols.extend([GENDER, BIRTH_YEAR]);
        }
        cols.into_iter().map(String::from).collect()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn derives_month_day_and_hour() {
        let table = TripTable::from_rows(
            header(false),
            vec![row(&[
                "1",
                "2017-03-15 08:05:00",
                "2017-03-15 08:20:00",
                "900",
                "A",
                "B",
                "Subscriber",
            ])],
        )
        .unwrap();

        let trip = &table.trips[0];
        assert_eq!(trip.month, 3);
        assert_eq!(trip.day_of_week, "wednesday");
        assert_eq!(trip.hour, 8);
        assert_eq!(trip.route().as_deref(), Some("A to B"));
        assert!(!table.schema.has_gender);
        assert!(!table.schema.has_birth_year);
    }

    #[test]
    fn optional_columns_are_detected() {
        let table = TripTable::from_rows(
            header(true),
            vec![row(&[
                "1",
                "2017-06-30 23:59:59",
                "",
                "61.5",
                "A",
                "B",
                "Customer",
                "",
                "1989.0",
            ])],
        )
        .unwrap();

        assert!(table.schema.has_gender);
        assert!(table.schema.has_birth_year);
        let trip = &table.trips[0];
        assert_eq!(trip.gender, None);
        assert_eq!(trip.birth_year, Some(1989));
        assert_eq!(trip.duration, Some(61.5));
        assert_eq!(trip.hour, 23);
    }

    #[test]
    fn accepts_fractional_and_iso_timestamps() {
        assert!(parse_start_time("2017-01-01 00:07:57.123").is_some());
        assert!(parse_start_time("2017-01-01T00:07:57").is_some());
        assert!(parse_start_time("01/01/2017 00:07").is_none());
    }

    #[test]
    fn unparsable_start_time_is_fatal() {
        let err = TripTable::from_rows(
            header(false),
            vec![row(&["1", "yesterday", "", "10", "A", "B", "Subscriber"])],
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidStartTime { row: 1, .. }));
    }

    #[test]
    fn missing_start_time_column_is_fatal() {
        let columns = header(false)
            .into_iter()
            .filter(|c| c != START_TIME)
            .collect();
        let err = TripTable::from_rows(columns, vec![]).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(START_TIME)));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = TripTable::from_rows(header(false), vec![row(&["1", "2017-01-01 00:00:00"])])
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::RaggedRow {
                row: 1,
                expected: 7,
                found: 2
            }
        ));
    }

    #[test]
    fn bad_duration_is_reported_with_column() {
        let err = TripTable::from_rows(
            header(false),
            vec![row(&["1", "2017-01-01 00:00:00", "", "ten", "A", "B", "Subscriber"])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DataError::InvalidNumber {
                column: TRIP_DURATION,
                ..
            }
        ));
    }

    #[test]
    fn derived_fields_stay_in_range() {
        let rows = (0..48)
            .map(|h| {
                let day = 1 + h / 24;
                let hour = h % 24;
                row(&[
                    "x",
                    &format!("2017-02-{day:02} {hour:02}:30:00"),
                    "",
                    "60",
                    "A",
                    "B",
                    "Subscriber",
                ])
            })
            .collect();
        let table = TripTable::from_rows(header(false), rows).unwrap();
        for trip in &table.trips {
            assert!(trip.hour <= 23);
            assert!((1..=12).contains(&trip.month));
            assert!(crate::config::WEEKDAYS.contains(&trip.day_of_week));
        }
    }
}
