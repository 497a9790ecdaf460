use std::collections::BTreeMap;

use crate::data::model::TripTable;

// ---------------------------------------------------------------------------
// Generic aggregates
// ---------------------------------------------------------------------------

fn counts<T: Ord>(values: impl IntoIterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value.  Ties go to the smallest value; `None` when there
/// are no values.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    // BTreeMap iterates in ascending order, so only a strictly greater
    // count replaces the current best.
    for (value, n) in counts(values) {
        if best.as_ref().map_or(true, |(_, top)| n > *top) {
            best = Some((value, n));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences of each distinct value, most frequent first; equal counts
/// are ordered by ascending value.
pub fn value_counts<T: Ord>(values: impl IntoIterator<Item = T>) -> Vec<(T, usize)> {
    let mut out: Vec<(T, usize)> = counts(values).into_iter().collect();
    // Stable sort keeps the ascending key order among ties.
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

// ---------------------------------------------------------------------------
// DurationParts – whole seconds split at day/hour/minute boundaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    /// Split into days, hours, minutes and seconds.
    pub fn long(total: u64) -> Self {
        Self {
            days: total / 86400,
            hours: total % 86400 / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    /// Split into minutes and seconds only; minutes are unbounded.
    pub fn short(total: u64) -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    #[cfg(test)]
    pub fn total_seconds(&self) -> u64 {
        self.days * 86400 + self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

// ---------------------------------------------------------------------------
// Per-report statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    pub month: u32,
    pub day_of_week: &'static str,
    pub hour: u32,
}

/// Popular travel times, or `None` for an empty table.
pub fn time_stats(table: &TripTable) -> Option<TimeStats> {
    Some(TimeStats {
        month: mode(table.trips.iter().map(|t| t.month))?,
        day_of_week: mode(table.trips.iter().map(|t| t.day_of_week))?,
        hour: mode(table.trips.iter().map(|t| t.hour))?,
    })
}

/// Each field is `None` when no remaining trip records a value for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    /// `"<start> to <end>"`.
    pub trip: Option<String>,
}

/// Popular stations and routes, each computed on its own.
pub fn station_stats(table: &TripTable) -> StationStats {
    StationStats {
        start_station: mode(table.trips.iter().filter_map(|t| t.start_station.as_deref()))
            .map(str::to_string),
        end_station: mode(table.trips.iter().filter_map(|t| t.end_station.as_deref()))
            .map(str::to_string),
        trip: mode(table.trips.iter().filter_map(|t| t.route())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationStats {
    /// Whole seconds, floored.
    pub total: u64,
    /// Whole seconds, floored.
    pub mean: u64,
}

impl DurationStats {
    pub fn total_parts(&self) -> DurationParts {
        DurationParts::long(self.total)
    }

    pub fn mean_parts(&self) -> DurationParts {
        DurationParts::short(self.mean)
    }

    /// e.g. `"1d 1h 1m 1s"`.
    pub fn format_total(&self) -> String {
        let p = self.total_parts();
        format!("{}d {}h {}m {}s", p.days, p.hours, p.minutes, p.seconds)
    }

    /// e.g. `"12m 34s"`.
    pub fn format_mean(&self) -> String {
        let p = self.mean_parts();
        format!("{}m {}s", p.minutes, p.seconds)
    }
}

/// Total and mean trip duration, or `None` when no durations are known.
pub fn duration_stats(table: &TripTable) -> Option<DurationStats> {
    let durations: Vec<f64> = table.trips.iter().filter_map(|t| t.duration).collect();
    if durations.is_empty() {
        return None;
    }
    let sum: f64 = durations.iter().sum();
    let mean = sum / durations.len() as f64;
    Some(DurationStats {
        total: sum.max(0.0).floor() as u64,
        mean: mean.max(0.0).floor() as u64,
    })
}

/// Aggregate over an optional source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnStats<T> {
    /// The source has no such column.
    Missing,
    /// The column exists but every remaining cell is blank.
    Empty,
    Values(T),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i64,
    pub latest: i64,
    pub most_common: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub genders: ColumnStats<Vec<(String, usize)>>,
    pub birth_years: ColumnStats<BirthYearStats>,
}

/// Rider demographics.  Optional columns are reported as `Missing` exactly
/// when the source lacks them.
pub fn user_stats(table: &TripTable) -> UserStats {
    let user_types = value_counts(table.trips.iter().filter_map(|t| t.user_type.as_deref()))
        .into_iter()
        .map(|(v, n)| (v.to_string(), n))
        .collect();

    let genders = if table.schema.has_gender {
        let counts: Vec<(String, usize)> =
            value_counts(table.trips.iter().filter_map(|t| t.gender.as_deref()))
                .into_iter()
                .map(|(v, n)| (v.to_string(), n))
                .collect();
        if counts.is_empty() {
            ColumnStats::Empty
        } else {
            ColumnStats::Values(counts)
        }
    } else {
        ColumnStats::Missing
    };

    let birth_years = if table.schema.has_birth_year {
        let years: Vec<i64> = table.trips.iter().filter_map(|t| t.birth_year).collect();
        match (
            years.iter().min(),
            years.iter().max(),
            mode(years.iter().copied()),
        ) {
            (Some(&earliest), Some(&latest), Some(most_common)) => {
                ColumnStats::Values(BirthYearStats {
                    earliest,
                    latest,
                    most_common,
                })
            }
            _ => ColumnStats::Empty,
        }
    } else {
        ColumnStats::Missing
    };

    UserStats {
        user_types,
        genders,
        birth_years,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{
        BIRTH_YEAR, END_STATION, GENDER, START_STATION, START_TIME, TRIP_DURATION, USER_TYPE,
    };

    /// (start time, duration, start, end, user type, gender, birth year)
    type Row<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

    fn table(rows: &[Row], demographics: bool) -> TripTable {
        let mut columns = vec![START_TIME, TRIP_DURATION, START_STATION, END_STATION, USER_TYPE];
        if demographics {
            columns.extend([GENDER, BIRTH_YEAR]);
        }
        let rows = rows
            .iter()
            .map(|r| {
                let mut cells = vec![r.0, r.1, r.2, r.3, r.4];
                if demographics {
                    cells.extend([r.5, r.6]);
                }
                cells.into_iter().map(String::from).collect()
            })
            .collect();
        TripTable::from_rows(columns.into_iter().map(String::from).collect(), rows).unwrap()
    }

    fn sample() -> TripTable {
        table(
            &[
                ("2017-01-02 08:00:00", "100", "A", "B", "Subscriber", "Male", "1980"),
                ("2017-02-06 08:30:00", "200", "B", "A", "Customer", "", ""),
                ("2017-02-07 17:00:00", "300", "B", "A", "Subscriber", "Female", "1990"),
                ("2017-01-09 17:15:00", "401", "A", "B", "Subscriber", "Male", "1990"),
            ],
            true,
        )
    }

    #[test]
    fn mode_breaks_ties_on_smallest_value() {
        assert_eq!(mode([3, 1, 3, 1, 2]), Some(1));
        assert_eq!(mode(["b", "a", "b"]), Some("b"));
        assert_eq!(mode(["z", "y"]), Some("y"));
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn value_counts_sort_by_count_then_value() {
        let counts = value_counts(["c", "a", "b", "a", "c", "d"]);
        assert_eq!(counts, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
    }

    #[test]
    fn duration_parts_recompose() {
        for total in [0, 59, 60, 3599, 3600, 86399, 86400, 90061, 1_234_567_890] {
            let long = DurationParts::long(total);
            assert_eq!(long.total_seconds(), total);
            assert!(long.hours < 24 && long.minutes < 60 && long.seconds < 60);

            let short = DurationParts::short(total);
            assert_eq!(short.minutes * 60 + short.seconds, total);
        }
        assert_eq!(
            DurationParts::long(90061),
            DurationParts {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn time_stats_use_derived_columns() {
        let stats = time_stats(&sample()).unwrap();
        // Two trips each in January and February; January wins the tie.
        assert_eq!(stats.month, 1);
        assert_eq!(stats.day_of_week, "monday");
        assert_eq!(stats.hour, 8);
    }

    #[test]
    fn station_stats_concatenate_routes() {
        let stats = station_stats(&sample());
        assert_eq!(stats.start_station.as_deref(), Some("A"));
        assert_eq!(stats.end_station.as_deref(), Some("A"));
        assert_eq!(stats.trip.as_deref(), Some("A to B"));
    }

    #[test]
    fn blank_end_stations_keep_start_station_mode() {
        let t = table(
            &[
                ("2017-01-02 08:00:00", "", "A", "", "Subscriber", "", ""),
                ("2017-01-03 08:00:00", "", "A", "", "Customer", "", ""),
            ],
            false,
        );
        let stats = station_stats(&t);
        assert_eq!(stats.start_station.as_deref(), Some("A"));
        assert_eq!(stats.end_station, None);
        assert_eq!(stats.trip, None);
        assert_eq!(duration_stats(&t), None);
    }

    #[test]
    fn duration_stats_floor_total_and_mean() {
        let stats = duration_stats(&sample()).unwrap();
        assert_eq!(stats.total, 1001);
        assert_eq!(stats.mean, 250);
        assert_eq!(stats.format_total(), "0d 0h 16m 41s");
        assert_eq!(stats.format_mean(), "4m 10s");
    }

    #[test]
    fn user_stats_with_demographics() {
        let stats = user_stats(&sample());
        assert_eq!(
            stats.user_types,
            vec![("Subscriber".to_string(), 3), ("Customer".to_string(), 1)]
        );
        assert_eq!(
            stats.genders,
            ColumnStats::Values(vec![("Male".to_string(), 2), ("Female".to_string(), 1)])
        );
        assert_eq!(
            stats.birth_years,
            ColumnStats::Values(BirthYearStats {
                earliest: 1980,
                latest: 1990,
                most_common: 1990,
            })
        );
    }

    #[test]
    fn user_stats_without_demographics() {
        let t = table(
            &[("2017-01-02 08:00:00", "100", "A", "B", "Customer", "", "")],
            false,
        );
        let stats = user_stats(&t);
        assert_eq!(stats.genders, ColumnStats::Missing);
        assert_eq!(stats.birth_years, ColumnStats::Missing);
    }

    #[test]
    fn empty_table_has_no_aggregates() {
        let mut t = sample();
        t.trips.clear();
        assert_eq!(time_stats(&t), None);
        assert_eq!(
            station_stats(&t),
            StationStats {
                start_station: None,
                end_station: None,
                trip: None,
            }
        );
        assert_eq!(duration_stats(&t), None);
        let users = user_stats(&t);
        assert!(users.user_types.is_empty());
        assert_eq!(users.genders, ColumnStats::Empty);
        assert_eq!(users.birth_years, ColumnStats::Empty);
    }

    #[test]
    fn stats_are_idempotent() {
        let t = sample();
        assert_eq!(time_stats(&t), time_stats(&t));
        assert_eq!(station_stats(&t), station_stats(&t));
        assert_eq!(user_stats(&t), user_stats(&t));
    }
}
