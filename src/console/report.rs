use std::io::{self, Write};
use std::time::Instant;

use chrono::Month;

use super::prompt::title_case;
use crate::data::model::TripTable;
use crate::stats::{self, ColumnStats};

const NO_DATA: &str = "No trip data for the selected filters.";
const NONE_RECORDED: &str = "(none recorded)";

// ---------------------------------------------------------------------------
// Report frame: heading, body, elapsed time, separator
// ---------------------------------------------------------------------------

fn report<W, F>(out: &mut W, heading: &str, body: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W) -> io::Result<()>,
{
    writeln!(out, "\n{heading}\n")?;
    let start = Instant::now();
    body(&mut *out)?;
    writeln!(
        out,
        "\nThis took {:.2} seconds.",
        start.elapsed().as_secs_f64()
    )?;
    writeln!(out, "{}", "-".repeat(40))
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

/// `label    count` lines with labels padded to a common width.
fn write_counts<W: Write>(out: &mut W, counts: &[(String, usize)]) -> io::Result<()> {
    let width = counts.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
    for (label, n) in counts {
        writeln!(out, "{label:<width$}    {n}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// The four reporters
// ---------------------------------------------------------------------------

/// Most frequent month, day of week and start hour.
pub fn time_stats<W: Write>(table: &TripTable, out: &mut W) -> io::Result<()> {
    report(out, "Calculating The Most Frequent Times of Travel...", |out| {
        match stats::time_stats(table) {
            Some(s) => {
                writeln!(out, "Most Common Month: {}", month_name(s.month))?;
                writeln!(out, "Most Common Day of Week: {}", title_case(s.day_of_week))?;
                writeln!(out, "Most Common Start Hour: {}", s.hour)
            }
            None => writeln!(out, "{NO_DATA}"),
        }
    })
}

/// Most popular start station, end station and trip.
pub fn station_stats<W: Write>(table: &TripTable, out: &mut W) -> io::Result<()> {
    report(out, "Calculating The Most Popular Stations and Trip...", |out| {
        if table.is_empty() {
            return writeln!(out, "{NO_DATA}");
        }
        let s = stats::station_stats(table);
        let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| NONE_RECORDED.to_string());
        writeln!(out, "Most Common Start Station: {}", or_none(&s.start_station))?;
        writeln!(out, "Most Common End Station: {}", or_none(&s.end_station))?;
        writeln!(out, "Most Common Trip: {}", or_none(&s.trip))
    })
}

/// Total and mean travel time.
pub fn trip_duration_stats<W: Write>(table: &TripTable, out: &mut W) -> io::Result<()> {
    report(out, "Calculating Trip Duration...", |out| {
        if table.is_empty() {
            return writeln!(out, "{NO_DATA}");
        }
        match stats::duration_stats(table) {
            Some(s) => {
                writeln!(out, "Total Travel Time: {}", s.format_total())?;
                writeln!(out, "Mean Travel Time: {}", s.format_mean())
            }
            None => {
                writeln!(out, "Total Travel Time: {NONE_RECORDED}")?;
                writeln!(out, "Mean Travel Time: {NONE_RECORDED}")
            }
        }
    })
}

/// User type counts, plus gender and birth year when the source has them.
pub fn user_stats<W: Write>(table: &TripTable, out: &mut W) -> io::Result<()> {
    report(out, "Calculating User Stats...", |out| {
        if table.is_empty() {
            return writeln!(out, "{NO_DATA}");
        }
        let s = stats::user_stats(table);

        writeln!(out, "Counts of User Types:")?;
        write_counts(out, &s.user_types)?;

        match &s.genders {
            ColumnStats::Values(counts) => {
                writeln!(out, "\nCounts of Gender:")?;
                write_counts(out, counts)?;
            }
            ColumnStats::Empty => writeln!(out, "\nNo gender recorded for these trips.")?,
            ColumnStats::Missing => writeln!(out, "\nGender data not available.")?,
        }

        match &s.birth_years {
            ColumnStats::Values(years) => {
                writeln!(out, "\nEarliest Birth Year: {}", years.earliest)?;
                writeln!(out, "Most Recent Birth Year: {}", years.latest)?;
                writeln!(out, "Most Common Birth Year: {}", years.most_common)?;
            }
            ColumnStats::Empty => writeln!(out, "\nNo birth year recorded for these trips.")?,
            ColumnStats::Missing => writeln!(out, "\nBirth year data not available.")?,
        }
        Ok(())
    })
}
