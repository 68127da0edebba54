//! Input loading, cleaning, and periodic aggregation.
//!
//! The pipeline consumes a [`PeriodicSeries`]; this module produces
//! one from raw expense records. Cleaning is permissive — rows with
//! unparseable dates or amounts are dropped, not fatal — but a dataset
//! whose schema lacks the date or expense column entirely is rejected
//! up front.

use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Frequency, PeriodicSeries};
use crate::error::{ForecastError, Result};

/// One raw input row, both fields still unparsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub amount: String,
}

/// Date formats accepted from input rows and service responses.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];

/// Parse a calendar date in any of the accepted formats.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Read raw records from CSV.
///
/// The date column must be named `date` (case-insensitive); the value
/// column is the first header containing `expense` or `amount`.
/// Returns [`ForecastError::MissingColumn`] if either is absent from
/// the header row. Individual unreadable rows are dropped.
pub fn load_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ForecastError::Io(e.to_string()))?
        .clone();

    let date_index = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("date"))
        .ok_or_else(|| ForecastError::MissingColumn("date".to_string()))?;
    let amount_index = headers
        .iter()
        .position(|h| {
            let h = h.trim().to_ascii_lowercase();
            h.contains("expense") || h.contains("amount")
        })
        .ok_or_else(|| ForecastError::MissingColumn("expense".to_string()))?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                debug!(%err, "dropping unreadable csv row");
                continue;
            }
        };
        records.push(RawRecord {
            date: row.get(date_index).unwrap_or("").to_string(),
            amount: row.get(amount_index).unwrap_or("").to_string(),
        });
    }
    Ok(records)
}

/// Parse raw records into (date, amount) rows, dropping malformed
/// ones.
pub fn clean(records: &[RawRecord]) -> Vec<(NaiveDate, f64)> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let Some(date) = parse_date(record.date.trim()) else {
            debug!(date = %record.date, "dropping row with unparseable date");
            continue;
        };
        let Ok(amount) = record.amount.trim().parse::<f64>() else {
            debug!(amount = %record.amount, "dropping row with unparseable amount");
            continue;
        };
        rows.push((date, amount));
    }
    rows
}

/// Sum amounts per calendar period and return an ascending series.
///
/// Periods between the first and last observed period that received no
/// rows are filled with a zero sum, so the result is contiguous under
/// the frequency. Empty input yields an empty series.
pub fn aggregate(rows: &[(NaiveDate, f64)], frequency: Frequency) -> PeriodicSeries {
    if rows.is_empty() {
        return PeriodicSeries::empty();
    }

    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, amount) in rows {
        *sums.entry(frequency.period_start(*date)).or_insert(0.0) += amount;
    }

    // BTreeMap guarantees ordering; walk the calendar to close gaps.
    let first = *sums.keys().next().expect("non-empty sums");
    let last = *sums.keys().next_back().expect("non-empty sums");

    let mut periods = Vec::new();
    let mut values = Vec::new();
    let mut current = first;
    while current <= last {
        periods.push(current);
        values.push(sums.get(&current).copied().unwrap_or(0.0));
        current = frequency.next_period(current);
    }

    PeriodicSeries::from_sorted_parts(periods, values)
}

/// Load, clean, and aggregate in one step.
pub fn load_series<R: Read>(reader: R, frequency: Frequency) -> Result<PeriodicSeries> {
    let records = load_csv(reader)?;
    Ok(aggregate(&clean(&records), frequency))
}
