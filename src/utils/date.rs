//! Date / timestamp utilities: storage format, parsing user input, ranges.

use crate::errors::{AppError, AppResult};
use crate::models::filters::DateRange;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Storage and wire format: second precision, local wall clock, no zone.
pub const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S";

const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Current local time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

/// Parse a timestamp in storage format (or a minute-precision variant).
/// A bare `YYYY-MM-DD` means midnight of that day.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// `--at` handling: explicit timestamp, or now.
pub fn timestamp_or_now(input: Option<&str>) -> AppResult<NaiveDateTime> {
    match input {
        Some(s) => parse_timestamp(s).ok_or_else(|| AppError::InvalidTimestamp(s.to_string())),
        None => Ok(now()),
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a `--range` expression into inclusive day bounds.
///
/// Supported:
/// - `all`
/// - YYYY, YYYY-MM, YYYY-MM-DD
/// - YYYY:YYYY, YYYY-MM:YYYY-MM, YYYY-MM-DD:YYYY-MM-DD
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    let r = r.trim();
    if r.eq_ignore_ascii_case("all") {
        return Ok(DateRange::default());
    }

    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let (start, end) = (start_raw.trim(), end_raw.trim());
        if start.len() != end.len() {
            return Err(AppError::InvalidDate(format!(
                "{r}: start and end must have the same format"
            )));
        }
        let (from, _) = period_bounds(start)?;
        let (_, to) = period_bounds(end)?;
        if from > to {
            return Err(AppError::InvalidDate(format!("{r}: start is after end")));
        }
        return Ok(DateRange::between(from, to));
    }

    let (from, to) = period_bounds(r)?;
    Ok(DateRange::between(from, to))
}

/// First and last day of a YYYY / YYYY-MM / YYYY-MM-DD period.
fn period_bounds(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::InvalidDate(p.to_string());

    match p.len() {
        // YYYY
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid())?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(invalid)?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(invalid)?;
            Ok((d1, d2))
        }
        // YYYY-MM
        7 => {
            let d1 = parse_date(&format!("{p}-01")).ok_or_else(invalid)?;
            let next = d1.checked_add_months(chrono::Months::new(1)).ok_or_else(invalid)?;
            let d2 = next.pred_opt().ok_or_else(invalid)?;
            Ok((d1, d2))
        }
        // YYYY-MM-DD
        10 => {
            let d = parse_date(p).ok_or_else(invalid)?;
            Ok((d, d))
        }
        _ => Err(invalid()),
    }
}
