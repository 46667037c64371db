//! Period blob codec: one JSON text value per task row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::{Period, PeriodId};

/// Wire shape of one period inside the blob.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPeriod {
    id: PeriodId,
    name: String,
    #[serde(rename = "start_date", alias = "start")]
    start: String,
    #[serde(rename = "end_date", alias = "end")]
    end: String,
    color: String,
}

/// Format a day as an ISO-8601 UTC timestamp at midnight.
pub fn format_day(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO-8601 date-time (or a bare date) down to its day.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Serialize a task's periods. An empty list becomes `None` (stored as null).
pub fn serialize_periods(periods: &[Period]) -> Result<Option<String>, serde_json::Error> {
    if periods.is_empty() {
        return Ok(None);
    }
    let stored: Vec<StoredPeriod> = periods
        .iter()
        .map(|p| StoredPeriod {
            id: p.id.clone(),
            name: p.name.clone(),
            start: format_day(p.start),
            end: format_day(p.end),
            color: p.color.clone(),
        })
        .collect();
    serde_json::to_string(&stored).map(Some)
}

/// Deserialize a stored blob. Absent or malformed data yields an empty list.
pub fn deserialize_periods(blob: Option<&str>) -> Vec<Period> {
    let blob = match blob.map(str::trim) {
        Some(b) if !b.is_empty() && b != "null" => b,
        _ => return Vec::new(),
    };
    match try_deserialize(blob) {
        Ok(periods) => periods,
        Err(e) => {
            warn!("failed to parse stored periods, resetting to empty: {}", e);
            Vec::new()
        }
    }
}

fn try_deserialize(blob: &str) -> Result<Vec<Period>, String> {
    let stored: Vec<StoredPeriod> = serde_json::from_str(blob).map_err(|e| e.to_string())?;
    stored
        .into_iter()
        .map(|p| {
            let start = parse_day(&p.start).ok_or_else(|| format!("bad start '{}'", p.start))?;
            let end = parse_day(&p.end).ok_or_else(|| format!("bad end '{}'", p.end))?;
            if start >= end {
                return Err(format!("period {} ends before it starts", p.id));
            }
            Ok(Period::new(p.id, p.name, start, end, p.color))
        })
        .collect()
}
