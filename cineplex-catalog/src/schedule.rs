use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use cineplex_core::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::movie::Showing;
use crate::CatalogError;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a showtime into an absolute instant.
///
/// Timestamps with an offset (or `Z`) are taken as-is. Offset-less timestamps are
/// wall-clock times in `tz`; local times skipped by a DST change are rejected and
/// repeated ones resolve to the earlier instant. A bare date is UTC midnight.
pub fn parse_showtime(raw: &str, tz: Tz) -> CoreResult<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Parse("empty timestamp".to_string()));
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|local| local.with_timezone(&Utc))
                .ok_or_else(|| CoreError::Parse(format!("{} does not exist in {}", raw, tz)));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| CoreError::Parse(raw.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeSlot {
    /// `9:05 AM` style, in the grouper's time zone
    pub display_time: String,
    pub iso_timestamp: String,
    pub auditorium: Option<String>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowtimeDay {
    /// `YYYY-MM-DD` in the grouper's time zone
    pub date_key: String,
    pub short_day: String,
    pub date_label: String,
    pub showtimes: Vec<ShowtimeSlot>,
}

/// Buckets a movie's showings into calendar days of a fixed time zone,
/// independent of the host's local zone.
#[derive(Debug, Clone, Copy)]
pub struct TimeZoneSlotGrouper {
    tz: Tz,
}

impl TimeZoneSlotGrouper {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self, CatalogError> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| CatalogError::InvalidTimeZone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Days ascend by date key; showtimes within a day ascend by instant, ties
    /// keeping catalog order. Unparseable timestamps are dropped.
    pub fn group(&self, showings: &[Showing]) -> Vec<ShowtimeDay> {
        let mut days: BTreeMap<NaiveDate, Vec<ShowtimeSlot>> = BTreeMap::new();

        for showing in showings {
            let starts_at = match parse_showtime(&showing.timestamp, self.tz) {
                Ok(instant) => instant,
                Err(err) => {
                    debug!("Dropping showtime {:?}: {}", showing.timestamp, err);
                    continue;
                }
            };
            let local = starts_at.with_timezone(&self.tz);

            days.entry(local.date_naive()).or_default().push(ShowtimeSlot {
                display_time: local.format("%-I:%M %p").to_string(),
                iso_timestamp: showing.timestamp.clone(),
                auditorium: showing.auditorium.clone(),
                starts_at,
            });
        }

        days.into_iter()
            .map(|(date, mut showtimes)| {
                showtimes.sort_by_key(|slot| slot.starts_at);
                ShowtimeDay {
                    date_key: date.format("%Y-%m-%d").to_string(),
                    short_day: date.format("%a").to_string(),
                    date_label: date.format("%b %-d").to_string(),
                    showtimes,
                }
            })
            .collect()
    }

    /// Convenience for catalogs that only carry bare timestamps
    pub fn group_timestamps<S: AsRef<str>>(&self, timestamps: &[S]) -> Vec<ShowtimeDay> {
        let showings: Vec<Showing> = timestamps.iter().map(|t| Showing::new(t.as_ref())).collect();
        self.group(&showings)
    }
}
