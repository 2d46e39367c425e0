//! DST-aware conversion of export timestamps into the entry's civil timezone.
//!
//! DayOne stores instants in UTC; filenames and frontmatter want the wall
//! clock the entry was written at. Rather than pull in a full tz database, a
//! fixed offset table covers the zones that actually occur in exports, with
//! the US DST rule (second Sunday of March through first Sunday of November)
//! applied per calendar year.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Standard/daylight UTC offsets for one zone, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneOffsets {
    pub standard: i64,
    pub daylight: i64,
}

/// Zone names seen in DayOne exports. Phoenix observes no DST.
const ZONE_TABLE: &[(&str, ZoneOffsets)] = &[
    ("America/Chicago", ZoneOffsets { standard: -6, daylight: -5 }),
    ("America/New_York", ZoneOffsets { standard: -5, daylight: -4 }),
    ("America/Denver", ZoneOffsets { standard: -7, daylight: -6 }),
    ("America/Los_Angeles", ZoneOffsets { standard: -8, daylight: -7 }),
    ("America/Phoenix", ZoneOffsets { standard: -7, daylight: -7 }),
    ("UTC", ZoneOffsets { standard: 0, daylight: 0 }),
];

/// Offsets applied when an entry names a zone outside the table: Central
/// time, the default the `--fallback-zone` flag overrides.
pub const DEFAULT_FALLBACK: ZoneOffsets = ZoneOffsets { standard: -6, daylight: -5 };

pub fn lookup(zone: &str) -> Option<ZoneOffsets> {
    ZONE_TABLE
        .iter()
        .find(|(name, _)| *name == zone)
        .map(|(_, offsets)| *offsets)
}

pub fn known_zones() -> Vec<&'static str> {
    ZONE_TABLE.iter().map(|(name, _)| *name).collect()
}

/// Midnight UTC starting the nth Sunday of the given month.
fn nth_sunday(year: i32, month: u32, nth: i64) -> NaiveDateTime {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("first of month is a valid date");
    let days_until_sunday = (6 - first.weekday().num_days_from_monday()) % 7;
    let sunday = first + Duration::days(days_until_sunday as i64 + 7 * (nth - 1));
    sunday.and_time(NaiveTime::MIN)
}

/// US DST window for the instant's calendar year, compared at 00:00 UTC.
/// Applied to every zone as an approximation; `ZoneOffsets` with equal
/// halves (Phoenix, UTC) are unaffected either way.
fn is_dst(instant: DateTime<Utc>) -> bool {
    let year = instant.year();
    let dst_start = nth_sunday(year, 3, 2);
    let dst_end = nth_sunday(year, 11, 1);
    let naive = instant.naive_utc();
    naive >= dst_start && naive < dst_end
}

fn offset_hours(zone: Option<&str>, instant: DateTime<Utc>, fallback: ZoneOffsets) -> i64 {
    let offsets = zone.and_then(lookup).unwrap_or(fallback);
    if is_dst(instant) {
        offsets.daylight
    } else {
        offsets.standard
    }
}

/// Convert an RFC 3339 UTC stamp into the zone's naive wall-clock time.
/// `None` when the stamp is missing or unparseable — callers degrade to a
/// placeholder instead of failing the entry.
pub fn to_local(
    stamp: Option<&str>,
    zone: Option<&str>,
    fallback: ZoneOffsets,
) -> Option<NaiveDateTime> {
    let stamp = stamp?;
    let instant = DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&Utc);
    let shifted = instant + Duration::hours(offset_hours(zone, instant, fallback));
    Some(shifted.naive_utc())
}
