//! Combine the separately picked date and time of a trip into one instant.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDateTime, Offset, SecondsFormat, TimeZone, Timelike, Utc,
};

/// Year/month/day from `date`, hour/minute from `time`, seconds zeroed, read
/// as a wall-clock time in `date`'s zone. Rendered as RFC 3339 in UTC.
///
/// A wall-clock time repeated by a backward transition resolves to its first
/// occurrence. One skipped by a forward transition is shifted forward by the
/// gap, as a device calendar does. `date` itself is formatted only when the
/// combination cannot be built at all.
pub fn combine_date_and_time<Tz: TimeZone>(date: &DateTime<Tz>, time: &DateTime<Tz>) -> String {
    let combined = date
        .date_naive()
        .and_hms_opt(time.hour(), time.minute(), 0)
        .and_then(|naive| resolve_local(&date.timezone(), naive));

    match combined {
        Some(instant) => format_instant(&instant),
        None => format_instant(date),
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            // Read the skipped time with the offset in force before the gap.
            let before = tz.from_local_datetime(&(naive - Duration::hours(3))).earliest()?;
            let offset = before.offset().fix().local_minus_utc();
            let utc = naive.checked_sub_signed(Duration::seconds(i64::from(offset)))?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

/// Internet date-time in UTC, whole seconds, `Z` suffix.
pub fn format_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    instant
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
