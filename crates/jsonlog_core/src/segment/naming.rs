//! Segment file names.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

/// Encodes `instant` for use inside a file name.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use jsonlog_core::segment::format_instant;
///
/// let instant = Utc.with_ymd_and_hms(2026, 10, 19, 8, 15, 2).unwrap();
/// assert_eq!(format_instant(instant), "2026-10-19T08-15-02-000000000Z");
/// ```
#[must_use]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
        .replace([':', '.'], "-")
}

/// Returns the archive file name `<base>-<instant><ext>`.
#[must_use]
pub fn segment_file_name(base_name: &str, extension: &str, instant: DateTime<Utc>) -> String {
    format!("{base_name}-{}{extension}", format_instant(instant))
}

/// Hands out strictly increasing rotation instants.
///
/// Two rotations landing on the same clock reading, or a clock stepping
/// backwards, would otherwise produce the same archive name and the second
/// rename would overwrite the first archive.
#[derive(Debug, Default, Clone)]
pub struct SegmentClock {
    last: Option<DateTime<Utc>>,
}

impl SegmentClock {
    /// Creates a clock that has issued nothing yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `now`, or one nanosecond past the previous instant if `now`
    /// is not later than it.
    pub fn next(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let instant = match self.last {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last = Some(instant);
        instant
    }
}
