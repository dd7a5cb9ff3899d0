//! Time ranges and the overlap rule used for conflict detection.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};

use crate::error::TimestampError;

/// How far each end of the other interval is pulled inward before the
/// containment test. Back-to-back meetings touch at one instant and must
/// not count as a conflict.
pub const CONFLICT_MARGIN: Duration = Duration::minutes(1);

/// A closed range of instants, `start <= end`.
///
/// Both ends keep the offset they were parsed with, so the day window is
/// computed in the event's own zone. Comparisons are between instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl Interval {
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, TimestampError> {
        if end < start {
            return Err(TimestampError::Inverted {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Interval { start, end })
    }

    /// Parse a pair of RFC 3339 timestamps as they come from the provider.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, TimestampError> {
        let start = parse_rfc3339("start", start)?;
        let end = parse_rfc3339("end", end)?;
        Interval::new(start, end)
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn end(&self) -> DateTime<FixedOffset> {
        self.end
    }

    pub fn contains(&self, t: DateTime<FixedOffset>) -> bool {
        self.start <= t && t <= self.end
    }

    /// True if `other`, nudged inward by [`CONFLICT_MARGIN`] at both ends,
    /// starts or ends inside `self`.
    ///
    /// This is deliberately not a symmetric intersection test. Touching
    /// intervals never overlap, and an `other` that fully encloses `self`
    /// with more than a minute to spare on each side is not reported.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.contains(other.start + CONFLICT_MARGIN) || self.contains(other.end - CONFLICT_MARGIN)
    }

    /// From 00:00:00 on the start's day to 23:59:59 on the end's day, each
    /// in its own offset.
    pub fn day_window(&self) -> Interval {
        Interval {
            start: start_of_day(self.start),
            end: end_of_day(self.end),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

pub fn start_of_day(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t - (t.time() - NaiveTime::MIN)
}

pub fn end_of_day(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start_of_day(t) + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59)
}

fn parse_rfc3339(
    field: &'static str,
    value: Option<&str>,
) -> Result<DateTime<FixedOffset>, TimestampError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or(TimestampError::Missing(field))?;

    DateTime::parse_from_rfc3339(value).map_err(|source| TimestampError::Invalid {
        field,
        value: value.to_string(),
        source,
    })
}
