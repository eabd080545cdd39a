use std::ops::Bound;

use chrono::{DateTime, Utc};
use sqlx::postgres::types::PgRange;

use crate::Error;

/// a booking window must be non-empty and ordered
pub fn validate_timespan(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), Error> {
    if start >= end {
        return Err(Error::InvalidTimespan);
    }
    Ok(())
}

/// half-open `[start, end)` range, the only bound shape we ever store
pub fn timespan_to_range(start: DateTime<Utc>, end: DateTime<Utc>) -> PgRange<DateTime<Utc>> {
    PgRange {
        start: Bound::Included(start),
        end: Bound::Excluded(end),
    }
}

pub fn bound_to_utc(bound: &Bound<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => Some(*v),
        Bound::Unbounded => None,
    }
}

/// chargeable days for a window: partial days round up, never below one day
pub fn duration_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let secs = (end - start).num_seconds();
    let days = (secs + 86_399) / 86_400;
    days.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn one_hour_charges_one_day() {
        assert_eq!(
            duration_days(ts("2025-06-01T00:00:00Z"), ts("2025-06-01T01:00:00Z")),
            1
        );
    }

    #[test]
    fn three_full_days_charge_three() {
        assert_eq!(
            duration_days(ts("2025-06-01T00:00:00Z"), ts("2025-06-04T00:00:00Z")),
            3
        );
    }

    #[test]
    fn partial_day_rounds_up() {
        assert_eq!(
            duration_days(ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:01Z")),
            3
        );
    }

    #[test]
    fn reversed_timespan_is_invalid() {
        let err = validate_timespan(ts("2025-06-02T00:00:00Z"), ts("2025-06-01T00:00:00Z"))
            .unwrap_err();
        assert_eq!(err, Error::InvalidTimespan);
    }

    #[test]
    fn empty_timespan_is_invalid() {
        let t = ts("2025-06-01T00:00:00Z");
        assert_eq!(validate_timespan(t, t).unwrap_err(), Error::InvalidTimespan);
    }

    #[test]
    fn range_is_half_open() {
        let range = timespan_to_range(ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"));
        assert_eq!(range.start, Bound::Included(ts("2025-06-01T00:00:00Z")));
        assert_eq!(range.end, Bound::Excluded(ts("2025-06-03T00:00:00Z")));
    }
}
