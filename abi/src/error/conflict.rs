use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::FacilityId;

/// conflict reported by the `bookings_no_overlap` exclusion constraint;
/// falls back to the raw detail string when Postgres changes its wording
#[derive(Debug, Clone, PartialEq)]
pub enum BookingConflictInfo {
    Parsed(BookingConflict),
    Unparsed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingConflict {
    pub new: BookingWindow,
    pub old: BookingWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingWindow {
    pub facility_id: FacilityId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FromStr for BookingConflictInfo {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse() {
            Ok(conflict) => BookingConflictInfo::Parsed(conflict),
            Err(_) => BookingConflictInfo::Unparsed(s.to_string()),
        })
    }
}

impl FromStr for BookingConflict {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let info: ParsedInfo = s.parse()?;
        Ok(Self {
            new: (&info.new).try_into()?,
            old: (&info.old).try_into()?,
        })
    }
}

// the detail string looks like:
//   Key (facility_id, timespan)=(42, ["2025-06-02 00:00:00+00","2025-06-04 00:00:00+00")) \
//   conflicts with existing key (facility_id, timespan)=(42, ["2025-06-01 00:00:00+00","2025-06-03 00:00:00+00")).
struct ParsedInfo {
    new: HashMap<String, String>,
    old: HashMap<String, String>,
}

lazy_static! {
    static ref KEYS_RE: Regex = Regex::new(
        r#"\((?P<k1>[a-zA-Z0-9_]+)\s*,\s*(?P<k2>[a-zA-Z0-9_]+)\)=\((?P<v1>[0-9]+)\s*,\s*\[(?P<v2>[^\)\]]+)"#
    )
    .unwrap();
}

impl FromStr for ParsedInfo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut maps = KEYS_RE
            .captures_iter(s)
            .map(|caps| {
                let mut map = HashMap::new();
                map.insert(caps["k1"].to_string(), caps["v1"].to_string());
                map.insert(caps["k2"].to_string(), caps["v2"].to_string());
                map
            })
            .collect::<Vec<_>>();
        if maps.len() != 2 {
            return Err(());
        }
        let old = maps.pop().ok_or(())?;
        let new = maps.pop().ok_or(())?;
        Ok(Self { new, old })
    }
}

impl TryFrom<&HashMap<String, String>> for BookingWindow {
    type Error = ();

    fn try_from(map: &HashMap<String, String>) -> Result<Self, Self::Error> {
        let facility_id = map
            .get("facility_id")
            .ok_or(())?
            .parse::<FacilityId>()
            .map_err(|_| ())?;
        let timespan = map.get("timespan").ok_or(())?.replace('"', "");
        let mut split = timespan.splitn(2, ',');
        let start = parse_pg_timestamp(split.next().ok_or(())?)?;
        let end = parse_pg_timestamp(split.next().ok_or(())?)?;
        Ok(Self {
            facility_id,
            start,
            end,
        })
    }
}

fn parse_pg_timestamp(s: &str) -> Result<DateTime<Utc>, ()> {
    // %.f absorbs the fractional seconds Postgres prints when they are nonzero
    DateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f%#z")
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL: &str = "Key (facility_id, timespan)=(42, [\"2025-06-02 00:00:00+00\",\"2025-06-04 00:00:00+00\")) conflicts with existing key (facility_id, timespan)=(42, [\"2025-06-01 00:00:00+00\",\"2025-06-03 00:00:00+00\")).";

    #[test]
    fn conflict_detail_should_parse() {
        let info: BookingConflictInfo = DETAIL.parse().unwrap();
        match info {
            BookingConflictInfo::Parsed(conflict) => {
                assert_eq!(conflict.new.facility_id, 42);
                assert_eq!(conflict.old.facility_id, 42);
                assert_eq!(
                    conflict.new.start.to_rfc3339(),
                    "2025-06-02T00:00:00+00:00"
                );
                assert_eq!(conflict.new.end.to_rfc3339(), "2025-06-04T00:00:00+00:00");
                assert_eq!(
                    conflict.old.start.to_rfc3339(),
                    "2025-06-01T00:00:00+00:00"
                );
                assert_eq!(conflict.old.end.to_rfc3339(), "2025-06-03T00:00:00+00:00");
            }
            BookingConflictInfo::Unparsed(_) => panic!("expected parsed conflict"),
        }
    }

    #[test]
    fn garbage_detail_should_fall_back_to_unparsed() {
        let info: BookingConflictInfo = "no window info here".parse().unwrap();
        assert_eq!(
            info,
            BookingConflictInfo::Unparsed("no window info here".to_string())
        );
    }
}
