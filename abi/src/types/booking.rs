use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::types::PgRange;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::{bound_to_utc, timespan_to_range, BookingId, BookingStatus, FacilityId, FarmerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub facility_id: FacilityId,
    pub farmer_id: FarmerId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub amount: f64,
    pub paid: bool,
    /// true while the booking holds its slot; flipping this is what frees
    /// the facility for the overlap check
    pub active: bool,
    pub status: BookingStatus,
    pub approved: Option<bool>,
    pub approved_at: Option<DateTime<Utc>>,
    pub reserved_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn timespan(&self) -> PgRange<DateTime<Utc>> {
        timespan_to_range(self.start_date, self.end_date)
    }

    /// stored status, except that a confirmed booking whose window has
    /// elapsed reports completed; completion is never written back
    pub fn effective_status(&self, now: DateTime<Utc>) -> BookingStatus {
        if self.status == BookingStatus::Confirmed && self.end_date <= now {
            BookingStatus::Completed
        } else {
            self.status
        }
    }
}

impl FromRow<'_, PgRow> for Booking {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let timespan: PgRange<DateTime<Utc>> = row.try_get("timespan")?;
        let start_date = bound_to_utc(&timespan.start).ok_or_else(|| unbounded("timespan"))?;
        let end_date = bound_to_utc(&timespan.end).ok_or_else(|| unbounded("timespan"))?;
        Ok(Self {
            id: row.try_get("id")?,
            facility_id: row.try_get("facility_id")?,
            farmer_id: row.try_get("farmer_id")?,
            start_date,
            end_date,
            amount: row.try_get("amount")?,
            paid: row.try_get("paid")?,
            active: row.try_get("active")?,
            status: row.try_get("status")?,
            approved: row.try_get("approved")?,
            approved_at: row.try_get("approved_at")?,
            reserved_at: row.try_get("reserved_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn unbounded(index: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: "booking timespan must be bounded".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: 1,
            facility_id: 1,
            farmer_id: 1,
            start_date: ts("2025-06-01T00:00:00Z"),
            end_date: ts("2025-06-03T00:00:00Z"),
            amount: 200.0,
            paid: false,
            active: status.is_active(),
            status,
            approved: None,
            approved_at: None,
            reserved_at: ts("2025-05-20T00:00:00Z"),
            created_at: ts("2025-05-20T00:00:00Z"),
            updated_at: ts("2025-05-20T00:00:00Z"),
        }
    }

    #[test]
    fn confirmed_booking_completes_once_window_elapses() {
        let b = booking(BookingStatus::Confirmed);
        assert_eq!(
            b.effective_status(ts("2025-06-02T00:00:00Z")),
            BookingStatus::Confirmed
        );
        assert_eq!(
            b.effective_status(ts("2025-06-03T00:00:00Z")),
            BookingStatus::Completed
        );
    }

    #[test]
    fn reserved_booking_never_reports_completed() {
        let b = booking(BookingStatus::Reserved);
        assert_eq!(
            b.effective_status(ts("2026-01-01T00:00:00Z")),
            BookingStatus::Reserved
        );
    }
}
