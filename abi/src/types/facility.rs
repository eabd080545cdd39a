use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{duration_days, Error, FacilityId, FacilityType, OperatorId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Facility {
    pub id: FacilityId,
    pub operator_id: OperatorId,
    pub location: String,
    pub price_per_day: f64,
    pub facility_type: FacilityType,
    /// operator-controlled switch, independent of any bookings
    pub available: bool,
    pub contact: String,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Facility {
    pub fn validate(&self) -> Result<(), Error> {
        if self.price_per_day <= 0.0 {
            return Err(Error::InvalidPricePerDay);
        }
        if matches!(self.capacity, Some(c) if c < 1) {
            return Err(Error::InvalidCapacity);
        }
        Ok(())
    }

    /// derived cost of a window at this facility's daily rate
    pub fn booking_amount(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        self.price_per_day * duration_days(start, end) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(price_per_day: f64) -> Facility {
        Facility {
            id: 1,
            operator_id: 1,
            location: "Kano depot 4".to_string(),
            price_per_day,
            facility_type: FacilityType::Storage,
            available: true,
            contact: "+2348000000000".to_string(),
            description: None,
            capacity: Some(20),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn one_hour_window_charges_the_daily_rate() {
        let amount = facility(100.0).booking_amount(
            ts("2025-06-01T09:00:00Z"),
            ts("2025-06-01T10:00:00Z"),
        );
        assert_eq!(amount, 100.0);
    }

    #[test]
    fn three_day_window_charges_three_times_the_rate() {
        let amount = facility(100.0).booking_amount(
            ts("2025-06-01T00:00:00Z"),
            ts("2025-06-04T00:00:00Z"),
        );
        assert_eq!(amount, 300.0);
    }

    #[test]
    fn non_positive_rate_is_invalid() {
        assert_eq!(
            facility(0.0).validate().unwrap_err(),
            Error::InvalidPricePerDay
        );
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let mut f = facility(100.0);
        f.capacity = Some(0);
        assert_eq!(f.validate().unwrap_err(), Error::InvalidCapacity);
    }
}
