use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{validate_timespan, Error, FacilityId, FarmerId};

/// everything the orchestrator needs to reserve a slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub facility_id: FacilityId,
    pub farmer_id: FarmerId,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// caller-supplied override; derived from the facility rate when absent
    pub amount: Option<f64>,
}

impl NewBooking {
    pub fn new(
        facility_id: FacilityId,
        farmer_id: FarmerId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            facility_id,
            farmer_id,
            start_date,
            end_date,
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), Error> {
        if self.facility_id <= 0 {
            return Err(Error::InvalidFacilityId(self.facility_id));
        }
        if self.farmer_id <= 0 {
            return Err(Error::InvalidFarmerId(self.farmer_id));
        }
        validate_timespan(self.start_date, self.end_date)?;
        if self.start_date < now {
            return Err(Error::StartDateInPast);
        }
        if matches!(self.amount, Some(a) if a < 0.0) {
            return Err(Error::NegativeAmount);
        }
        Ok(())
    }
}

/// partial window change for an existing booking; a missing side keeps the
/// stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateChange {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DateChange {
    pub fn start(start_date: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: None,
        }
    }

    pub fn end(end_date: DateTime<Utc>) -> Self {
        Self {
            start_date: None,
            end_date: Some(end_date),
        }
    }

    pub fn both(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn now() -> DateTime<Utc> {
        ts("2025-05-01T00:00:00Z")
    }

    #[test]
    fn valid_request_passes() {
        let new = NewBooking::new(1, 1, ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"));
        assert!(new.validate(now()).is_ok());
    }

    #[test]
    fn past_start_is_rejected() {
        let new = NewBooking::new(1, 1, ts("2025-04-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"));
        assert_eq!(new.validate(now()).unwrap_err(), Error::StartDateInPast);
    }

    #[test]
    fn reversed_window_is_rejected() {
        let new = NewBooking::new(1, 1, ts("2025-06-03T00:00:00Z"), ts("2025-06-01T00:00:00Z"));
        assert_eq!(new.validate(now()).unwrap_err(), Error::InvalidTimespan);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let new = NewBooking::new(1, 1, ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"))
            .with_amount(-1.0);
        assert_eq!(new.validate(now()).unwrap_err(), Error::NegativeAmount);
    }

    #[test]
    fn missing_ids_are_rejected() {
        let new = NewBooking::new(0, 1, ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"));
        assert_eq!(new.validate(now()).unwrap_err(), Error::InvalidFacilityId(0));
        let new = NewBooking::new(1, 0, ts("2025-06-01T00:00:00Z"), ts("2025-06-03T00:00:00Z"));
        assert_eq!(new.validate(now()).unwrap_err(), Error::InvalidFarmerId(0));
    }
}
