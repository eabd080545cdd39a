use std::fmt;

use serde::{Deserialize, Serialize};

/// stored lifecycle state; `completed` is only ever derived, see
/// [`crate::Booking::effective_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Reserved,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// whether this status holds a reservation slot
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Reserved | BookingStatus::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Reserved => "reserved",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "facility_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FacilityType {
    Dryer,
    Storage,
    Processing,
    Coldroom,
    Others,
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FacilityType::Dryer => "dryer",
            FacilityType::Storage => "storage",
            FacilityType::Processing => "processing",
            FacilityType::Coldroom => "coldroom",
            FacilityType::Others => "others",
        };
        write!(f, "{}", s)
    }
}
