mod manager;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

pub use abi::{BookingId, FacilityId, FarmerId, OperatorId};

#[derive(Debug, Clone)]
pub struct BookingManager {
    pool: PgPool,
}

#[async_trait]
pub trait Bookings {
    /// reserve a slot: validate, check the facility and farmer, derive the
    /// amount when none is supplied, insert in the reserved state
    async fn create(&self, new: abi::NewBooking) -> Result<abi::Booking, abi::Error>;
    /// operator decision on a reserved booking; approval confirms it,
    /// rejection cancels it and frees the slot
    async fn approve_or_reject(
        &self,
        id: BookingId,
        operator_id: OperatorId,
        approve: bool,
    ) -> Result<abi::Booking, abi::Error>;
    /// move a booking to a new window, re-checking availability against
    /// every other active booking; refused outright once paid
    async fn update_dates(
        &self,
        id: BookingId,
        farmer_id: FarmerId,
        change: abi::DateChange,
    ) -> Result<abi::Booking, abi::Error>;
    /// remove a booking owned by the calling farmer
    async fn delete(&self, id: BookingId, farmer_id: FarmerId) -> Result<(), abi::Error>;
    /// cancel a single elapsed, unpaid booking on demand
    async fn expire(&self, id: BookingId) -> Result<abi::Booking, abi::Error>;
    /// cancel every unpaid active booking older than the grace window,
    /// returning how many were cancelled
    async fn sweep_expired(&self, grace: Duration) -> Result<u64, abi::Error>;
    /// booking by id
    async fn get(&self, id: BookingId) -> Result<abi::Booking, abi::Error>;
    /// a farmer's bookings, newest first
    async fn list_farmer_bookings(
        &self,
        farmer_id: FarmerId,
        page: &abi::Pagination,
    ) -> Result<Vec<abi::Booking>, abi::Error>;
    /// bookings across all of an operator's facilities, newest first
    async fn list_facility_bookings(
        &self,
        operator_id: OperatorId,
        page: &abi::Pagination,
    ) -> Result<Vec<abi::Booking>, abi::Error>;
    /// bookings matching a typed filter
    async fn filter_bookings(
        &self,
        filter: &abi::BookingFilter,
    ) -> Result<Vec<abi::Booking>, abi::Error>;
    /// whether a window on a facility is free of active bookings, optionally
    /// ignoring one booking (for update-own-booking checks)
    async fn is_available(
        &self,
        facility_id: FacilityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> Result<bool, abi::Error>;
}
