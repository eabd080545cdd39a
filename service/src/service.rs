use std::sync::Arc;
use std::time::Duration;

use abi::{
    Booking, BookingFilter, BookingId, Config, DateChange, Error, Farmer, NewBooking, Pagination,
};
use booking::{BookingManager, Bookings, FarmerId, OperatorId};
use sqlx::postgres::PgPoolOptions;

use crate::{IdentityCache, LogNotifier, Notifier};

const IDENTITY_CACHE_SIZE: usize = 1024;
const IDENTITY_CACHE_TTL: Duration = Duration::from_secs(300);

/// application surface over the manager: same operations, plus farmer
/// notifications and account-id resolution
pub struct BookingService {
    manager: BookingManager,
    notifier: Arc<dyn Notifier>,
    identities: IdentityCache<Farmer>,
}

impl BookingService {
    pub fn new(manager: BookingManager, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            manager,
            notifier,
            identities: IdentityCache::new(IDENTITY_CACHE_SIZE, IDENTITY_CACHE_TTL),
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db.max_connections)
            .connect(&config.db.url())
            .await?;
        Ok(Self::new(
            BookingManager::new(pool),
            Arc::new(LogNotifier),
        ))
    }

    pub fn manager(&self) -> &BookingManager {
        &self.manager
    }

    pub async fn create_booking(&self, new: NewBooking) -> Result<Booking, Error> {
        let booking = self.manager.create(new).await?;
        self.notifier
            .notify(
                booking.farmer_id,
                "Booking reserved",
                &format!(
                    "Booking {} is reserved from {} to {}, amount {}",
                    booking.id, booking.start_date, booking.end_date, booking.amount
                ),
            )
            .await;
        Ok(booking)
    }

    pub async fn approve_or_reject(
        &self,
        id: BookingId,
        operator_id: OperatorId,
        approve: bool,
    ) -> Result<Booking, Error> {
        let booking = self.manager.approve_or_reject(id, operator_id, approve).await?;
        let (title, message) = if approve {
            (
                "Booking approved",
                format!("Booking {} was approved by the operator", booking.id),
            )
        } else {
            (
                "Booking rejected",
                format!("Booking {} was rejected by the operator", booking.id),
            )
        };
        self.notifier.notify(booking.farmer_id, title, &message).await;
        Ok(booking)
    }

    pub async fn update_booking_dates(
        &self,
        id: BookingId,
        farmer_id: FarmerId,
        change: DateChange,
    ) -> Result<Booking, Error> {
        self.manager.update_dates(id, farmer_id, change).await
    }

    pub async fn delete_booking(&self, id: BookingId, farmer_id: FarmerId) -> Result<(), Error> {
        self.manager.delete(id, farmer_id).await
    }

    pub async fn expire_booking(&self, id: BookingId) -> Result<Booking, Error> {
        self.manager.expire(id).await
    }

    pub async fn farmer_bookings(
        &self,
        farmer_id: FarmerId,
        page: &Pagination,
    ) -> Result<Vec<Booking>, Error> {
        self.manager.list_farmer_bookings(farmer_id, page).await
    }

    pub async fn facility_bookings(
        &self,
        operator_id: OperatorId,
        page: &Pagination,
    ) -> Result<Vec<Booking>, Error> {
        self.manager.list_facility_bookings(operator_id, page).await
    }

    pub async fn filter_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, Error> {
        self.manager.filter_bookings(filter).await
    }

    /// bookings of an authenticated account, resolved through the identity
    /// cache so repeated requests skip the farmer lookup
    pub async fn user_bookings(
        &self,
        user_id: &str,
        page: &Pagination,
    ) -> Result<Vec<Booking>, Error> {
        let farmer = match self.identities.get(user_id) {
            Some(farmer) => farmer,
            None => {
                let farmer = self.manager.get_farmer_by_user(user_id).await?;
                self.identities.put(user_id, farmer.clone());
                farmer
            }
        };
        self.manager.list_farmer_bookings(farmer.id, page).await
    }
}
