use abi::{
    timespan_to_range, validate_timespan, Booking, BookingFilter, DateChange, Error, Facility,
    Farmer, NewBooking, Pagination,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use tracing::debug;

use crate::{BookingId, BookingManager, Bookings, FacilityId, FarmerId, OperatorId};

#[async_trait]
impl Bookings for BookingManager {
    async fn create(&self, new: NewBooking) -> Result<Booking, Error> {
        new.validate(Utc::now())?;

        let facility = self.get_facility(new.facility_id).await?;
        facility.validate()?;
        if !facility.available {
            return Err(Error::FacilityUnavailable(facility.id));
        }
        // the farmer row must exist before we hold a slot for it
        self.get_farmer(new.farmer_id).await?;

        // early reject; the exclusion constraint below is the authoritative guard
        if !self
            .is_available(new.facility_id, new.start_date, new.end_date, None)
            .await?
        {
            return Err(Error::FacilityBooked {
                facility_id: new.facility_id,
                start: new.start_date,
                end: new.end_date,
            });
        }

        let amount = match new.amount {
            Some(amount) => amount,
            None => facility.booking_amount(new.start_date, new.end_date),
        };

        // a racing insert on the same window trips bookings_no_overlap and
        // surfaces as ConflictBooking via From<sqlx::Error>
        let booking = sqlx::query_as(
            "INSERT INTO agri.bookings (facility_id, farmer_id, timespan, amount) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(new.facility_id)
        .bind(new.farmer_id)
        .bind(timespan_to_range(new.start_date, new.end_date))
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn approve_or_reject(
        &self,
        id: BookingId,
        operator_id: OperatorId,
        approve: bool,
    ) -> Result<Booking, Error> {
        let booking = self.get(id).await?;
        let facility = self.get_facility(booking.facility_id).await?;
        if facility.operator_id != operator_id {
            return Err(Error::NotFacilityOperator(id));
        }

        // only a reserved booking can take an operator decision; anything
        // else is not matched and reports NotFound
        let sql = if approve {
            "UPDATE agri.bookings SET status = 'confirmed', approved = TRUE, approved_at = now() WHERE id = $1 AND status = 'reserved' RETURNING *"
        } else {
            "UPDATE agri.bookings SET status = 'cancelled', active = FALSE, approved = FALSE, approved_at = NULL WHERE id = $1 AND status = 'reserved' RETURNING *"
        };
        let booking = sqlx::query_as(sql).bind(id).fetch_one(&self.pool).await?;
        Ok(booking)
    }

    async fn update_dates(
        &self,
        id: BookingId,
        farmer_id: FarmerId,
        change: DateChange,
    ) -> Result<Booking, Error> {
        let booking = self.get(id).await?;
        if booking.farmer_id != farmer_id {
            return Err(Error::NotBookingOwner(id));
        }
        if change.is_empty() {
            return Ok(booking);
        }
        if booking.paid {
            return Err(Error::PaidDatesImmutable(id));
        }

        let start = change.start_date.unwrap_or(booking.start_date);
        let end = change.end_date.unwrap_or(booking.end_date);
        validate_timespan(start, end)?;

        if !self
            .is_available(booking.facility_id, start, end, Some(id))
            .await?
        {
            return Err(Error::FacilityBooked {
                facility_id: booking.facility_id,
                start,
                end,
            });
        }

        let booking = sqlx::query_as("UPDATE agri.bookings SET timespan = $1 WHERE id = $2 RETURNING *")
            .bind(timespan_to_range(start, end))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn delete(&self, id: BookingId, farmer_id: FarmerId) -> Result<(), Error> {
        let booking = self.get(id).await?;
        if booking.farmer_id != farmer_id {
            return Err(Error::NotBookingOwner(id));
        }
        sqlx::query("DELETE FROM agri.bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn expire(&self, id: BookingId) -> Result<Booking, Error> {
        let booking = self.get(id).await?;
        if !booking.active {
            return Err(Error::AlreadyInactive(id));
        }
        if booking.paid {
            return Err(Error::AlreadyPaid(id));
        }
        if Utc::now() < booking.end_date {
            return Err(Error::NotYetExpired(id));
        }
        let booking = sqlx::query_as(
            "UPDATE agri.bookings SET active = FALSE, status = 'cancelled' WHERE id = $1 AND active RETURNING *",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn sweep_expired(&self, grace: Duration) -> Result<u64, Error> {
        let cutoff = Utc::now() - grace;
        let cancelled = sqlx::query(
            "UPDATE agri.bookings SET active = FALSE, status = 'cancelled' WHERE paid = FALSE AND active = TRUE AND created_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?
        .rows_affected();
        debug!(cancelled, "swept unpaid bookings past the grace window");
        Ok(cancelled)
    }

    async fn get(&self, id: BookingId) -> Result<Booking, Error> {
        let booking = sqlx::query_as("SELECT * FROM agri.bookings WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn list_farmer_bookings(
        &self,
        farmer_id: FarmerId,
        page: &Pagination,
    ) -> Result<Vec<Booking>, Error> {
        let (limit, offset) = page.normalized();
        let bookings = sqlx::query_as(
            "SELECT * FROM agri.bookings WHERE farmer_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(farmer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn list_facility_bookings(
        &self,
        operator_id: OperatorId,
        page: &Pagination,
    ) -> Result<Vec<Booking>, Error> {
        let (limit, offset) = page.normalized();
        let bookings = sqlx::query_as(
            "SELECT b.* FROM agri.bookings b JOIN agri.facilities f ON f.id = b.facility_id WHERE f.operator_id = $1 ORDER BY b.created_at DESC, b.id DESC LIMIT $2 OFFSET $3",
        )
        .bind(operator_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn filter_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, Error> {
        let (limit, offset) = filter.pagination.normalized();
        let mut query =
            sqlx::QueryBuilder::<sqlx::Postgres>::new("SELECT * FROM agri.bookings WHERE TRUE");
        if let Some(farmer_id) = filter.farmer_id {
            query.push(" AND farmer_id = ").push_bind(farmer_id);
        }
        if let Some(facility_id) = filter.facility_id {
            query.push(" AND facility_id = ").push_bind(facility_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(active) = filter.active {
            query.push(" AND active = ").push_bind(active);
        }
        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let bookings = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(bookings)
    }

    async fn is_available(
        &self,
        facility_id: FacilityId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<BookingId>,
    ) -> Result<bool, Error> {
        validate_timespan(start, end)?;
        // && on tstzrange gives the half-open overlap semantics: touching
        // windows do not conflict
        let taken: bool = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM agri.bookings WHERE facility_id = $1 AND active AND timespan && $2 AND ($3::BIGINT IS NULL OR id <> $3))",
        )
        .bind(facility_id)
        .bind(timespan_to_range(start, end))
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?
        .get(0);
        Ok(!taken)
    }
}

impl BookingManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_facility(&self, id: FacilityId) -> Result<Facility, Error> {
        sqlx::query_as("SELECT * FROM agri.facilities WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => Error::FacilityNotFound(id),
                e => e.into(),
            })
    }

    pub async fn get_farmer(&self, id: FarmerId) -> Result<Farmer, Error> {
        sqlx::query_as("SELECT * FROM agri.farmers WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => Error::FarmerNotFound(id),
                e => e.into(),
            })
    }

    /// resolve the auth layer's account id to the farmer it belongs to
    pub async fn get_farmer_by_user(&self, user_id: &str) -> Result<Farmer, Error> {
        let farmer = sqlx::query_as("SELECT * FROM agri.farmers WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(farmer)
    }
}
