mod conflict;

pub use conflict::{BookingConflict, BookingConflictInfo, BookingWindow};

use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

use crate::{BookingId, FacilityId, FarmerId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("database error")]
    DbError(sqlx::Error),

    #[error("failed to read configuration file")]
    ConfigRead,

    #[error("failed to parse configuration file")]
    ConfigParse,

    #[error("booking conflicts with an existing booking: {0:?}")]
    ConflictBooking(BookingConflictInfo),

    #[error("facility {facility_id} is already booked between {start} and {end}")]
    FacilityBooked {
        facility_id: FacilityId,
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    #[error("facility {0} is not open for booking")]
    FacilityUnavailable(FacilityId),

    #[error("facility {0} not found")]
    FacilityNotFound(FacilityId),

    #[error("farmer {0} not found")]
    FarmerNotFound(FarmerId),

    #[error("no booking found by the given condition")]
    NotFound,

    #[error("caller does not own booking {0}")]
    NotBookingOwner(BookingId),

    #[error("caller does not operate the facility of booking {0}")]
    NotFacilityOperator(BookingId),

    #[error("start date must be before end date")]
    InvalidTimespan,

    #[error("start date cannot be in the past")]
    StartDateInPast,

    #[error("amount cannot be negative")]
    NegativeAmount,

    #[error("invalid facility id {0}")]
    InvalidFacilityId(FacilityId),

    #[error("invalid farmer id {0}")]
    InvalidFarmerId(FarmerId),

    #[error("price per day must be positive")]
    InvalidPricePerDay,

    #[error("capacity must be a positive integer")]
    InvalidCapacity,

    #[error("cannot change booking dates after payment is completed")]
    PaidDatesImmutable(BookingId),

    #[error("booking {0} has not expired yet")]
    NotYetExpired(BookingId),

    #[error("booking {0} is already inactive")]
    AlreadyInactive(BookingId),

    #[error("booking {0} has already been paid")]
    AlreadyPaid(BookingId),
}

/// the stable buckets the transport layer maps onto status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DbError(_) | Error::ConfigRead | Error::ConfigParse => ErrorKind::Internal,
            Error::ConflictBooking(_)
            | Error::FacilityBooked { .. }
            | Error::FacilityUnavailable(_) => ErrorKind::Conflict,
            Error::FacilityNotFound(_) | Error::FarmerNotFound(_) | Error::NotFound => {
                ErrorKind::NotFound
            }
            Error::NotBookingOwner(_) | Error::NotFacilityOperator(_) => ErrorKind::Unauthorized,
            Error::InvalidTimespan
            | Error::StartDateInPast
            | Error::NegativeAmount
            | Error::InvalidFacilityId(_)
            | Error::InvalidFarmerId(_)
            | Error::InvalidPricePerDay
            | Error::InvalidCapacity
            | Error::PaidDatesImmutable(_)
            | Error::NotYetExpired(_)
            | Error::AlreadyInactive(_)
            | Error::AlreadyPaid(_) => ErrorKind::Validation,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Error::NotFound,
            sqlx::Error::Database(e) => {
                let err: &PgDatabaseError = e.downcast_ref();
                match (err.code(), err.schema(), err.table()) {
                    // exclusion_violation on the overlap constraint carries both
                    // windows in its detail string
                    ("23P01", Some("agri"), Some("bookings")) => {
                        let detail = err.detail().unwrap_or_default();
                        let info = detail
                            .parse()
                            .unwrap_or_else(|_| BookingConflictInfo::Unparsed(detail.to_string()));
                        Error::ConflictBooking(info)
                    }
                    _ => Error::DbError(sqlx::Error::Database(e)),
                }
            }
            _ => Error::DbError(e),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::DbError(a), Self::DbError(b)) => a.to_string() == b.to_string(),
            (Self::ConflictBooking(a), Self::ConflictBooking(b)) => a == b,
            (
                Self::FacilityBooked {
                    facility_id: f1,
                    start: s1,
                    end: e1,
                },
                Self::FacilityBooked {
                    facility_id: f2,
                    start: s2,
                    end: e2,
                },
            ) => f1 == f2 && s1 == s2 && e1 == e2,
            (Self::FacilityUnavailable(a), Self::FacilityUnavailable(b)) => a == b,
            (Self::FacilityNotFound(a), Self::FacilityNotFound(b)) => a == b,
            (Self::FarmerNotFound(a), Self::FarmerNotFound(b)) => a == b,
            (Self::NotBookingOwner(a), Self::NotBookingOwner(b)) => a == b,
            (Self::NotFacilityOperator(a), Self::NotFacilityOperator(b)) => a == b,
            (Self::InvalidFacilityId(a), Self::InvalidFacilityId(b)) => a == b,
            (Self::InvalidFarmerId(a), Self::InvalidFarmerId(b)) => a == b,
            (Self::PaidDatesImmutable(a), Self::PaidDatesImmutable(b)) => a == b,
            (Self::NotYetExpired(a), Self::NotYetExpired(b)) => a == b,
            (Self::AlreadyInactive(a), Self::AlreadyInactive(b)) => a == b,
            (Self::AlreadyPaid(a), Self::AlreadyPaid(b)) => a == b,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_the_taxonomy() {
        assert_eq!(Error::InvalidTimespan.kind(), ErrorKind::Validation);
        assert_eq!(Error::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(Error::FacilityNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(Error::FacilityUnavailable(7).kind(), ErrorKind::Conflict);
        assert_eq!(Error::NotBookingOwner(1).kind(), ErrorKind::Unauthorized);
        assert_eq!(Error::ConfigRead.kind(), ErrorKind::Internal);
        assert_eq!(
            Error::PaidDatesImmutable(1).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert_eq!(Error::from(sqlx::Error::RowNotFound), Error::NotFound);
    }
}
