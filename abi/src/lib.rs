mod config;
mod error;
mod types;
mod utils;

pub use config::*;
pub use error::{BookingConflict, BookingConflictInfo, BookingWindow, Error, ErrorKind};
pub use types::*;
pub use utils::*;

pub type BookingId = i64;
pub type FacilityId = i64;
pub type FarmerId = i64;
pub type OperatorId = i64;
/// opaque account id handed to us by the (external) auth layer
pub type UserId = String;
