use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::{BookingStatus, FacilityId, FarmerId};

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// (limit, offset) with out-of-range values pulled back to sane bounds
    pub fn normalized(&self) -> (i64, i64) {
        let page = self.page.max(1);
        let page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        (page_size, (page - 1) * page_size)
    }
}

/// every supported booking-list filter, spelled out; replaces the dynamic
/// filter objects the HTTP layer used to pass around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct BookingFilter {
    #[builder(setter(into, strip_option))]
    pub farmer_id: Option<FarmerId>,
    #[builder(setter(into, strip_option))]
    pub facility_id: Option<FacilityId>,
    #[builder(setter(into, strip_option))]
    pub status: Option<BookingStatus>,
    #[builder(setter(into, strip_option))]
    pub active: Option<bool>,
    pub pagination: Pagination,
}

impl Default for BookingFilter {
    fn default() -> Self {
        Self {
            farmer_id: None,
            facility_id: None,
            status: None,
            active: None,
            pagination: Pagination::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_first_page_of_ten() {
        assert_eq!(Pagination::default().normalized(), (10, 0));
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(Pagination::new(0, 0).normalized(), (1, 0));
        assert_eq!(Pagination::new(3, 1000).normalized(), (100, 200));
    }

    #[test]
    fn filter_builder_defaults_to_everything() {
        let filter = BookingFilterBuilder::default().build().unwrap();
        assert_eq!(filter, BookingFilter::default());
    }

    #[test]
    fn filter_builder_sets_fields() {
        let filter = BookingFilterBuilder::default()
            .farmer_id(7i64)
            .status(BookingStatus::Reserved)
            .active(true)
            .build()
            .unwrap();
        assert_eq!(filter.farmer_id, Some(7));
        assert_eq!(filter.status, Some(BookingStatus::Reserved));
        assert_eq!(filter.active, Some(true));
        assert_eq!(filter.facility_id, None);
    }
}
