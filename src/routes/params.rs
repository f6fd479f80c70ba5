use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;
/// OFFSET is a signed bigint in Postgres.
const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, starting at 1.
    pub page: Option<u64>,
    /// Items per page, 1 to 100.
    pub per_page: Option<u64>,
}

/// A normalized page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub per_page: u64,
    pub offset: u64,
}

impl Pagination {
    /// Pages past the last addressable offset are pulled back to it, so the window always
    /// fits a bigint and simply comes back empty.
    pub fn normalize(&self) -> Page {
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let number = self
            .page
            .unwrap_or(1)
            .clamp(1, MAX_OFFSET / per_page + 1);
        Page {
            number,
            per_page,
            offset: (number - 1) * per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = Pagination::default().normalize();
        assert_eq!(
            page,
            Page {
                number: 1,
                per_page: 20,
                offset: 0
            }
        );
    }

    #[test]
    fn clamps_out_of_range_values() {
        let page = Pagination {
            page: Some(0),
            per_page: Some(1000),
        }
        .normalize();
        assert_eq!(page.number, 1);
        assert_eq!(page.per_page, 100);

        let page = Pagination {
            page: Some(3),
            per_page: Some(0),
        }
        .normalize();
        assert_eq!(page.per_page, 1);
        assert_eq!(page.offset, 2);
    }

    #[test]
    fn huge_page_keeps_offset_within_bigint() {
        let page = Pagination {
            page: Some(u64::MAX / 10),
            per_page: Some(20),
        }
        .normalize();
        assert!(page.offset <= i64::MAX as u64);
        assert!(i64::try_from(page.offset).is_ok());
        assert_eq!(page.number, i64::MAX as u64 / 20 + 1);

        for per_page in [1, 7, 100] {
            let page = Pagination {
                page: Some(u64::MAX),
                per_page: Some(per_page),
            }
            .normalize();
            assert!(i64::try_from(page.offset).is_ok(), "per_page={per_page}");
        }
    }
}
