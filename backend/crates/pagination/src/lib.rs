//! Page-number pagination primitives shared by backend endpoints.
//!
//! Endpoints accept a [`PageParams`] query, validate it into a
//! [`PageRequest`], and wrap the resulting slice of items in a
//! [`Paginated`] envelope alongside the total item count.
//!
//! Pages are 1-based. The item offset for a request is
//! `(page - 1) * limit`, computed in `u64` so it never overflows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised while building a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Page numbers start at 1.
    #[error("page must be at least 1")]
    ZeroPage,
    /// A page must hold at least one item.
    #[error("limit must be at least 1")]
    ZeroLimit,
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}, got {actual}")]
    LimitTooLarge {
        /// Maximum accepted page size.
        max: u32,
        /// Page size supplied by the caller.
        actual: u32,
    },
}

/// Validated 1-based page request.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 20).expect("valid page");
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PageParams", into = "PageParams")]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` or `limit` is zero, or when
    /// `limit` exceeds [`MAX_LIMIT`].
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                max: MAX_LIMIT,
                actual: limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Raw query parameters for a paginated endpoint.
///
/// Missing values fall back to page 1 and [`DEFAULT_LIMIT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    /// Requested 1-based page number.
    pub page: Option<u32>,
    /// Requested page size.
    pub limit: Option<u32>,
}

impl TryFrom<PageParams> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: PageParams) -> Result<Self, Self::Error> {
        Self::new(
            value.page.unwrap_or(1),
            value.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

impl From<PageRequest> for PageParams {
    fn from(value: PageRequest) -> Self {
        Self {
            page: Some(value.page),
            limit: Some(value.limit),
        }
    }
}

/// One page of items together with the paging metadata clients need.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, Paginated};
///
/// let request = PageRequest::new(2, 2).expect("valid page");
/// let page = Paginated::new(vec!["c", "d"], request, 5);
/// assert_eq!(page.total_pages(), 3);
/// assert!(page.has_next());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    items: Vec<T>,
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
}

impl<T> Paginated<T> {
    /// Wrap `items` as the page described by `request` out of `total` items.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            page: request.page(),
            limit: request.limit(),
            total,
            total_pages: total.div_ceil(u64::from(request.limit())),
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the envelope and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of pages needed to hold [`Self::total`] items.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 3, 12)]
    fn offset_counts_preceding_items(#[case] page: u32, #[case] limit: u32, #[case] offset: u64) {
        let request = PageRequest::new(page, limit).expect("valid request");
        assert_eq!(request.offset(), offset);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::ZeroLimit)]
    #[case(1, 101, PageRequestError::LimitTooLarge { max: MAX_LIMIT, actual: 101 })]
    fn rejects_invalid_requests(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    fn missing_params_use_defaults() {
        let request = PageRequest::try_from(PageParams::default()).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.limit(), DEFAULT_LIMIT);
    }

    #[rstest]
    fn deserialises_from_query_shape() {
        let request: PageRequest =
            serde_json::from_str(r#"{"page":4,"limit":25}"#).expect("valid json");
        assert_eq!(request.page(), 4);
        assert_eq!(request.offset(), 75);
    }

    #[rstest]
    fn deserialisation_applies_validation() {
        let result: Result<PageRequest, _> = serde_json::from_str(r#"{"page":0}"#);
        assert!(result.is_err());
    }

    #[rstest]
    #[case(0, 0, false)]
    #[case(10, 1, false)]
    #[case(11, 2, true)]
    fn total_pages_round_up(#[case] total: u64, #[case] pages: u64, #[case] has_next: bool) {
        let request = PageRequest::new(1, 10).expect("valid request");
        let page = Paginated::new(Vec::<u8>::new(), request, total);
        assert_eq!(page.total_pages(), pages);
        assert_eq!(page.has_next(), has_next);
    }

    #[rstest]
    fn map_keeps_metadata() {
        let request = PageRequest::new(2, 2).expect("valid request");
        let page = Paginated::new(vec![1, 2], request, 4).map(|n| n * 10);
        assert_eq!(page.items(), &[10, 20]);
        assert_eq!(page.page(), 2);
        assert_eq!(page.total(), 4);
    }

    #[rstest]
    fn serialises_camel_case_metadata() {
        let request = PageRequest::new(1, 5).expect("valid request");
        let value = serde_json::to_value(Paginated::new(vec!["a"], request, 6))
            .expect("serialisable page");
        assert_eq!(value["totalPages"], 2);
        assert_eq!(value["items"][0], "a");
    }
}
