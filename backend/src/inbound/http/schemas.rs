//! Response envelopes shared by paginated endpoints.
//!
//! [`pagination::Paginated`] stays free of OpenAPI concerns; handlers convert
//! it into [`PageResponse`], which documents the same JSON shape.

use pagination::Paginated;
use serde::Serialize;
use utoipa::ToSchema;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub limit: u32,
    /// Number of items across all pages.
    pub total: u64,
    pub total_pages: u64,
}

impl<T> From<Paginated<T>> for PageResponse<T> {
    fn from(value: Paginated<T>) -> Self {
        let page = value.page();
        let limit = value.limit();
        let total = value.total();
        let total_pages = value.total_pages();
        Self {
            items: value.into_items(),
            page,
            limit,
            total,
            total_pages,
        }
    }
}
