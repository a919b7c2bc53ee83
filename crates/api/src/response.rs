//! Response envelopes shared by handlers.
//!
//! Every JSON response is wrapped as `{ "data": ... }`. Admin lists wrap
//! their rows in a [`Page`] inside that envelope.

use serde::Serialize;

use masterclass_core::search::page_count;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of an admin list.
///
/// Filters are applied to the fetched page, so `items` may be shorter than
/// `limit`; `total` and `page_count` describe the unfiltered table.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub page_count: i64,
}

impl<T: Serialize> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
            page_count: page_count(total, limit),
        }
    }
}
