use crate::error::Result;
use crate::params::Params;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// Offset/limit window for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub offset: u32,
    pub limit: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl Paging {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self { offset, limit }
    }
}

impl From<Paging> for Params {
    fn from(paging: Paging) -> Self {
        Params::new()
            .set("offset", paging.offset)
            .set("limit", paging.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: Option<u32>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// The `{ "data": [...], "paging": {...} }` envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub paging: Option<PageInfo>,
}

impl<T: DeserializeOwned> PagedResponse<T> {
    pub fn from_body(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl<T> PagedResponse<T> {
    pub fn has_next(&self) -> bool {
        match &self.paging {
            Some(PageInfo {
                total: Some(total),
                offset: Some(offset),
                limit: Some(limit),
            }) => offset.checked_add(*limit).is_some_and(|end| end < *total),
            _ => false,
        }
    }

    pub fn next_offset(&self) -> Option<u32> {
        if !self.has_next() {
            return None;
        }

        match &self.paging {
            Some(PageInfo {
                offset: Some(offset),
                limit: Some(limit),
                ..
            }) => offset.checked_add(*limit),
            _ => None,
        }
    }
}

/// Walks a list endpoint page by page.
///
/// `fetch` receives the window to request and returns the raw body. Stops on
/// the last page, on an empty page, or once `max_items` items are gathered.
/// Each request advances by `page_size` from the previous requested offset,
/// whatever window the server reports back.
pub async fn collect_pages<T, F, Fut>(
    page_size: u32,
    max_items: Option<usize>,
    fetch: F,
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: Fn(Paging) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut all_items = Vec::new();
    let mut offset = 0;

    loop {
        debug!(offset, limit = page_size, "Fetching page");
        let body = fetch(Paging::new(offset, page_size)).await?;
        let page = PagedResponse::<T>::from_body(&body)?;
        let item_count = page.data.len();
        let more = page.has_next();

        all_items.extend(page.data);

        if let Some(max) = max_items {
            if all_items.len() >= max {
                all_items.truncate(max);
                break;
            }
        }

        match offset.checked_add(page_size) {
            Some(next) if more && item_count > 0 && next > offset => offset = next,
            _ => break,
        }
    }

    debug!(total_items = all_items.len(), "Finished pagination");
    Ok(all_items)
}
