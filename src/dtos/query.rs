use crate::storage::Page;
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Query string of the paged list endpoint. Both parameters are optional;
/// `page` is zero-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListPageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl ListPageQuery {
    pub fn into_page(self) -> Page {
        Page {
            page: self.page.unwrap_or(0),
            size: self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}
