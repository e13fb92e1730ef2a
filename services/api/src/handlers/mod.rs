use serde::Deserialize;

use foodgram_domain::pagination::PageRequest;

pub mod auth;
pub mod extract;
pub mod ingredient;
pub mod mark;
pub mod recipe;
pub mod shopping_cart;
pub mod subscription;
pub mod tag;
pub mod user;

/// `?page=&limit=` for paginated lists.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::from_query(self.page, self.limit)
    }
}

/// Query-string booleans: `1` and `true` switch a filter on.
pub(crate) fn query_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}
