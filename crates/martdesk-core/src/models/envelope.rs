use serde::{Deserialize, Serialize};

/// Default page size for product, order, employee and customer listings
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default page size for the inventory listing
pub const INVENTORY_PAGE_SIZE: u32 = 50;

/// `{"data": ...}` wrapper every endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pages: u32,
}

impl Pagination {
    /// Total pages, never less than one so "Page 1 of 1" renders for empty lists.
    pub fn total_pages(&self) -> u32 {
        self.pages.max(1)
    }

    pub fn has_next(&self, page: u32) -> bool {
        page < self.total_pages()
    }
}

/// Listing response: `{"data": [...], "pagination": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Self::default()
        }
    }

    /// Blank search strings are dropped rather than sent as `search=`
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub page: u32,
    pub limit: u32,
    pub low_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Default for InventoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: INVENTORY_PAGE_SIZE,
            low_stock: false,
            search: None,
            category: None,
        }
    }
}
