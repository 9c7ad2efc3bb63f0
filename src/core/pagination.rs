use serde::Serialize;

use crate::core::{AppError, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Validated `page` / `limit` pair taken from a list query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Result<Self> {
        if page < 1 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if limit < 1 || limit > MAX_LIMIT {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        Ok(Self { page, limit })
    }

    fn offset(&self) -> usize {
        ((self.page - 1) as usize) * self.limit as usize
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub items_per_page: u32,
}

/// One page of a filtered listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Slice an already filtered and ordered collection
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let total_items = items.len();
        let limit = request.limit as usize;
        let total_pages = total_items.div_ceil(limit) as u32;

        let items = items
            .into_iter()
            .skip(request.offset())
            .take(limit)
            .collect();

        Self {
            items,
            pagination: Pagination {
                current_page: request.page,
                total_pages,
                total_items,
                items_per_page: request.limit,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
