use serde::{Deserialize, Serialize};

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    current_page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    pub const MAX_PAGE_SIZE: u32 = 100;

    pub fn new(current_page: u32, page_size: u32) -> Result<Self, DomainError> {
        if current_page == 0 {
            return Err(DomainError::InvalidInput(
                "Current page starts at 1".to_string(),
            ));
        }
        if page_size == 0 || page_size > Self::MAX_PAGE_SIZE {
            return Err(DomainError::InvalidInput(format!(
                "Page size must be between 1 and {}",
                Self::MAX_PAGE_SIZE
            )));
        }

        Ok(Self {
            current_page,
            page_size,
        })
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row offset of the first item on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub per_page: u32,
    pub current_page: u32,
    pub last_page: u32,
}

impl Pagination {
    pub fn new(request: PageRequest, total: u64) -> Self {
        let per_page = u64::from(request.page_size());
        let last_page = total.div_ceil(per_page).max(1);

        Self {
            total,
            per_page: request.page_size(),
            current_page: request.current_page(),
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
