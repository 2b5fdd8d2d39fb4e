//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::UserResponse;

/// Pagination query parameters (1-indexed pages)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    /// Items per page, capped at 100
    #[serde(default = "default_per_page")]
    #[param(default = 20, maximum = 100)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Get limit capped at maximum
    pub fn limit(&self) -> u64 {
        self.per_page.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(UserPage = Paginated<UserResponse>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_capped() {
        let params = PaginationParams {
            page: 3,
            per_page: 500,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 1, 2, 5);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(Paginated::<i32>::new(vec![], 1, 0, 5).meta.total_pages, 0);
    }
}
