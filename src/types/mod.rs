//! Shared request and response types.

mod pagination;

pub use pagination::{Paginated, PaginationMeta, PaginationParams, UserPage};
