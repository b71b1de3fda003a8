//! Shared utilities and types for feature modules

pub mod pagination;

// Re-export commonly used types
pub use pagination::{Paginated, PaginationError, PaginationMetadata, PaginationParams};
