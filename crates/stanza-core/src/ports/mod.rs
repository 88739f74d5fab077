//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod repository;

pub use repository::{
    CategoryRepository, DEFAULT_PAGE_SIZE, PageRequest, Paged, PostFilter, PostRepository,
    SortOrder,
};
