use async_trait::async_trait;

use crate::domain::{Category, NewCategory, NewPost, Post};
use crate::error::RepoError;

/// Items returned per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 8;

/// A page of results requested from a listing.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// A page of results plus the totals counted by the persistence layer.
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Ordering applied to the `id` column of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Criteria for a post listing. All criteria are optional, combined with
/// AND; string matches are case-insensitive partial matches.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_name: Option<String>,
    pub order_id: Option<SortOrder>,
}

/// Category repository. Ids are assigned by the backing store on insert.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError>;

    /// Find a category, with its post ids populated.
    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by id, post ids populated.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    /// Detach a post from a category. A post detached this way is left
    /// without an owner, so the store deletes the row (orphan removal).
    /// The category itself survives.
    async fn remove_post(&self, category_id: i32, post_id: i32) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError>;

    /// Persist changed fields of an already-stored post. The id must
    /// already exist; it is never reassigned here.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    /// Filtered, paginated listing.
    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Paged<Post>, RepoError>;

    /// All posts belonging to one category, ordered by id.
    async fn find_by_category_id(&self, category_id: i32) -> Result<Vec<Post>, RepoError>;
}
