//! In-memory repositories - used as fallback when no database is configured.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use stanza_core::domain::{Category, NewCategory, NewPost, Post};
use stanza_core::error::RepoError;
use stanza_core::ports::{
    CategoryRepository, PageRequest, Paged, PostFilter, PostRepository, SortOrder,
};

#[derive(Default)]
struct Store {
    categories: RwLock<HashMap<i32, String>>,
    posts: RwLock<HashMap<i32, Post>>,
    next_category_id: AtomicI32,
    next_post_id: AtomicI32,
}

/// In-memory store implementing both repository ports.
///
/// Backs the server when `DATABASE_URL` is not set, and the handler tests.
/// Ids are handed out by an atomic counter, mimicking the database's
/// auto-increment keys. Note: data is lost on process restart.
#[derive(Clone)]
pub struct InMemoryRepository {
    store: Arc<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Store {
                next_category_id: AtomicI32::new(1),
                next_post_id: AtomicI32::new(1),
                ..Store::default()
            }),
        }
    }

    async fn category_post_ids(&self, category_id: i32) -> Vec<i32> {
        let posts = self.store.posts.read().await;
        let mut ids: Vec<i32> = posts
            .values()
            .filter(|post| post.category_id == Some(category_id))
            .map(|post| post.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError> {
        let id = self.store.next_category_id.fetch_add(1, Ordering::Relaxed);
        self.store
            .categories
            .write()
            .await
            .insert(id, category.name.clone());

        Ok(Category {
            id,
            name: category.name,
            posts: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepoError> {
        let name = match self.store.categories.read().await.get(&id) {
            Some(name) => name.clone(),
            None => return Ok(None),
        };

        Ok(Some(Category {
            id,
            name,
            posts: self.category_post_ids(id).await,
        }))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let names: Vec<(i32, String)> = {
            let categories = self.store.categories.read().await;
            let mut entries: Vec<(i32, String)> = categories
                .iter()
                .map(|(id, name)| (*id, name.clone()))
                .collect();
            entries.sort_unstable_by_key(|(id, _)| *id);
            entries
        };

        let mut result = Vec::with_capacity(names.len());
        for (id, name) in names {
            result.push(Category {
                id,
                name,
                posts: self.category_post_ids(id).await,
            });
        }
        Ok(result)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        if self.store.categories.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }

        // Mirror the FK cascade: the category's posts go with it.
        self.store
            .posts
            .write()
            .await
            .retain(|_, post| post.category_id != Some(id));
        Ok(())
    }

    async fn remove_post(&self, category_id: i32, post_id: i32) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        match posts.get(&post_id) {
            // Detached from its only owner: orphan removal deletes the row.
            Some(post) if post.category_id == Some(category_id) => {
                posts.remove(&post_id);
                Ok(())
            }
            // Already owned elsewhere (or never here): nothing to remove.
            _ => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        if !self
            .store
            .categories
            .read()
            .await
            .contains_key(&post.category_id)
        {
            return Err(RepoError::Constraint(
                "referenced category does not exist".to_string(),
            ));
        }

        let id = self.store.next_post_id.fetch_add(1, Ordering::Relaxed);
        let post = Post {
            id,
            title: post.title,
            body: post.body,
            category_id: Some(post.category_id),
        };
        self.store.posts.write().await.insert(id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.store.posts.read().await.get(&id).cloned())
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let category_id = post
            .category_id
            .ok_or_else(|| RepoError::Constraint("post requires a category".to_string()))?;

        if !self
            .store
            .categories
            .read()
            .await
            .contains_key(&category_id)
        {
            return Err(RepoError::Constraint(
                "referenced category does not exist".to_string(),
            ));
        }

        let mut posts = self.store.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        if self.store.posts.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Paged<Post>, RepoError> {
        let categories = self.store.categories.read().await;
        let posts = self.store.posts.read().await;

        let mut matched: Vec<Post> = posts
            .values()
            .filter(|post| {
                let title_ok = filter
                    .title
                    .as_ref()
                    .is_none_or(|needle| contains_ci(&post.title, needle));
                let body_ok = filter
                    .body
                    .as_ref()
                    .is_none_or(|needle| contains_ci(&post.body, needle));
                let category_ok = filter.category_name.as_ref().is_none_or(|needle| {
                    post.category_id
                        .and_then(|id| categories.get(&id))
                        .is_some_and(|name| contains_ci(name, needle))
                });
                title_ok && body_ok && category_ok
            })
            .cloned()
            .collect();

        match filter.order_id.unwrap_or(SortOrder::Asc) {
            SortOrder::Asc => matched.sort_unstable_by_key(|post| post.id),
            SortOrder::Desc => matched.sort_unstable_by_key(|post| std::cmp::Reverse(post.id)),
        }

        let total_items = matched.len() as u64;
        let total_pages = total_items.div_ceil(page.per_page);
        let items = matched
            .into_iter()
            .skip(((page.page - 1) * page.per_page) as usize)
            .take(page.per_page as usize)
            .collect();

        Ok(Paged {
            items,
            page: page.page,
            per_page: page.per_page,
            total_items,
            total_pages,
        })
    }

    async fn find_by_category_id(&self, category_id: i32) -> Result<Vec<Post>, RepoError> {
        let posts = self.store.posts.read().await;
        let mut matched: Vec<Post> = posts
            .values()
            .filter(|post| post.category_id == Some(category_id))
            .cloned()
            .collect();
        matched.sort_unstable_by_key(|post| post.id);
        Ok(matched)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_repo() -> (InMemoryRepository, Category, Category) {
        let repo = InMemoryRepository::new();
        let tech = CategoryRepository::insert(
            &repo,
            NewCategory {
                name: "Tech".to_string(),
            },
        )
        .await
        .unwrap();
        let science = CategoryRepository::insert(
            &repo,
            NewCategory {
                name: "Science".to_string(),
            },
        )
        .await
        .unwrap();
        (repo, tech, science)
    }

    fn new_post(title: &str, category_id: i32) -> NewPost {
        NewPost {
            title: title.to_string(),
            body: format!("body of {title}"),
            category_id,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let (repo, tech, _) = seeded_repo().await;

        let first = PostRepository::insert(&repo, new_post("first", tech.id))
            .await
            .unwrap();
        let second = PostRepository::insert(&repo, new_post("second", tech.id))
            .await
            .unwrap();

        assert_eq!(second.id, first.id + 1);
        assert_eq!(first.category_id, Some(tech.id));
    }

    #[tokio::test]
    async fn insert_rejects_unknown_category() {
        let (repo, _, _) = seeded_repo().await;

        let err = PostRepository::insert(&repo, new_post("stray", 999))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn category_lookup_collects_its_post_ids() {
        let (repo, tech, science) = seeded_repo().await;
        let a = PostRepository::insert(&repo, new_post("a", tech.id))
            .await
            .unwrap();
        PostRepository::insert(&repo, new_post("b", science.id))
            .await
            .unwrap();
        let c = PostRepository::insert(&repo, new_post("c", tech.id))
            .await
            .unwrap();

        let found = CategoryRepository::find_by_id(&repo, tech.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.posts, vec![a.id, c.id]);
    }

    #[tokio::test]
    async fn list_filters_by_title_case_insensitively() {
        let (repo, tech, _) = seeded_repo().await;
        PostRepository::insert(&repo, new_post("Rust ownership", tech.id))
            .await
            .unwrap();
        PostRepository::insert(&repo, new_post("Gardening", tech.id))
            .await
            .unwrap();

        let filter = PostFilter {
            title: Some("rust".to_string()),
            ..PostFilter::default()
        };
        let page = PostRepository::list(&repo, &filter, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].title, "Rust ownership");
    }

    #[tokio::test]
    async fn list_filters_by_category_name() {
        let (repo, tech, science) = seeded_repo().await;
        PostRepository::insert(&repo, new_post("a", tech.id))
            .await
            .unwrap();
        PostRepository::insert(&repo, new_post("b", science.id))
            .await
            .unwrap();

        let filter = PostFilter {
            category_name: Some("sci".to_string()),
            ..PostFilter::default()
        };
        let page = PostRepository::list(&repo, &filter, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].title, "b");
    }

    #[tokio::test]
    async fn list_paginates_and_orders_by_id() {
        let (repo, tech, _) = seeded_repo().await;
        for i in 0..10 {
            PostRepository::insert(&repo, new_post(&format!("post {i}"), tech.id))
                .await
                .unwrap();
        }

        let first = PostRepository::list(&repo, &PostFilter::default(), PageRequest::new(1, 8))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.total_items, 10);
        assert_eq!(first.total_pages, 2);

        let second = PostRepository::list(&repo, &PostFilter::default(), PageRequest::new(2, 8))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
        assert!(second.items[0].id > first.items[7].id);

        let filter = PostFilter {
            order_id: Some(SortOrder::Desc),
            ..PostFilter::default()
        };
        let newest = PostRepository::list(&repo, &filter, PageRequest::new(1, 8))
            .await
            .unwrap();
        assert_eq!(newest.items[0].id, 10);
    }

    #[tokio::test]
    async fn remove_post_deletes_the_orphan() {
        let (repo, tech, _) = seeded_repo().await;
        let post = PostRepository::insert(&repo, new_post("doomed", tech.id))
            .await
            .unwrap();

        CategoryRepository::remove_post(&repo, tech.id, post.id)
            .await
            .unwrap();

        assert!(
            PostRepository::find_by_id(&repo, post.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn remove_post_leaves_a_reassigned_post_alone() {
        let (repo, tech, science) = seeded_repo().await;
        let mut post = PostRepository::insert(&repo, new_post("moved", tech.id))
            .await
            .unwrap();

        post.category_id = Some(science.id);
        PostRepository::update(&repo, post.clone()).await.unwrap();

        // Stale removal: the post now belongs to Science.
        let err = CategoryRepository::remove_post(&repo, tech.id, post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));

        let kept = PostRepository::find_by_id(&repo, post.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.category_id, Some(science.id));
    }

    #[tokio::test]
    async fn deleting_a_category_cascades_to_its_posts() {
        let (repo, tech, science) = seeded_repo().await;
        let doomed = PostRepository::insert(&repo, new_post("doomed", tech.id))
            .await
            .unwrap();
        let kept = PostRepository::insert(&repo, new_post("kept", science.id))
            .await
            .unwrap();

        CategoryRepository::delete(&repo, tech.id).await.unwrap();

        assert!(
            PostRepository::find_by_id(&repo, doomed.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            PostRepository::find_by_id(&repo, kept.id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
