use serde::{Deserialize, Serialize};

use super::post::Post;

/// Category entity - a named grouping of posts.
///
/// Posts are held as ids rather than owned values; the membership list and
/// each post's back reference are kept in agreement by [`Category::add_post`]
/// and [`Category::remove_post`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub posts: Vec<i32>,
}

/// A category that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl Category {
    /// Attach a post, keeping both sides of the link in agreement.
    /// Calling twice with the same post has no additional effect.
    pub fn add_post(&mut self, post: &mut Post) {
        if !self.posts.contains(&post.id) {
            self.posts.push(post.id);
            post.category_id = Some(self.id);
        }
    }

    /// Detach a post. The back reference is cleared only while it still
    /// points at this category, so a post that was reassigned elsewhere
    /// keeps its new owner even if a stale removal arrives afterwards.
    pub fn remove_post(&mut self, post: &mut Post) {
        if let Some(idx) = self.posts.iter().position(|id| *id == post.id) {
            self.posts.remove(idx);
            if post.category_id == Some(self.id) {
                post.category_id = None;
            }
        }
    }
}
