//! Data Transfer Objects - request/response types for the API.
//!
//! The read types mirror the two serialization shapes of a post: list views
//! carry a bounded `summary` instead of the body, item views carry the full
//! body. Write types declare their required fields via [`validate`].

use serde::{Deserialize, Serialize};

use crate::response::Violation;

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub category_id: Option<i32>,
}

/// Request to partially update a post. Absent fields keep their stored
/// value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<i32>,
}

impl CreatePostRequest {
    /// Every violated constraint, empty when the request is acceptable.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.title.trim().is_empty() {
            violations.push(Violation::new("title", "must not be blank"));
        }
        if self.body.trim().is_empty() {
            violations.push(Violation::new("body", "must not be blank"));
        }
        if self.category_id.is_none() {
            violations.push(Violation::new("category", "is required"));
        }
        violations
    }
}

impl UpdatePostRequest {
    /// Provided fields must still satisfy their constraints; absent fields
    /// are not checked.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            violations.push(Violation::new("title", "must not be blank"));
        }
        if matches!(&self.body, Some(body) if body.trim().is_empty()) {
            violations.push(Violation::new("body", "must not be blank"));
        }
        violations
    }
}

/// The category fields embedded in a post response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
}

/// A post as it appears in collection listings: summary, no body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub category: CategoryRef,
}

/// A post as it appears in item views: full body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetail {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub category: CategoryRef,
}

/// A category in collection listings; posts as ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub posts: Vec<i32>,
}

/// A category item view with its posts in list projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub id: i32,
    pub name: String,
    pub posts: Vec<PostListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_reports_every_missing_field() {
        let request = CreatePostRequest {
            title: "  ".to_owned(),
            body: String::new(),
            category_id: None,
        };

        let violations = request.validate();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "body", "category"]);
    }

    #[test]
    fn create_request_with_all_fields_passes() {
        let request = CreatePostRequest {
            title: "Hello".to_owned(),
            body: "Some body".to_owned(),
            category_id: Some(1),
        };
        assert!(request.validate().is_empty());
    }

    #[test]
    fn update_request_ignores_absent_fields() {
        assert!(UpdatePostRequest::default().validate().is_empty());
    }

    #[test]
    fn update_request_rejects_blank_provided_fields() {
        let request = UpdatePostRequest {
            title: Some("   ".to_owned()),
            body: None,
            category_id: None,
        };

        let violations = request.validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "title");
    }

    #[test]
    fn list_item_serializes_summary_without_body() {
        let item = PostListItem {
            id: 1,
            title: "Hello".to_owned(),
            summary: "preview[...]".to_owned(),
            category: CategoryRef {
                id: 2,
                name: "Tech".to_owned(),
            },
        };

        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("body").is_none());
        assert_eq!(json["summary"], "preview[...]");
        assert_eq!(json["category"]["name"], "Tech");
    }
}
