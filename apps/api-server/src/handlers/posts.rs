//! Post handlers - filtered listing, item view, create, patch.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use stanza_core::domain::{NewPost, Post};
use stanza_core::ports::{DEFAULT_PAGE_SIZE, PageRequest, PostFilter, SortOrder};
use stanza_shared::dto::{
    CategoryRef, CreatePostRequest, PostDetail, PostListItem, UpdatePostRequest,
};
use stanza_shared::response::Page;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters accepted by the post listing.
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_name: Option<String>,
    pub order_id: Option<String>,
}

/// GET /api/posts (supports ?page=2&title=rust&category_name=tech&order_id=desc)
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let order_id = match query.order_id.as_deref() {
        None => None,
        Some("asc") => Some(SortOrder::Asc),
        Some("desc") => Some(SortOrder::Desc),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "unknown order direction: {}",
                other
            )));
        }
    };

    let filter = PostFilter {
        title: query.title,
        body: query.body,
        category_name: query.category_name,
        order_id,
    };
    let page = PageRequest::new(query.page.unwrap_or(1), DEFAULT_PAGE_SIZE);

    let posts = state.posts.list(&filter, page).await?;

    let mut items = Vec::with_capacity(posts.items.len());
    for post in &posts.items {
        items.push(PostListItem {
            id: post.id,
            title: post.title.clone(),
            summary: post.summary(),
            category: category_ref(&state, post).await?,
        });
    }

    Ok(HttpResponse::Ok().json(Page {
        items,
        page: posts.page,
        per_page: posts.per_page,
        total_items: posts.total_items,
        total_pages: posts.total_pages,
    }))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;

    let category = category_ref(&state, &post).await?;

    Ok(HttpResponse::Ok().json(PostDetail {
        id: post.id,
        title: post.title,
        body: post.body,
        category,
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let violations = req.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }
    let category_id = req
        .category_id
        .ok_or_else(|| AppError::BadRequest("category is required".to_string()))?;

    let post = state
        .posts
        .insert(NewPost {
            title: req.title,
            body: req.body,
            category_id,
        })
        .await?;

    let category = category_ref(&state, &post).await?;

    Ok(HttpResponse::Created().json(PostDetail {
        id: post.id,
        title: post.title,
        body: post.body,
        category,
    }))
}

/// PATCH /api/posts/{id} - absent fields keep their stored value
pub async fn patch(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let violations = req.validate();
    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", id)))?;

    if let Some(title) = req.title {
        post.title = title;
    }
    if let Some(body) = req.body {
        post.body = body;
    }
    if let Some(category_id) = req.category_id {
        post.category_id = Some(category_id);
    }

    let post = state.posts.update(post).await?;
    let category = category_ref(&state, &post).await?;

    Ok(HttpResponse::Ok().json(PostDetail {
        id: post.id,
        title: post.title,
        body: post.body,
        category,
    }))
}

/// Resolve the category fields embedded in a post response. A persisted
/// post always has an owner; anything else is a data inconsistency.
async fn category_ref(state: &AppState, post: &Post) -> AppResult<CategoryRef> {
    let category_id = post
        .category_id
        .ok_or_else(|| AppError::Internal(format!("post {} has no category", post.id)))?;

    let category = state
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("category {} missing", category_id)))?;

    Ok(CategoryRef {
        id: category.id,
        name: category.name,
    })
}
