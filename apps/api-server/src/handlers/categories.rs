//! Category handlers - read-only listing and item views.

use actix_web::{HttpResponse, web};

use stanza_shared::dto::{CategoryDetail, CategoryRef, CategoryResponse, PostListItem};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;

    let items: Vec<CategoryResponse> = categories
        .into_iter()
        .map(|category| CategoryResponse {
            id: category.id,
            name: category.name,
            posts: category.posts,
        })
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

/// GET /api/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {} not found", id)))?;

    // The item view carries the posts in list projection: summary, no body.
    let reference = CategoryRef {
        id: category.id,
        name: category.name.clone(),
    };
    let posts: Vec<PostListItem> = state
        .posts
        .find_by_category_id(id)
        .await?
        .into_iter()
        .map(|post| PostListItem {
            id: post.id,
            summary: post.summary(),
            title: post.title,
            category: reference.clone(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(CategoryDetail {
        id: category.id,
        name: category.name,
        posts,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use stanza_core::domain::{NewCategory, NewPost};

    use crate::state::AppState;

    async fn state_with_tech_posts() -> AppState {
        let state = AppState::in_memory();
        let tech = state
            .categories
            .insert(NewCategory {
                name: "Tech".to_string(),
            })
            .await
            .unwrap();
        state
            .categories
            .insert(NewCategory {
                name: "Science".to_string(),
            })
            .await
            .unwrap();
        state
            .posts
            .insert(NewPost {
                title: "Hello".to_string(),
                body: "A".repeat(100),
                category_id: tech.id,
            })
            .await
            .unwrap();
        state
    }

    #[actix_rt::test]
    async fn list_returns_categories_with_post_ids() {
        let state = state_with_tech_posts().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Tech");
        assert_eq!(items[0]["posts"].as_array().unwrap().len(), 1);
        assert_eq!(items[1]["posts"].as_array().unwrap().len(), 0);
    }

    #[actix_rt::test]
    async fn item_view_embeds_posts_in_list_projection() {
        let state = state_with_tech_posts().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/categories/1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["name"], "Tech");
        let posts = body["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 1);
        // Nested posts are summarized, never carrying the full body.
        assert!(posts[0].get("body").is_none());
        assert_eq!(
            posts[0]["summary"],
            format!("{}{}", "A".repeat(70), "[...]")
        );
    }

    #[actix_rt::test]
    async fn unknown_category_is_a_problem_json_404() {
        let state = AppState::in_memory();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::handlers::configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/categories/999")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], 404);
        assert_eq!(body["title"], "Not Found");
    }
}
