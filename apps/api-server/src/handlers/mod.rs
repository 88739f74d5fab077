//! HTTP handlers and route configuration.

mod categories;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Category routes (read-only)
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("/{id}", web::get().to(categories::get)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::patch().to(posts::patch)),
            ),
    );
}
