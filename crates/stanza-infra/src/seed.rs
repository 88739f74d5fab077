//! Demo fixtures - bulk data for test/demo environments.

use rand::Rng;

use stanza_core::domain::{NewCategory, NewPost};
use stanza_core::error::RepoError;
use stanza_core::ports::{CategoryRepository, PostRepository};

/// Category names created by the seeder.
pub const SEED_CATEGORIES: [&str; 8] = [
    "Tech", "Science", "Culture", "Sports", "Travel", "Food", "Music", "Politics",
];

/// Number of posts created by the seeder.
pub const SEED_POST_COUNT: usize = 40;

const SEED_BODY: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis \
nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.";

/// Bulk-create the demo data set: 8 categories and 40 posts, each post
/// attached to a randomly chosen category. Skips seeding when categories
/// already exist, so restarting a seeded server does not duplicate data.
pub async fn seed_demo_data(
    categories: &dyn CategoryRepository,
    posts: &dyn PostRepository,
) -> Result<(), RepoError> {
    if !categories.list().await?.is_empty() {
        tracing::info!("Demo data already present, skipping seed");
        return Ok(());
    }

    let mut created = Vec::with_capacity(SEED_CATEGORIES.len());
    for name in SEED_CATEGORIES {
        created.push(
            categories
                .insert(NewCategory {
                    name: name.to_string(),
                })
                .await?,
        );
    }

    let mut rng = rand::thread_rng();
    for i in 1..=SEED_POST_COUNT {
        let category = &created[rng.gen_range(0..created.len())];
        posts
            .insert(NewPost {
                title: format!("Post {i}"),
                body: format!("{SEED_BODY} ({i})"),
                category_id: category.id,
            })
            .await?;
    }

    tracing::info!(
        categories = SEED_CATEGORIES.len(),
        posts = SEED_POST_COUNT,
        "Seeded demo data"
    );
    Ok(())
}
