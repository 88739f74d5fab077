//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

use stanza_core::domain::{Category, NewCategory, NewPost, Post};
use stanza_core::error::RepoError;
use stanza_core::ports::{
    CategoryRepository, PageRequest, Paged, PostFilter, PostRepository, SortOrder,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn insert(&self, category: NewCategory) -> Result<Category, RepoError> {
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(category.name),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(Category {
            id: model.id,
            name: model.name,
            posts: Vec::new(),
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, RepoError> {
        let Some(model) = self.find_model_by_id(id).await? else {
            return Ok(None);
        };

        let post_ids: Vec<i32> = PostEntity::find()
            .filter(post::Column::CategoryId.eq(id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|post| post.id)
            .collect();

        Ok(Some(Category {
            id: model.id,
            name: model.name,
            posts: post_ids,
        }))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let models = CategoryEntity::find()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let memberships = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut by_category: HashMap<i32, Vec<i32>> = HashMap::new();
        for post in memberships {
            by_category.entry(post.category_id).or_default().push(post.id);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let posts = by_category.remove(&model.id).unwrap_or_default();
                Category {
                    id: model.id,
                    name: model.name,
                    posts,
                }
            })
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        // FK cascade removes the category's posts with it.
        self.delete_by_id(id).await
    }

    async fn remove_post(&self, category_id: i32, post_id: i32) -> Result<(), RepoError> {
        // A detached post has no owner left, so the row is deleted outright
        // (orphan removal). The ownership filter doubles as the stale guard:
        // a post already reassigned to another category is left untouched.
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(post_id))
            .filter(post::Column::CategoryId.eq(category_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        tracing::debug!(post_id, category_id, "Removed orphaned post");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            title: Set(post.title),
            body: Set(post.body),
            category_id: Set(post.category_id),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.find_model_by_id(id).await?.map(Into::into))
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let category_id = post
            .category_id
            .ok_or_else(|| RepoError::Constraint("post requires a category".to_string()))?;

        let model = post::ActiveModel {
            id: Set(post.id),
            title: Set(post.title),
            body: Set(post.body),
            category_id: Set(category_id),
        }
        .update(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.delete_by_id(id).await
    }

    async fn list(&self, filter: &PostFilter, page: PageRequest) -> Result<Paged<Post>, RepoError> {
        let mut query = PostEntity::find();

        if let Some(title) = &filter.title {
            query = query.filter(Expr::col(post::Column::Title).ilike(format!("%{title}%")));
        }
        if let Some(body) = &filter.body {
            query = query.filter(Expr::col(post::Column::Body).ilike(format!("%{body}%")));
        }
        if let Some(name) = &filter.category_name {
            query = query
                .join(JoinType::InnerJoin, post::Relation::Category.def())
                .filter(Expr::col(category::Column::Name).ilike(format!("%{name}%")));
        }

        query = match filter.order_id.unwrap_or(SortOrder::Asc) {
            SortOrder::Asc => query.order_by_asc(post::Column::Id),
            SortOrder::Desc => query.order_by_desc(post::Column::Id),
        };

        let paginator = query.paginate(&self.db, page.per_page);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(map_db_err)?;
        let models = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Paged {
            items: models.into_iter().map(Into::into).collect(),
            page: page.page,
            per_page: page.per_page,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    async fn find_by_category_id(&self, category_id: i32) -> Result<Vec<Post>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
