//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post};
use crate::pagination::{Page, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};
use zine_common::{AppError, AppResult};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PostNotFound(id.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All posts, newest first, paginated.
    pub async fn find_all_paged(
        &self,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<post::Model>> {
        let paginator = Post::find()
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }

    /// Posts authored by a user, newest first, paginated.
    pub async fn find_by_user_paged(
        &self,
        user_id: &str,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<post::Model>> {
        let paginator = Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }

    /// Posts in a group, newest first, paginated.
    pub async fn find_by_group_paged(
        &self,
        group_id: &str,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<post::Model>> {
        let paginator = Post::find()
            .filter(post::Column::GroupId.eq(group_id))
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }

    /// Posts authored by any of the given users, newest first, paginated.
    ///
    /// Used for the personalized feed; an empty author set yields an empty
    /// first page without touching the database.
    pub async fn find_by_authors_paged(
        &self,
        author_ids: &[String],
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Page::empty());
        }

        let paginator = Post::find()
            .filter(post::Column::UserId.is_in(author_ids.to_vec()))
            .order_by_desc(post::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }

    /// Increment comments count atomically (single UPDATE query, no fetch).
    pub async fn increment_comments_count(&self, post_id: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::CommentsCount,
                Expr::col(post::Column::CommentsCount).add(1),
            )
            .filter(post::Column::Id.eq(post_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_post(id: &str, user_id: &str, text: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            group_id: None,
            text: text.to_string(),
            image_id: None,
            comments_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let post = create_test_post("p1", "u1", "hello");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post.clone()]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().text, "hello");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_paged_clamps_out_of_range_page() {
        let p1 = create_test_post("p1", "u1", "first");
        let p2 = create_test_post("p2", "u1", "second");

        // Paginator issues a COUNT query, then fetches the clamped page.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "num_items" => Into::<Value>::into(2i64),
                }]])
                .append_query_results([[p1, p2]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo.find_all_paged(Some(999), 10).await.unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_authors_paged_empty_authors() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres).into_connection(),
        );

        let repo = PostRepository::new(db);
        let page = repo.find_by_authors_paged(&[], None, 10).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
    }
}
