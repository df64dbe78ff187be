//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use crate::pagination::{Page, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use zine_common::{AppError, AppResult};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments on a post, newest first, paginated.
    pub async fn find_by_post_paged(
        &self,
        post_id: &str,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<comment::Model>> {
        let paginator = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_desc(comment::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn create_test_comment(id: &str, post_id: &str, text: &str) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            user_id: "u1".to_string(),
            post_id: post_id.to_string(),
            text: text.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let comment = create_test_comment("c1", "p1", "nice post");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment.clone()]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let result = repo.find_by_id("c1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().text, "nice post");
    }

    #[tokio::test]
    async fn test_find_by_post_paged() {
        let c1 = create_test_comment("c1", "p1", "first");
        let c2 = create_test_comment("c2", "p1", "second");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![btreemap! {
                    "num_items" => Into::<Value>::into(2i64),
                }]])
                .append_query_results([[c1, c2]])
                .into_connection(),
        );

        let repo = CommentRepository::new(db);
        let page = repo.find_by_post_paged("p1", None, 10).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 1);
    }
}
