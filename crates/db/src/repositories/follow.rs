//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use crate::pagination::{Page, fetch_page};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use zine_common::{AppError, AppResult};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a follow edge by follower and followee.
    pub async fn find_by_pair(
        &self,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Option<follow::Model>> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user is following another user.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        Ok(self.find_by_pair(follower_id, followee_id).await?.is_some())
    }

    /// Create a new follow edge.
    pub async fn create(&self, model: follow::ActiveModel) -> AppResult<follow::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a follow edge by pair. Returns whether an edge was removed.
    pub async fn delete_by_pair(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        let Some(edge) = self.find_by_pair(follower_id, followee_id).await? else {
            return Ok(false);
        };
        edge.delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }

    /// IDs of every user that `user_id` follows (for feed derivation).
    pub async fn followee_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(edges.into_iter().map(|f| f.followee_id).collect())
    }

    /// Edges pointing at `user_id` (their followers), newest first, paginated.
    pub async fn find_followers_paged(
        &self,
        user_id: &str,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<follow::Model>> {
        let paginator = Follow::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }

    /// Edges created by `user_id` (who they follow), newest first, paginated.
    pub async fn find_following_paged(
        &self,
        user_id: &str,
        page: Option<u64>,
        per_page: u64,
    ) -> AppResult<Page<follow::Model>> {
        let paginator = Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .paginate(self.db.as_ref(), per_page);

        fetch_page(&paginator, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_follow(id: &str, follower_id: &str, followee_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_pair_found() {
        let edge = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge.clone()]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let result = repo.find_by_pair("u1", "u2").await.unwrap();

        assert!(result.is_some());
        let found = result.unwrap();
        assert_eq!(found.follower_id, "u1");
        assert_eq!(found.followee_id, "u2");
    }

    #[tokio::test]
    async fn test_is_following_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        assert!(!repo.is_following("u1", "u3").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_pair_missing_edge_is_noop() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let deleted = repo.delete_by_pair("u1", "u2").await.unwrap();

        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_delete_by_pair_removes_edge() {
        let edge = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let deleted = repo.delete_by_pair("u1", "u2").await.unwrap();

        assert!(deleted);
    }

    #[tokio::test]
    async fn test_followee_ids() {
        let f1 = create_test_follow("f1", "u1", "u2");
        let f2 = create_test_follow("f2", "u1", "u3");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[f1, f2]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let ids = repo.followee_ids("u1").await.unwrap();

        assert_eq!(ids, vec!["u2".to_string(), "u3".to_string()]);
    }
}
