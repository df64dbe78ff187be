//! Follow service.

use sea_orm::Set;
use zine_common::{AppResult, IdGenerator};
use zine_db::{
    PAGE_SIZE, Page,
    entities::{follow, user},
    repositories::{FollowRepository, UserRepository},
};

/// Result of a follow or unfollow request.
///
/// Both operations are idempotent; `changed` is false when the graph
/// already looked the way the caller asked for (including a self-follow
/// attempt). `following` reports whether an edge exists afterwards,
/// derived from the resolved followee rather than the raw request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOutcome {
    pub following: bool,
    pub changed: bool,
}

/// Follow service for the social graph.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user by username.
    ///
    /// Following yourself or someone you already follow succeeds without
    /// creating an edge.
    pub async fn follow(&self, follower: &user::Model, username: &str) -> AppResult<FollowOutcome> {
        let followee = self.user_repo.get_by_username(username).await?;

        if follower.id == followee.id {
            return Ok(FollowOutcome {
                following: false,
                changed: false,
            });
        }

        if self
            .follow_repo
            .is_following(&follower.id, &followee.id)
            .await?
        {
            return Ok(FollowOutcome {
                following: true,
                changed: false,
            });
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower.id.clone()),
            followee_id: Set(followee.id.clone()),
            ..Default::default()
        };
        self.follow_repo.create(model).await?;

        self.user_repo.increment_following_count(&follower.id).await?;
        self.user_repo.increment_followers_count(&followee.id).await?;

        tracing::info!(
            follower = %follower.username,
            followee = %followee.username,
            "follow edge created"
        );

        Ok(FollowOutcome {
            following: true,
            changed: true,
        })
    }

    /// Unfollow a user by username.
    ///
    /// Unfollowing someone you do not follow succeeds without touching
    /// the graph.
    pub async fn unfollow(
        &self,
        follower: &user::Model,
        username: &str,
    ) -> AppResult<FollowOutcome> {
        let followee = self.user_repo.get_by_username(username).await?;

        let removed = self
            .follow_repo
            .delete_by_pair(&follower.id, &followee.id)
            .await?;

        if !removed {
            return Ok(FollowOutcome {
                following: false,
                changed: false,
            });
        }

        self.user_repo.decrement_following_count(&follower.id).await?;
        self.user_repo.decrement_followers_count(&followee.id).await?;

        Ok(FollowOutcome {
            following: false,
            changed: true,
        })
    }

    /// Whether `follower_id` currently follows `followee_id`.
    pub async fn is_following(&self, follower_id: &str, followee_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, followee_id).await
    }

    /// Users following `username`, newest edge first.
    pub async fn followers(
        &self,
        username: &str,
        page: Option<u64>,
    ) -> AppResult<Page<user::Model>> {
        let user = self.user_repo.get_by_username(username).await?;
        let edges = self
            .follow_repo
            .find_followers_paged(&user.id, page, PAGE_SIZE)
            .await?;
        self.resolve_users(edges, |e| e.follower_id).await
    }

    /// Users that `username` follows, newest edge first.
    pub async fn following(
        &self,
        username: &str,
        page: Option<u64>,
    ) -> AppResult<Page<user::Model>> {
        let user = self.user_repo.get_by_username(username).await?;
        let edges = self
            .follow_repo
            .find_following_paged(&user.id, page, PAGE_SIZE)
            .await?;
        self.resolve_users(edges, |e| e.followee_id).await
    }

    /// Resolve one side of each edge to its user, preserving edge order.
    /// Edges whose user vanished mid-request are dropped.
    async fn resolve_users(
        &self,
        edges: Page<follow::Model>,
        side: impl Fn(follow::Model) -> String,
    ) -> AppResult<Page<user::Model>> {
        let mut users = Vec::with_capacity(edges.items.len());
        for id in edges.items.into_iter().map(side) {
            if let Some(user) = self.user_repo.find_by_id(&id).await? {
                users.push(user);
            }
        }
        Ok(Page {
            items: users,
            page: edges.page,
            page_count: edges.page_count,
            total: edges.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;
    use zine_common::AppError;

    fn create_test_user(id: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: "hash".to_string(),
            token: format!("token-{id}"),
            name: None,
            bio: None,
            is_admin: false,
            posts_count: 0,
            followers_count: 0,
            following_count: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_follow(id: &str, follower_id: &str, followee_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            followee_id: followee_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> FollowService {
        FollowService::new(FollowRepository::new(db.clone()), UserRepository::new(db))
    }

    #[tokio::test]
    async fn test_follow_self_is_noop() {
        let alice = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[alice.clone()]])
                .into_connection(),
        );

        let outcome = service(db).follow(&alice, "alice").await.unwrap();
        assert!(!outcome.following);
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_follow_self_in_different_case_reports_not_following() {
        let alice = create_test_user("u1", "Alice");

        // Lookup is case-insensitive, so "ALICE" resolves back to the
        // follower herself.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[alice.clone()]])
                .into_connection(),
        );

        let outcome = service(db).follow(&alice, "ALICE").await.unwrap();
        assert!(!outcome.following);
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_follow_duplicate_is_noop() {
        let alice = create_test_user("u1", "alice");
        let bob = create_test_user("u2", "bob");
        let edge = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[bob]])
                .append_query_results([[edge]])
                .into_connection(),
        );

        let outcome = service(db).follow(&alice, "bob").await.unwrap();
        assert!(outcome.following);
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn test_follow_creates_edge_and_counts() {
        let alice = create_test_user("u1", "alice");
        let bob = create_test_user("u2", "bob");
        let edge = create_test_follow("f1", "u1", "u2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[bob]])
                .append_query_results([Vec::<follow::Model>::new()])
                .append_query_results([[edge]])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let outcome = service(db).follow(&alice, "bob").await.unwrap();
        assert!(outcome.following);
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn test_follow_unknown_user() {
        let alice = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let result = service(db).follow(&alice, "ghost").await;
        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_unfollow_missing_edge_is_noop() {
        let alice = create_test_user("u1", "alice");
        let bob = create_test_user("u2", "bob");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[bob]])
                .append_query_results([Vec::<follow::Model>::new()])
                .into_connection(),
        );

        let outcome = service(db).unfollow(&alice, "bob").await.unwrap();
        assert!(!outcome.following);
        assert!(!outcome.changed);
    }
}
