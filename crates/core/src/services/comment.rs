//! Comment service.

use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use zine_common::{AppResult, IdGenerator};
use zine_db::{
    PAGE_SIZE, Page,
    entities::{comment, user},
    repositories::{CommentRepository, PostRepository, UserRepository},
};

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 3000))]
    pub text: String,
}

/// A comment joined with its author.
#[derive(Debug, Clone)]
pub struct CommentWithAuthor {
    pub comment: comment::Model,
    pub author: user::Model,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Add a comment to a post.
    pub async fn create(
        &self,
        author: &user::Model,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            post_id: Set(post.id.clone()),
            text: Set(input.text),
            ..Default::default()
        };
        let comment = self.comment_repo.create(model).await?;

        self.post_repo.increment_comments_count(&post.id).await?;

        Ok(comment)
    }

    /// Comments on a post, newest first, each with its author.
    pub async fn list_for_post(
        &self,
        post_id: &str,
        page: Option<u64>,
    ) -> AppResult<Page<CommentWithAuthor>> {
        self.post_repo.get_by_id(post_id).await?;

        let comments = self
            .comment_repo
            .find_by_post_paged(post_id, page, PAGE_SIZE)
            .await?;

        let mut items = Vec::with_capacity(comments.items.len());
        for comment in comments.items {
            if let Some(author) = self.user_repo.find_by_id(&comment.user_id).await? {
                items.push(CommentWithAuthor { comment, author });
            }
        }

        Ok(Page {
            items,
            page: comments.page,
            page_count: comments.page_count,
            total: comments.total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;
    use zine_common::AppError;
    use zine_db::entities::post;

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

    fn service(db: Arc<sea_orm::DatabaseConnection>) -> CommentService {
        CommentService::new(
            CommentRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_empty_text() {
        let alice = create_test_user("u1", "alice");
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db)
            .create(
                &alice,
                "p1",
                CreateCommentInput {
                    text: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_on_missing_post() {
        let alice = create_test_user("u1", "alice");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );

        let result = service(db)
            .create(
                &alice,
                "p404",
                CreateCommentInput {
                    text: "nice".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::PostNotFound(_))));
    }
}
