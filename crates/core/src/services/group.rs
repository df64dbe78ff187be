//! Group service.

use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use zine_common::{AppError, AppResult, IdGenerator};
use zine_db::{
    GROUP_PAGE_SIZE, Page, entities::group, repositories::GroupRepository,
};

/// Group service for business logic.
#[derive(Clone)]
pub struct GroupService {
    group_repo: GroupRepository,
    id_gen: IdGenerator,
}

/// Input for creating a group.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, max = 100))]
    pub slug: String,

    #[validate(length(max = 10000))]
    pub description: String,
}

impl GroupService {
    /// Create a new group service.
    #[must_use]
    pub fn new(group_repo: GroupRepository) -> Self {
        Self {
            group_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new group. Slugs are unique and URL-safe.
    pub async fn create(&self, input: CreateGroupInput) -> AppResult<group::Model> {
        input.validate()?;

        if !is_valid_slug(&input.slug) {
            return Err(AppError::Validation(
                "Slug may only contain lowercase letters, digits and hyphens".to_string(),
            ));
        }

        if self.group_repo.find_by_slug(&input.slug).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Group slug '{}' already exists",
                input.slug
            )));
        }

        let model = group::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            slug: Set(input.slug),
            description: Set(input.description),
            ..Default::default()
        };

        self.group_repo.create(model).await
    }

    /// Get a group by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<group::Model> {
        self.group_repo.get_by_slug(slug).await
    }

    /// All groups, alphabetical by title.
    pub async fn list(&self, page: Option<u64>) -> AppResult<Page<group::Model>> {
        self.group_repo.find_all_paged(page, GROUP_PAGE_SIZE).await
    }
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_group(id: &str, slug: &str) -> group::Model {
        group::Model {
            id: id.to_string(),
            title: format!("Group {id}"),
            description: String::new(),
            slug: slug.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_slug_charset() {
        assert!(is_valid_slug("rust-news-2026"));
        assert!(!is_valid_slug("Rust News"));
        assert!(!is_valid_slug("rust_news"));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let existing = create_test_group("g1", "cats");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = GroupService::new(GroupRepository::new(db));
        let result = service
            .create(CreateGroupInput {
                title: "Cats".to_string(),
                slug: "cats".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_slug() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = GroupService::new(GroupRepository::new(db));
        let result = service
            .create(CreateGroupInput {
                title: "Cats".to_string(),
                slug: "Cats!".to_string(),
                description: String::new(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
