//! Post service.

use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;
use zine_common::{AppError, AppResult, IdGenerator};
use zine_db::{
    GROUP_PAGE_SIZE, PAGE_SIZE, Page,
    entities::{group, post, user},
    repositories::{
        FollowRepository, GroupRepository, MediaFileRepository, PostRepository, UserRepository,
    },
};

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    group_repo: GroupRepository,
    media_repo: MediaFileRepository,
    follow_repo: FollowRepository,
    id_gen: IdGenerator,
}

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,

    pub group_id: Option<String>,

    pub image_id: Option<String>,
}

/// Input for editing a post. Absent fields are left untouched; group and
/// image take a nested option so callers can clear them with an explicit
/// null.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    pub text: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub group_id: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub image_id: Option<Option<String>>,
}

/// Distinguishes an absent field (outer `None`) from an explicit null
/// (inner `None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// A post joined with its author.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
    pub post: post::Model,
    pub author: user::Model,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        group_repo: GroupRepository,
        media_repo: MediaFileRepository,
        follow_repo: FollowRepository,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            group_repo,
            media_repo,
            follow_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a new post.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;

        if let Some(group_id) = &input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        if let Some(image_id) = &input.image_id {
            let media = self.media_repo.get_by_id(image_id).await?;
            if media.user_id != author.id {
                return Err(AppError::Forbidden(
                    "Image belongs to another user".to_string(),
                ));
            }
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(author.id.clone()),
            group_id: Set(input.group_id),
            text: Set(input.text),
            image_id: Set(input.image_id),
            ..Default::default()
        };
        let post = self.post_repo.create(model).await?;

        self.user_repo.increment_posts_count(&author.id).await?;

        tracing::info!(post_id = %post.id, author = %author.username, "post created");

        Ok(post)
    }

    /// Edit an existing post. Only the author may edit; anyone else gets
    /// a forbidden error and the post stays as it was.
    pub async fn update(
        &self,
        actor: &user::Model,
        post_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(post_id).await?;

        if post.user_id != actor.id {
            return Err(AppError::Forbidden(
                "Only the author can edit a post".to_string(),
            ));
        }

        if let Some(text) = &input.text {
            if text.is_empty() || text.chars().count() > 10000 {
                return Err(AppError::Validation(
                    "Post text must be between 1 and 10000 characters".to_string(),
                ));
            }
        }

        if let Some(Some(group_id)) = &input.group_id {
            self.group_repo.get_by_id(group_id).await?;
        }

        if let Some(Some(image_id)) = &input.image_id {
            let media = self.media_repo.get_by_id(image_id).await?;
            if media.user_id != actor.id {
                return Err(AppError::Forbidden(
                    "Image belongs to another user".to_string(),
                ));
            }
        }

        let mut model: post::ActiveModel = post.into();
        if let Some(text) = input.text {
            model.text = Set(text);
        }
        if let Some(group_id) = input.group_id {
            model.group_id = Set(group_id);
        }
        if let Some(image_id) = input.image_id {
            model.image_id = Set(image_id);
        }
        model.updated_at = Set(Some(chrono::Utc::now().into()));

        self.post_repo.update(model).await
    }

    /// Get a post by ID.
    pub async fn get(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Get a post together with its author.
    pub async fn get_with_author(&self, id: &str) -> AppResult<PostWithAuthor> {
        let post = self.post_repo.get_by_id(id).await?;
        let author = self.user_repo.get_by_id(&post.user_id).await?;
        Ok(PostWithAuthor { post, author })
    }

    /// Site-wide timeline, newest first, ten posts per page.
    pub async fn index(&self, page: Option<u64>) -> AppResult<Page<post::Model>> {
        self.post_repo.find_all_paged(page, PAGE_SIZE).await
    }

    /// A user's posts, newest first, plus the profile owner.
    pub async fn by_user(
        &self,
        username: &str,
        page: Option<u64>,
    ) -> AppResult<(user::Model, Page<post::Model>)> {
        let owner = self.user_repo.get_by_username(username).await?;
        let posts = self
            .post_repo
            .find_by_user_paged(&owner.id, page, PAGE_SIZE)
            .await?;
        Ok((owner, posts))
    }

    /// A group's posts, newest first, twelve per page, plus the group.
    pub async fn by_group(
        &self,
        slug: &str,
        page: Option<u64>,
    ) -> AppResult<(group::Model, Page<post::Model>)> {
        let group = self.group_repo.get_by_slug(slug).await?;
        let posts = self
            .post_repo
            .find_by_group_paged(&group.id, page, GROUP_PAGE_SIZE)
            .await?;
        Ok((group, posts))
    }

    /// Personalized feed: posts by everyone the viewer follows, newest
    /// first. A viewer who follows nobody gets an empty first page.
    pub async fn feed(
        &self,
        viewer: &user::Model,
        page: Option<u64>,
    ) -> AppResult<Page<post::Model>> {
        let authors = self.follow_repo.followee_ids(&viewer.id).await?;
        self.post_repo
            .find_by_authors_paged(&authors, page, PAGE_SIZE)
            .await
    }
}
