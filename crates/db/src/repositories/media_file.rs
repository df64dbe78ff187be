//! Media file repository.

use std::sync::Arc;

use crate::entities::{MediaFile, media_file};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};
use zine_common::{AppError, AppResult};

/// Media file repository for database operations.
#[derive(Clone)]
pub struct MediaFileRepository {
    db: Arc<DatabaseConnection>,
}

impl MediaFileRepository {
    /// Create a new media file repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a media file by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<media_file::Model>> {
        MediaFile::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a media file by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<media_file::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("media file {id}")))
    }

    /// Create a new media file record.
    pub async fn create(&self, model: media_file::ActiveModel) -> AppResult<media_file::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_file(id: &str, user_id: &str) -> media_file::Model {
        media_file::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: "photo.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 1024,
            storage_key: format!("2026/01/01/{user_id}/{id}.jpg"),
            url: format!("/media/2026/01/01/{user_id}/{id}.jpg"),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let file = create_test_file("m1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[file.clone()]])
                .into_connection(),
        );

        let repo = MediaFileRepository::new(db);
        let result = repo.find_by_id("m1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<media_file::Model>::new()])
                .into_connection(),
        );

        let repo = MediaFileRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
