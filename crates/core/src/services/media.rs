//! Media service: image upload validation and storage.

use std::sync::Arc;

use image::ImageFormat;
use sea_orm::Set;
use zine_common::{
    AppError, AppResult, IdGenerator,
    storage::{StorageBackend, generate_storage_key},
};
use zine_db::{entities::media_file, repositories::MediaFileRepository};

/// Media service for image uploads.
#[derive(Clone)]
pub struct MediaService {
    media_repo: MediaFileRepository,
    storage: Arc<dyn StorageBackend>,
    max_upload_bytes: u64,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(
        media_repo: MediaFileRepository,
        storage: Arc<dyn StorageBackend>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            media_repo,
            storage,
            max_upload_bytes,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store an uploaded image and record it for its owner.
    ///
    /// Only real image payloads are accepted; the content type claimed by
    /// the client is ignored in favor of the file's magic bytes. Rejected
    /// uploads leave nothing behind.
    pub async fn upload(
        &self,
        owner_id: &str,
        original_name: &str,
        data: &[u8],
    ) -> AppResult<media_file::Model> {
        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        if data.len() as u64 > self.max_upload_bytes {
            return Err(AppError::BadRequest(format!(
                "File too large: maximum is {} bytes",
                self.max_upload_bytes
            )));
        }

        let format = image::guess_format(data)
            .map_err(|_| AppError::Validation("File is not a valid image".to_string()))?;
        let content_type = content_type_for(format)?;

        let key = generate_storage_key(owner_id, original_name);
        let uploaded = self.storage.upload(&key, data, content_type).await?;

        let model = media_file::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner_id.to_string()),
            name: Set(original_name.to_string()),
            content_type: Set(content_type.to_string()),
            size: Set(data.len() as i64),
            storage_key: Set(uploaded.key),
            url: Set(uploaded.url),
            ..Default::default()
        };

        match self.media_repo.create(model).await {
            Ok(media) => {
                tracing::info!(media_id = %media.id, owner = %owner_id, size = data.len(), "media stored");
                Ok(media)
            }
            Err(e) => {
                // Roll back the file so a failed insert leaves no orphan.
                let _ = self.storage.delete(&key).await;
                Err(e)
            }
        }
    }

    /// Get a media file by ID.
    pub async fn get(&self, id: &str) -> AppResult<media_file::Model> {
        self.media_repo.get_by_id(id).await
    }
}

/// Map a detected image format to its MIME type.
///
/// Formats outside the supported set are rejected rather than stored
/// with a guessed type.
fn content_type_for(format: ImageFormat) -> AppResult<&'static str> {
    match format {
        ImageFormat::Jpeg => Ok("image/jpeg"),
        ImageFormat::Png => Ok("image/png"),
        ImageFormat::Gif => Ok("image/gif"),
        ImageFormat::WebP => Ok("image/webp"),
        _ => Err(AppError::Validation(
            "Unsupported image format: use JPEG, PNG, GIF or WebP".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use zine_common::storage::LocalStorage;

    // Smallest well-formed headers the format sniffer accepts.
    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
    const GIF_MAGIC: &[u8] = b"GIF89a\x00\x00";

    fn service(db: Arc<sea_orm::DatabaseConnection>, max_bytes: u64) -> MediaService {
        let dir = std::env::temp_dir().join(format!("zine-media-{}", uuid::Uuid::new_v4()));
        let storage = Arc::new(LocalStorage::new(dir, "/media".to_string()));
        MediaService::new(MediaFileRepository::new(db), storage, max_bytes)
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(content_type_for(ImageFormat::Jpeg).unwrap(), "image/jpeg");
        assert_eq!(content_type_for(ImageFormat::WebP).unwrap(), "image/webp");
        assert!(content_type_for(ImageFormat::Tiff).is_err());
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db, 1024);

        let result = service
            .upload("u1", "notes.txt", b"plain text pretending to be art")
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db, 4);

        let result = service.upload("u1", "big.png", PNG_MAGIC).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_file() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = service(db, 1024);

        let result = service.upload("u1", "empty.gif", &[]).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_detects_format_from_magic_bytes() {
        let media = media_file::Model {
            id: "m1".to_string(),
            user_id: "u1".to_string(),
            name: "cat.png".to_string(),
            content_type: "image/gif".to_string(),
            size: GIF_MAGIC.len() as i64,
            storage_key: "k".to_string(),
            url: "/media/k".to_string(),
            created_at: chrono::Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[media]])
                .into_connection(),
        );

        // Named .png but carrying GIF bytes: stored as a GIF.
        let service = service(db, 1024);
        let stored = service.upload("u1", "cat.png", GIF_MAGIC).await.unwrap();

        assert_eq!(stored.content_type, "image/gif");
    }
}
