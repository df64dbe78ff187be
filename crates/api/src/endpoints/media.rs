//! Media upload endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};
use serde::{Deserialize, Serialize};
use zine_common::{AppError, AppResult};
use zine_db::entities::media_file;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Media file response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub size: i64,
    pub url: String,
    pub created_at: String,
}

impl From<media_file::Model> for MediaResponse {
    fn from(m: media_file::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            content_type: m.content_type,
            size: m.size,
            url: m.url,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// Upload an image via multipart form.
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<MediaResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(std::string::ToString::to_string);
                file_data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !text.is_empty() {
                    file_name = Some(text);
                }
            }
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let name = file_name.unwrap_or_else(|| "untitled".to_string());

    let media = state.media_service.upload(&user.id, &name, &data).await?;

    Ok(ApiResponse::ok(media.into()))
}

/// Media lookup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowRequest {
    pub media_id: String,
}

/// Show a media file's metadata.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowRequest>,
) -> AppResult<ApiResponse<MediaResponse>> {
    let media = state.media_service.get(&req.media_id).await?;
    Ok(ApiResponse::ok(media.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/show", post(show))
}
