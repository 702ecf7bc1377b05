use axum::extract::Multipart;

use crate::{
    assets::{AssetKind, StoredAsset},
    dto::assets::DeleteImageRequest,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

const FIELD: &str = "image";

/// Stores the multipart field `image` under the directory for `kind`.
pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    kind: AssetKind,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<StoredAsset>> {
    ensure_admin(user)?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        let stored = state
            .assets
            .save(kind, file_name.as_deref(), content_type.as_deref(), &bytes)
            .await?;
        return Ok(ApiResponse::success("Image uploaded", stored, Some(Meta::empty())));
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

pub async fn delete_image(
    state: &AppState,
    user: &AuthUser,
    payload: DeleteImageRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let url = payload.image_url.trim();
    if url.is_empty() {
        return Err(AppError::BadRequest("Image URL is required".into()));
    }

    state.assets.delete_url(url).await?;
    Ok(ApiResponse::success(
        "Image deleted successfully",
        serde_json::json!({ "imageUrl": url }),
        Some(Meta::empty()),
    ))
}
