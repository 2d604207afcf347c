use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use common::content::ContentItemId;

use crate::database::{ContentItemUpdate, NewContentItem};
use crate::http::requester::Editor;
use crate::ServiceState;

pub async fn create(
    _editor: Editor,
    State(state): State<ServiceState>,
    Json(req): Json<NewContentItem>,
) -> Result<impl IntoResponse, ContentError> {
    let item = state.database().create_content_item(req).await?;
    tracing::info!(content_item_id = item.id, status = %item.status, "content item created");

    Ok((StatusCode::CREATED, Json(item)))
}

/// Edit a content item's title, status or password. Protection of
///  attached assets follows through the regenerated rules.
pub async fn update(
    _editor: Editor,
    State(state): State<ServiceState>,
    Path(id): Path<ContentItemId>,
    Json(req): Json<ContentItemUpdate>,
) -> Result<impl IntoResponse, ContentError> {
    let item = state
        .database()
        .update_content_item(id, req)
        .await?
        .ok_or(ContentError::NotFound(id))?;
    tracing::info!(content_item_id = id, status = %item.status, "content item updated");

    state.gate().on_content_item_edited(id).await;
    Ok(Json(item))
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("content item not found: {0}")]
    NotFound(ContentItemId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        match self {
            ContentError::NotFound(_) => {
                let msg = serde_json::json!({"msg": self.to_string()});
                (StatusCode::NOT_FOUND, Json(msg)).into_response()
            }
            ContentError::Database(e) => {
                tracing::error!("CONTENT API ERROR: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
            }
        }
    }
}
