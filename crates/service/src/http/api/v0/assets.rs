use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::content::{
    Asset, AssetId, ContentError as ProviderError, ContentItemId, ContentProvider, Visibility,
};

use crate::database::{AssetUpdate, NewAsset};
use crate::http::requester::Editor;
use crate::ServiceState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetRequest {
    /// Location below the uploads directory
    pub storage_path: String,
    #[serde(default)]
    pub parent_id: Option<ContentItemId>,
    /// Guessed from `storage_path` when absent
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAssetResponse {
    #[serde(flatten)]
    pub asset: Asset,
    /// Protection copied from the parent content item, if any
    pub inherited: Option<Visibility>,
}

/// An asset as a page rendering it would see it
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    #[serde(flatten)]
    pub asset: Asset,
    pub effective_visibility: Visibility,
    pub effective_password: Option<String>,
}

pub async fn create(
    _editor: Editor,
    State(state): State<ServiceState>,
    Json(req): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse, AssetsError> {
    let storage_path = req.storage_path.trim().to_string();
    if storage_path.trim_start_matches('/').is_empty() {
        return Err(AssetsError::InvalidPath);
    }

    if let Some(parent_id) = req.parent_id {
        if state.database().content_item(parent_id).await?.is_none() {
            return Err(AssetsError::UnknownParent(parent_id));
        }
    }

    let mime_type = req.mime_type.filter(|m| !m.is_empty()).unwrap_or_else(|| {
        mime_guess::from_path(&storage_path)
            .first_or_octet_stream()
            .to_string()
    });

    let created = state
        .database()
        .create_asset(NewAsset {
            parent_id: req.parent_id,
            mime_type,
            storage_path,
            visibility: req.visibility,
            password: req.password,
        })
        .await?;
    tracing::info!(asset_id = created.id, path = %created.storage_path, "asset created");

    let inherited = state.gate().on_asset_created(created.id).await;
    let asset = state
        .database()
        .asset(created.id)
        .await?
        .ok_or(AssetsError::NotFound(created.id))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAssetResponse { asset, inherited }),
    ))
}

pub async fn update(
    _editor: Editor,
    State(state): State<ServiceState>,
    Path(id): Path<AssetId>,
    Json(req): Json<AssetUpdate>,
) -> Result<Json<Asset>, AssetsError> {
    let db = state.database();
    if let Some(visibility) = req.visibility {
        db.set_visibility(id, visibility).await?;
    }
    if let Some(password) = req.password {
        let password = Some(password).filter(|p| !p.is_empty());
        db.set_password(id, password).await?;
    }

    let asset = db.asset(id).await?.ok_or(AssetsError::NotFound(id))?;
    tracing::info!(asset_id = id, visibility = %asset.visibility, "asset updated");

    state.gate().on_asset_edited(id).await;
    Ok(Json(asset))
}

pub async fn get(
    _editor: Editor,
    State(state): State<ServiceState>,
    Path(id): Path<AssetId>,
) -> Result<Json<AssetView>, AssetsError> {
    let asset = state
        .database()
        .asset(id)
        .await?
        .ok_or(AssetsError::NotFound(id))?;

    let stamped = state.gate().stamp(asset).await;
    Ok(Json(AssetView {
        effective_visibility: stamped.classification.visibility(),
        effective_password: stamped.effective_password().map(str::to_string),
        asset: stamped.asset,
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum AssetsError {
    #[error("storage path must not be empty")]
    InvalidPath,
    #[error("unknown parent content item: {0}")]
    UnknownParent(ContentItemId),
    #[error("asset not found: {0}")]
    NotFound(AssetId),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ProviderError<sqlx::Error>> for AssetsError {
    fn from(e: ProviderError<sqlx::Error>) -> Self {
        match e {
            ProviderError::Provider(e) => AssetsError::Database(e),
            ProviderError::AssetNotFound(id) => AssetsError::NotFound(id),
        }
    }
}

impl IntoResponse for AssetsError {
    fn into_response(self) -> Response {
        let status = match &self {
            AssetsError::InvalidPath | AssetsError::UnknownParent(_) => StatusCode::BAD_REQUEST,
            AssetsError::NotFound(_) => StatusCode::NOT_FOUND,
            AssetsError::Database(e) => {
                tracing::error!("ASSETS API ERROR: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response();
            }
        };
        let msg = serde_json::json!({"msg": self.to_string()});
        (status, Json(msg)).into_response()
    }
}
