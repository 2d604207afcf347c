use async_trait::async_trait;

use common::content::{
    Asset, AssetId, ContentError, ContentItem, ContentItemId, ContentProvider, Visibility,
};

use crate::database::Database;

#[derive(sqlx::FromRow)]
pub(super) struct AssetRow {
    id: i64,
    parent_id: Option<i64>,
    mime_type: String,
    storage_path: String,
    visibility: Option<String>,
    password: Option<String>,
}

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Asset {
            id: row.id as AssetId,
            parent_id: row.parent_id.map(|id| id as ContentItemId),
            mime_type: row.mime_type,
            storage_path: row.storage_path,
            visibility: Visibility::from_stored(row.visibility.as_deref()),
            own_password: row.password,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(super) struct ContentItemRow {
    id: i64,
    title: String,
    status: String,
    password: Option<String>,
}

impl TryFrom<ContentItemRow> for ContentItem {
    type Error = sqlx::Error;

    fn try_from(row: ContentItemRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        Ok(ContentItem {
            id: row.id as ContentItemId,
            title: row.title,
            status,
            password: row.password,
        })
    }
}

#[async_trait]
impl ContentProvider for Database {
    type Error = sqlx::Error;

    async fn asset(&self, id: AssetId) -> Result<Option<Asset>, ContentError<Self::Error>> {
        let row = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, parent_id, mime_type, storage_path, visibility, password
            FROM assets
            WHERE id = ?1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&**self)
        .await
        .map_err(ContentError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn content_item(
        &self,
        id: ContentItemId,
    ) -> Result<Option<ContentItem>, ContentError<Self::Error>> {
        let row = sqlx::query_as::<_, ContentItemRow>(
            r#"
            SELECT id, title, status, password
            FROM content_items
            WHERE id = ?1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&**self)
        .await
        .map_err(ContentError::Provider)?;

        row.map(ContentItem::try_from)
            .transpose()
            .map_err(ContentError::Provider)
    }

    async fn protected_assets(&self) -> Result<Vec<Asset>, ContentError<Self::Error>> {
        let rows = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, parent_id, mime_type, storage_path, visibility, password
            FROM assets
            WHERE visibility IN ('private', 'password')
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&**self)
        .await
        .map_err(ContentError::Provider)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_visibility(
        &self,
        id: AssetId,
        visibility: Visibility,
    ) -> Result<(), ContentError<Self::Error>> {
        let result = sqlx::query("UPDATE assets SET visibility = ?1 WHERE id = ?2")
            .bind(visibility.as_str())
            .bind(id as i64)
            .execute(&**self)
            .await
            .map_err(ContentError::Provider)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::AssetNotFound(id));
        }
        Ok(())
    }

    async fn set_password(
        &self,
        id: AssetId,
        password: Option<String>,
    ) -> Result<(), ContentError<Self::Error>> {
        let result = sqlx::query("UPDATE assets SET password = ?1 WHERE id = ?2")
            .bind(password)
            .bind(id as i64)
            .execute(&**self)
            .await
            .map_err(ContentError::Provider)?;

        if result.rows_affected() == 0 {
            return Err(ContentError::AssetNotFound(id));
        }
        Ok(())
    }
}
