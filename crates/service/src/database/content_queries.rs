use serde::Deserialize;

use common::content::{Asset, AssetId, ContentItem, ContentItemId, ContentStatus, Visibility};

use super::content_provider::{AssetRow, ContentItemRow};
use crate::database::Database;

#[derive(Debug, Clone, Deserialize)]
pub struct NewContentItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: ContentStatus,
    #[serde(default)]
    pub password: Option<String>,
}

/// Fields of a content item to change; `None` leaves a field as is
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentItemUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<ContentStatus>,
    /// An empty string clears the password
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAsset {
    pub parent_id: Option<ContentItemId>,
    pub mime_type: String,
    pub storage_path: String,
    /// `None` stores no visibility, which reads as public
    pub visibility: Option<Visibility>,
    pub password: Option<String>,
}

/// Visibility attributes of an asset to change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetUpdate {
    #[serde(default)]
    pub visibility: Option<Visibility>,
    /// An empty string clears the password
    #[serde(default)]
    pub password: Option<String>,
}

impl Database {
    pub async fn create_content_item(&self, item: NewContentItem) -> Result<ContentItem, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO content_items (title, status, password)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&item.title)
        .bind(item.status.as_str())
        .bind(non_empty(item.password.clone()))
        .execute(&**self)
        .await?;

        Ok(ContentItem {
            id: result.last_insert_rowid() as ContentItemId,
            title: item.title,
            status: item.status,
            password: non_empty(item.password),
        })
    }

    /// Apply `update` to a content item. Returns the updated item, or
    ///  `None` if there is no such item.
    pub async fn update_content_item(
        &self,
        id: ContentItemId,
        update: ContentItemUpdate,
    ) -> Result<Option<ContentItem>, sqlx::Error> {
        let mut tx = self.begin().await?;

        let Some(row) = sqlx::query_as::<_, ContentItemRow>(
            "SELECT id, title, status, password FROM content_items WHERE id = ?1",
        )
        .bind(id as i64)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };
        let mut item = ContentItem::try_from(row)?;

        if let Some(title) = update.title {
            item.title = title;
        }
        if let Some(status) = update.status {
            item.status = status;
        }
        if let Some(password) = update.password {
            item.password = non_empty(Some(password));
        }

        sqlx::query(
            r#"
            UPDATE content_items
            SET title = ?1, status = ?2, password = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&item.title)
        .bind(item.status.as_str())
        .bind(&item.password)
        .bind(id as i64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    pub async fn create_asset(&self, asset: NewAsset) -> Result<Asset, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO assets (parent_id, mime_type, storage_path, visibility, password)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(asset.parent_id.map(|id| id as i64))
        .bind(&asset.mime_type)
        .bind(&asset.storage_path)
        .bind(asset.visibility.map(|v| v.as_str()))
        .bind(non_empty(asset.password.clone()))
        .execute(&**self)
        .await?;

        Ok(Asset {
            id: result.last_insert_rowid() as AssetId,
            parent_id: asset.parent_id,
            mime_type: asset.mime_type,
            storage_path: asset.storage_path,
            visibility: asset.visibility.unwrap_or_default(),
            own_password: non_empty(asset.password),
        })
    }

    /// Every asset attached to a content item, in id order
    pub async fn assets_for_content_item(
        &self,
        parent_id: ContentItemId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, parent_id, mime_type, storage_path, visibility, password
            FROM assets
            WHERE parent_id = ?1
            ORDER BY id ASC
            "#,
        )
        .bind(parent_id as i64)
        .fetch_all(&**self)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use common::content::ContentProvider;

    use super::*;

    async fn setup() -> Database {
        let url = url::Url::parse("sqlite::memory:").unwrap();
        Database::connect(&url).await.unwrap()
    }

    fn new_asset(storage_path: &str, visibility: Option<Visibility>) -> NewAsset {
        NewAsset {
            parent_id: None,
            mime_type: "image/png".to_string(),
            storage_path: storage_path.to_string(),
            visibility,
            password: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_asset() {
        let db = setup().await;
        let created = db.create_asset(new_asset("a.png", None)).await.unwrap();

        let fetched = db.asset(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.visibility, Visibility::Public);
        assert_eq!(db.asset(created.id + 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_protected_assets_listing() {
        let db = setup().await;
        let a = db
            .create_asset(new_asset("a.png", Some(Visibility::Password)))
            .await
            .unwrap();
        db.create_asset(new_asset("b.png", Some(Visibility::Public)))
            .await
            .unwrap();
        db.create_asset(new_asset("c.png", None)).await.unwrap();
        let d = db
            .create_asset(new_asset("d.png", Some(Visibility::Private)))
            .await
            .unwrap();

        let ids: Vec<_> = db
            .protected_assets()
            .await
            .unwrap()
            .into_iter()
            .map(|asset| asset.id)
            .collect();
        assert_eq!(ids, vec![a.id, d.id]);
    }

    #[tokio::test]
    async fn test_unknown_stored_visibility_is_public() {
        let db = setup().await;
        let created = db.create_asset(new_asset("a.png", None)).await.unwrap();
        sqlx::query("UPDATE assets SET visibility = 'bogus' WHERE id = ?1")
            .bind(created.id as i64)
            .execute(&*db)
            .await
            .unwrap();

        let fetched = db.asset(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.visibility, Visibility::Public);
    }

    #[tokio::test]
    async fn test_update_content_item() {
        let db = setup().await;
        let item = db
            .create_content_item(NewContentItem {
                title: "post".into(),
                status: ContentStatus::Publish,
                password: Some("abc".into()),
            })
            .await
            .unwrap();
        assert_eq!(item.password(), Some("abc"));

        let updated = db
            .update_content_item(
                item.id,
                ContentItemUpdate {
                    status: Some(ContentStatus::Private),
                    password: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ContentStatus::Private);
        assert_eq!(updated.password, None);
        assert_eq!(db.content_item(item.id).await.unwrap(), Some(updated));

        let missing = db
            .update_content_item(item.id + 1, ContentItemUpdate::default())
            .await
            .unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_set_attributes() {
        let db = setup().await;
        let created = db.create_asset(new_asset("a.png", None)).await.unwrap();

        db.set_visibility(created.id, Visibility::Password)
            .await
            .unwrap();
        db.set_password(created.id, Some("pw".into())).await.unwrap();

        let fetched = db.asset(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.visibility, Visibility::Password);
        assert_eq!(fetched.own_password(), Some("pw"));

        assert!(matches!(
            db.set_visibility(999, Visibility::Private).await,
            Err(common::content::ContentError::AssetNotFound(999))
        ));
    }
}
