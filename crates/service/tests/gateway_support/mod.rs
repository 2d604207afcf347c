#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;

use common::content::{Asset, ContentStatus, Visibility};
use service::database::{NewAsset, NewContentItem};
use service::{Config, ServiceState};

pub const EDITOR_TOKEN: &str = "editor-token";
pub const SITE: &str = "https://example.com";

pub struct TestGateway {
    pub router: Router,
    pub state: ServiceState,
    pub htaccess: PathBuf,
    // held so the directory outlives the test
    pub dir: TempDir,
}

impl TestGateway {
    pub fn uploads(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Write a file below the uploads directory
    pub fn write_upload(&self, storage_path: &str, contents: &[u8]) {
        let path = self.uploads().join(storage_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub async fn content_item(&self, status: ContentStatus, password: Option<&str>) -> u64 {
        self.state
            .database()
            .create_content_item(NewContentItem {
                title: "post".to_string(),
                status,
                password: password.map(str::to_string),
            })
            .await
            .unwrap()
            .id
    }

    pub async fn asset(
        &self,
        storage_path: &str,
        visibility: Option<Visibility>,
        password: Option<&str>,
        parent_id: Option<u64>,
    ) -> Asset {
        self.state
            .database()
            .create_asset(NewAsset {
                parent_id,
                mime_type: mime_for(storage_path).to_string(),
                storage_path: storage_path.to_string(),
                visibility,
                password: password.map(str::to_string),
            })
            .await
            .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

fn mime_for(storage_path: &str) -> &'static str {
    match Path::new(storage_path).extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

pub async fn setup() -> TestGateway {
    setup_with(|state| state).await
}

/// Like [`setup`], with a chance to adjust the state before routing
pub async fn setup_with(adjust: impl FnOnce(ServiceState) -> ServiceState) -> TestGateway {
    let dir = tempfile::tempdir().unwrap();
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();
    let htaccess = dir.path().join(".htaccess");

    let config = Config {
        site_url: Url::parse(SITE).unwrap(),
        uploads_dir: uploads,
        htaccess_path: Some(htaccess.clone()),
        editor_tokens: vec![EDITOR_TOKEN.to_string()],
        ..Config::default()
    };
    let state = adjust(ServiceState::from_config(&config).await.unwrap());
    let router = service::http::router(state.clone());

    TestGateway {
        router,
        state,
        htaccess,
        dir,
    }
}

pub fn gated_uri(id: u64) -> String {
    format!("/index.php?hl_download=1&attachment_id={}", id)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn editor_get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", EDITOR_TOKEN))
        .body(Body::empty())
        .unwrap()
}

pub fn editor_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", EDITOR_TOKEN))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
