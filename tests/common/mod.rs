use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dialdesk::adapters::call_store::InMemoryCallStore;
use dialdesk::adapters::file_storage::UploadStore;
use dialdesk::config::{ServerSettings, Settings, UploadSettings};
use dialdesk::domain::{Product, ProductStatus};
use dialdesk_forms::{FieldDescriptor, FieldType};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::RwLock;
use tower::util::ServiceExt;

pub const BOUNDARY: &str = "dialdesk-test-boundary";

pub struct TestApp {
    pub router: Router,
    // Keeps the upload directory alive for the test's duration
    _uploads_dir: TempDir,
}

/// "loans": required select, optional rating 1..=5, required pdf proof (max 1KB).
/// "leads": a single optional text field.
pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: "loans".to_string(),
            name: "Personal loans".to_string(),
            description: None,
            status: ProductStatus::Active,
            feedback_fields: vec![
                FieldDescriptor::new("Outcome", FieldType::Select)
                    .with_options(["Sold", "Declined"])
                    .required(),
                FieldDescriptor::new("Rating", FieldType::Number).with_range(Some(1.0), Some(5.0)),
                FieldDescriptor::new("Proof", FieldType::File)
                    .with_file_limits(["pdf"], Some("1KB"))
                    .required(),
            ],
        },
        Product {
            id: "leads".to_string(),
            name: "Lead generation".to_string(),
            description: Some("Outbound prospecting".to_string()),
            status: ProductStatus::Active,
            feedback_fields: vec![FieldDescriptor::new("Notes", FieldType::Text)],
        },
    ]
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads_dir = TempDir::new().unwrap();
        let settings = Arc::new(RwLock::new(Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            uploads: UploadSettings {
                dir: uploads_dir.path().to_path_buf(),
                max_body_bytes: 1024 * 1024,
            },
            products: products(),
        }));

        let uploads = Arc::new(UploadStore::local(uploads_dir.path()).unwrap());
        let calls = Arc::new(InMemoryCallStore::new());
        let router = dialdesk::create_app(settings, calls, uploads).await;

        Self {
            router,
            _uploads_dir: uploads_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_bytes(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    pub async fn multipart(&self, method: &str, uri: &str, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap();
        self.send(request).await
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
