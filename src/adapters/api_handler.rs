//! REST API handlers for products and call records
//!
//! Every JSON response is wrapped in [`ApiResponse`].

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use dialdesk_forms::{normalize, validate_schema, CallStatus, FieldDescriptor, FieldError, StoredFile};
use serde::Serialize;
use serde_json::Map;
use std::sync::Arc;
use uuid::Uuid;

use crate::adapters::file_storage::{UploadError, UploadStore};
use crate::adapters::submission::{collect_feedback, store_feedback, CallSubmission};
use crate::domain::{CallPort, CallRecord, Product, ProductPort};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub products: Arc<dyn ProductPort>,
    pub calls: Arc<dyn CallPort>,
    pub uploads: Arc<UploadStore>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Upload failed: {0}")]
    Upload(#[from] UploadError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upload(UploadError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Upload(UploadError::InvalidPath(_)) => StatusCode::BAD_REQUEST,
            ApiError::Upload(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

async fn require_product(state: &ApiState, id: &str) -> Result<Product, ApiError> {
    state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product '{}' not found", id)))
}

async fn require_call(state: &ApiState, id: Uuid) -> Result<CallRecord, ApiError> {
    state
        .calls
        .get_call(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Call '{}' not found", id)))
}

// ============================================================================
// Products
// ============================================================================

/// GET /api/products
pub async fn list_products(State(state): State<ApiState>) -> ApiResult<Vec<Product>> {
    ok(state.products.list_products().await?)
}

/// GET /api/products/:id
pub async fn get_product(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<Product> {
    ok(require_product(&state, &id).await?)
}

/// PUT /api/products/:id/fields - Replace the feedback schema
pub async fn update_product_fields(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(fields): Json<Vec<FieldDescriptor>>,
) -> ApiResult<Product> {
    let fields: Vec<FieldDescriptor> = fields.into_iter().map(normalize).collect();
    if let Err(errors) = validate_schema(&fields) {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(ApiError::BadRequest(messages.join("; ")));
    }

    let product = state
        .products
        .update_feedback_fields(&id, fields)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Product '{}' not found", id)))?;

    tracing::info!(
        "Updated feedback schema of product '{}' ({} fields)",
        product.id,
        product.feedback_fields.len()
    );
    ok(product)
}

// ============================================================================
// Calls
// ============================================================================

/// GET /api/products/:id/calls
pub async fn list_calls(State(state): State<ApiState>, Path(id): Path<String>) -> ApiResult<Vec<CallRecord>> {
    let product = require_product(&state, &id).await?;
    ok(state.calls.list_calls(&product.id).await?)
}

/// GET /api/calls/:id
pub async fn get_call(State(state): State<ApiState>, Path(id): Path<Uuid>) -> ApiResult<CallRecord> {
    ok(require_call(&state, id).await?)
}

/// POST /api/products/:id/calls - Log a call (multipart)
pub async fn create_call(
    State(state): State<ApiState>,
    Path(product_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<CallRecord> {
    let product = require_product(&state, &product_id).await?;
    let submission = CallSubmission::from_multipart(multipart).await?;

    let contact = submission
        .contact
        .clone()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("contact is required".to_string()))?;
    let status = submission.status.unwrap_or_default();

    let call_id = Uuid::new_v4();
    let feedback = gated_feedback(&state, &product, call_id, status, submission, None).await?;

    let record = CallRecord {
        id: call_id,
        product_id: product.id.clone(),
        contact,
        status,
        feedback,
        made_on: Utc::now(),
    };
    state.calls.save_call(record.clone()).await?;

    tracing::info!("Logged {} call {} for product '{}'", record.status, record.id, record.product_id);
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

/// PATCH /api/calls/:id - Update a call (multipart)
pub async fn update_call(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<CallRecord> {
    let existing = require_call(&state, id).await?;
    let product = require_product(&state, &existing.product_id).await?;
    let submission = CallSubmission::from_multipart(multipart).await?;

    let contact = match submission.contact.clone() {
        Some(c) if c.is_empty() => return Err(ApiError::BadRequest("contact is required".to_string())),
        Some(c) => c,
        None => existing.contact.clone(),
    };
    let status = submission.status.unwrap_or(existing.status);

    let feedback = gated_feedback(&state, &product, id, status, submission, Some(&existing.feedback)).await?;

    let previous_feedback = existing.feedback.clone();
    let record = CallRecord {
        contact,
        status,
        feedback,
        ..existing
    };
    state.calls.save_call(record.clone()).await?;
    remove_orphaned_uploads(&state.uploads, &previous_feedback, &record.feedback).await;

    tracing::info!("Updated call {} ({})", record.id, record.status);
    ok(record)
}

/// URLs of the stored files referenced by a feedback object
fn stored_file_urls(feedback: &Map<String, serde_json::Value>) -> Vec<String> {
    feedback
        .values()
        .filter(|value| value.is_object())
        .filter_map(|value| serde_json::from_value::<StoredFile>(value.clone()).ok())
        .map(|file| file.file_url)
        .collect()
}

/// Delete files the previous feedback referenced and the saved one no longer
/// does. Failures are logged; the call itself is already saved.
async fn remove_orphaned_uploads(
    uploads: &UploadStore,
    previous: &Map<String, serde_json::Value>,
    current: &Map<String, serde_json::Value>,
) {
    let kept = stored_file_urls(current);
    for url in stored_file_urls(previous) {
        if kept.contains(&url) {
            continue;
        }
        if let Err(e) = uploads.remove(&url).await {
            tracing::warn!("Could not remove replaced upload {}: {}", url, e);
        }
    }
}

/// Feedback to persist for `status`: empty unless the call completed,
/// otherwise validated against the product schema with uploads stored.
async fn gated_feedback(
    state: &ApiState,
    product: &Product,
    call_id: Uuid,
    status: CallStatus,
    submission: CallSubmission,
    previous: Option<&Map<String, serde_json::Value>>,
) -> Result<Map<String, serde_json::Value>, ApiError> {
    if !status.requires_feedback() {
        if !submission.feedback.is_empty() || !submission.files.is_empty() {
            tracing::debug!("Discarding feedback of {} call {}", status, call_id);
        }
        return Ok(Map::new());
    }

    let schema = &product.feedback_fields;
    let bag = collect_feedback(schema, &submission.feedback, submission.files, previous)
        .map_err(ApiError::Validation)?;
    store_feedback(&state.uploads, call_id, schema, bag).await
}

// ============================================================================
// Uploads
// ============================================================================

/// GET /uploads/*path - Stored feedback file
pub async fn serve_upload(State(state): State<ApiState>, Path(path): Path<String>) -> Result<Response, ApiError> {
    let bytes = state.uploads.read(&path).await?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.as_ref().to_string())], bytes).into_response())
}
