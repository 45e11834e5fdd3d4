//! API client for the Dialdesk backend

use crate::components::feedback_form::BrowserFile;
use crate::types::*;
use dialdesk_forms::{Attachment, FieldDescriptor, Submission};
use gloo_net::http::{Request, Response};
use leptos::web_sys::FormData;

const API_BASE: &str = "/api";

// ============================================================================
// Products
// ============================================================================

pub async fn list_products() -> Result<Vec<Product>, String> {
    let url = format!("{}/products", API_BASE);
    fetch_json::<Vec<Product>>(&url).await
}

pub async fn get_product(id: &str) -> Result<Product, String> {
    let url = format!("{}/products/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<Product>(&url).await
}

/// Replace the feedback schema of a product
pub async fn update_product_fields(id: &str, fields: &[FieldDescriptor]) -> Result<Product, String> {
    let url = format!("{}/products/{}/fields", API_BASE, urlencoding::encode(id));
    put_json::<[FieldDescriptor], Product>(&url, fields).await
}

// ============================================================================
// Calls
// ============================================================================

pub async fn list_calls(product_id: &str) -> Result<Vec<CallRecord>, String> {
    let url = format!("{}/products/{}/calls", API_BASE, urlencoding::encode(product_id));
    fetch_json::<Vec<CallRecord>>(&url).await
}

pub async fn get_call(id: &str) -> Result<CallRecord, String> {
    let url = format!("{}/calls/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<CallRecord>(&url).await
}

/// Log a new call for a product
pub async fn create_call(
    product_id: &str,
    contact: &str,
    submission: &Submission<BrowserFile>,
) -> Result<CallRecord, String> {
    let url = format!("{}/products/{}/calls", API_BASE, urlencoding::encode(product_id));
    let body = call_form_data(contact, submission)?;
    let response = Request::post(&url)
        .body(body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_data(response).await
}

/// Update an existing call; files already stored are kept unless replaced
pub async fn update_call(
    id: &str,
    contact: &str,
    submission: &Submission<BrowserFile>,
) -> Result<CallRecord, String> {
    let url = format!("{}/calls/{}", API_BASE, urlencoding::encode(id));
    let body = call_form_data(contact, submission)?;
    let response = Request::patch(&url)
        .body(body)
        .map_err(|e| format!("Failed to build request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_data(response).await
}

/// Multipart body: contact, status, feedback JSON and one part per new file.
/// The browser sets the multipart boundary header itself.
fn call_form_data(contact: &str, submission: &Submission<BrowserFile>) -> Result<FormData, String> {
    let js_err = |e: wasm_bindgen::JsValue| format!("Failed to build form data: {:?}", e);

    let form = FormData::new().map_err(js_err)?;
    form.append_with_str("contact", contact).map_err(js_err)?;
    form.append_with_str("status", submission.status.as_str())
        .map_err(js_err)?;
    form.append_with_str("feedback", &submission.feedback_json())
        .map_err(js_err)?;
    for (field, file) in &submission.files {
        form.append_with_blob_and_filename(field, file.file(), &file.file_name())
            .map_err(js_err)?;
    }
    Ok(form)
}

// ============================================================================
// Helpers
// ============================================================================

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_data(response).await
}

async fn put_json<T: serde::Serialize + ?Sized, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::put(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    read_data(response).await
}

async fn read_data<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, String> {
    let api_response: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if api_response.success {
        api_response.data.ok_or_else(|| "No data in response".to_string())
    } else {
        Err(api_response.error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}
