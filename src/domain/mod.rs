use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dialdesk_forms::{CallStatus, FieldDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub use dialdesk_forms::ProductStatus;

/// A product agents call about, with the feedback schema of its calls
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub feedback_fields: Vec<FieldDescriptor>,
}

/// One logged call and the feedback captured for it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CallRecord {
    pub id: Uuid,
    pub product_id: String,
    pub contact: String,
    pub status: CallStatus,
    pub feedback: Map<String, Value>,
    pub made_on: DateTime<Utc>,
}

#[async_trait]
pub trait ProductPort: Send + Sync {
    async fn list_products(&self) -> anyhow::Result<Vec<Product>>;
    async fn get_product(&self, id: &str) -> anyhow::Result<Option<Product>>;
    /// Replace a product's feedback schema; `None` when the product is unknown
    async fn update_feedback_fields(
        &self,
        id: &str,
        fields: Vec<FieldDescriptor>,
    ) -> anyhow::Result<Option<Product>>;
}

#[async_trait]
pub trait CallPort: Send + Sync {
    /// Calls of a product, newest first
    async fn list_calls(&self, product_id: &str) -> anyhow::Result<Vec<CallRecord>>;
    async fn get_call(&self, id: Uuid) -> anyhow::Result<Option<CallRecord>>;
    /// Insert or replace a record
    async fn save_call(&self, record: CallRecord) -> anyhow::Result<()>;
}
