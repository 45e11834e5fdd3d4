//! Shared types for the Dialdesk Web UI
//!
//! These types mirror the backend API response structures. Schema and value
//! types come from `dialdesk-forms`, which the server uses as well.

use dialdesk_forms::{CallStatus, FieldDescriptor, ProductStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic API response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
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

impl Product {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CallRecord {
    pub id: String,
    pub product_id: String,
    pub contact: String,
    pub status: CallStatus,
    #[serde(default)]
    pub feedback: Map<String, Value>,
    pub made_on: String,
}

/// "2026-03-01T09:30:12.123Z" -> "2026-03-01 09:30"
pub fn short_timestamp(raw: &str) -> String {
    let trimmed: String = raw.chars().take(16).collect();
    trimmed.replacen('T', " ", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_timestamp() {
        assert_eq!(short_timestamp("2026-03-01T09:30:12.123Z"), "2026-03-01 09:30");
        assert_eq!(short_timestamp("2026-03-01"), "2026-03-01");
    }

    #[test]
    fn test_call_record_from_api() {
        let record: CallRecord = serde_json::from_value(serde_json::json!({
            "id": "5f0c",
            "product_id": "loans",
            "contact": "Ada",
            "status": "busy",
            "feedback": {},
            "made_on": "2026-03-01T09:30:12Z"
        }))
        .unwrap();
        assert_eq!(record.status, CallStatus::Busy);
    }

    #[test]
    fn test_disabled_product_from_api() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "cards",
            "name": "Credit cards",
            "status": "disabled"
        }))
        .unwrap();
        assert!(!product.is_active());
        assert!(product.feedback_fields.is_empty());
    }
}
