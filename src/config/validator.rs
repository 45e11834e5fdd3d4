use dialdesk_forms::{validate_schema, FieldDescriptor};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::{ServerSettings, Settings, UploadSettings};
use crate::domain::Product;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_server(&settings.server) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_uploads(&settings.uploads) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_products(&settings.products) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_uploads(uploads: &UploadSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if uploads.dir.as_os_str().is_empty() {
            errors.push(ValidationError::MissingField("uploads.dir".to_string()));
        }

        if uploads.max_body_bytes == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "uploads.max_body_bytes".to_string(),
                reason: "Body limit must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_products(products: &[Product]) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, product) in products.iter().enumerate() {
            if let Some(prev_idx) = seen_ids.insert(&product.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Product id '{}' appears at indices {} and {}",
                    product.id, prev_idx, idx
                )));
            }

            if product.id.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("products[{}].id", idx)));
            }

            if product.name.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("products[{}].name", idx)));
            }

            errors.extend(Self::schema_errors(idx, &product.feedback_fields));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn schema_errors(idx: usize, fields: &[FieldDescriptor]) -> Vec<ValidationError> {
        match validate_schema(fields) {
            Ok(()) => Vec::new(),
            Err(schema_errors) => schema_errors
                .into_iter()
                .map(|e| ValidationError::InvalidValue {
                    field: format!("products[{}].feedback_fields", idx),
                    reason: e.to_string(),
                })
                .collect(),
        }
    }
}
