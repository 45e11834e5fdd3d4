//! Error types for schema definitions, edits and feedback validation

use thiserror::Error;

use crate::field::FieldType;

/// A schema definition that cannot be used to render or validate a form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Field at position {0} has no name")]
    MissingName(usize),

    #[error("Duplicate field name '{0}'")]
    DuplicateName(String),

    #[error("Field '{0}' needs at least one option")]
    MissingOptions(String),

    #[error("Field '{field}': {bound} minimum is greater than its maximum")]
    InvertedBounds { field: String, bound: &'static str },

    #[error("Field '{field}' has an invalid max_file_size '{value}' (expected e.g. 512KB, 5MB, 1GB)")]
    InvalidFileSize { field: String, value: String },
}

/// An edit that was refused; the stored value is left untouched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("'{option}' is not an option of field '{field}'")]
    NotAnOption { field: String, option: String },

    #[error("Field '{field}' expects a number, got '{input}'")]
    NotANumber { field: String, input: String },

    #[error("Field '{field}' expects a date (YYYY-MM-DD), got '{input}'")]
    NotADate { field: String, input: String },

    #[error("Field '{field}' of type {field_type} does not accept {input} input")]
    IncompatibleInput {
        field: String,
        field_type: FieldType,
        input: &'static str,
    },
}

/// First required field without a value, in schema order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct MissingRequired {
    pub field: String,
}

/// One constraint violation found while validating submitted feedback
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", describe(.field, .kind))]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    Required,
    UnknownField,
    NotANumber,
    NotAString,
    NotADate,
    NotAList,
    NotAFileReference,
    /// An uploaded part was sent for a field that is not a file field
    NotAFileField,
    TooShort { min: u32 },
    TooLong { max: u32 },
    BelowMinimum { min: f64 },
    AboveMaximum { max: f64 },
    NotAnOption { options: Vec<String> },
    InvalidOption { value: String },
    ExtensionNotAllowed { extension: String, allowed: Vec<String> },
    FileTooLarge { limit: String },
}

fn describe(field: &str, kind: &FieldErrorKind) -> String {
    match kind {
        FieldErrorKind::Required => format!("Required field '{}' is missing", field),
        FieldErrorKind::UnknownField => format!("Unknown field '{}'", field),
        FieldErrorKind::NotANumber => format!("Field '{}' must be a valid number", field),
        FieldErrorKind::NotAString => format!("Field '{}' must be a string", field),
        FieldErrorKind::NotADate => {
            format!("Field '{}' must be a date in YYYY-MM-DD format", field)
        }
        FieldErrorKind::NotAList => format!("Field '{}' must be a list", field),
        FieldErrorKind::NotAFileReference => {
            format!("Field '{}' must reference an uploaded file", field)
        }
        FieldErrorKind::NotAFileField => format!("Field '{}' is not a file field", field),
        FieldErrorKind::TooShort { min } => {
            format!("Field '{}' must be at least {} characters", field, min)
        }
        FieldErrorKind::TooLong { max } => {
            format!("Field '{}' must be at most {} characters", field, max)
        }
        FieldErrorKind::BelowMinimum { min } => format!("Field '{}' must be at least {}", field, min),
        FieldErrorKind::AboveMaximum { max } => format!("Field '{}' must be at most {}", field, max),
        FieldErrorKind::NotAnOption { options } => {
            format!("Field '{}' must be one of: {}", field, options.join(", "))
        }
        FieldErrorKind::InvalidOption { value } => {
            format!("Field '{}' contains invalid option: {}", field, value)
        }
        FieldErrorKind::ExtensionNotAllowed { extension, allowed } => format!(
            "File extension '{}' not allowed for '{}'. Allowed: {}",
            extension,
            field,
            allowed.join(", ")
        ),
        FieldErrorKind::FileTooLarge { limit } => format!(
            "File size exceeds maximum allowed size of {} for '{}'",
            limit, field
        ),
    }
}
