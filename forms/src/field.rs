//! Field descriptors as delivered by the product schema endpoint

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::SchemaError;

// ============================================================================
// Field Type
// ============================================================================

/// Closed set of widget types a feedback field can declare
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Number,
    Textarea,
    Date,
    Select,
    Checkbox,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Textarea,
        FieldType::Date,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::File,
    ];

    /// Wire name, as used in the `type` attribute of a descriptor
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Textarea => "textarea",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::File => "file",
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Short text",
            FieldType::Number => "Number",
            FieldType::Textarea => "Long text",
            FieldType::Date => "Date",
            FieldType::Select => "Single choice",
            FieldType::Checkbox => "Multiple choice",
            FieldType::File => "File upload",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Select and checkbox fields draw their values from `options`
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Checkbox)
    }

    /// Text and textarea fields honour `min_length`/`max_length`
    pub fn has_length(&self) -> bool {
        matches!(self, FieldType::Text | FieldType::Textarea)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// One entry of a product's feedback schema
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Lowercase extensions without the leading dot; empty allows any
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub allowed_extensions: Vec<String>,
    /// Size limit such as "512KB", "5MB" or "1GB"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_length(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_file_limits<I, S>(mut self, extensions: I, max_size: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self.max_file_size = max_size.map(String::from);
        self
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o == value)
    }

    /// Placeholder text for the rendered control
    pub fn placeholder(&self) -> String {
        match &self.description {
            Some(d) if !d.trim().is_empty() => d.clone(),
            _ => match self.field_type {
                FieldType::Select => format!("Select {}", self.name),
                _ => format!("Enter {}", self.name),
            },
        }
    }

    /// `max_file_size` in bytes, if set
    pub fn max_file_bytes(&self) -> Result<Option<u64>, SchemaError> {
        match &self.max_file_size {
            None => Ok(None),
            Some(raw) => parse_file_size(raw).map(Some).ok_or_else(|| {
                SchemaError::InvalidFileSize {
                    field: self.name.clone(),
                    value: raw.clone(),
                }
            }),
        }
    }

    /// Whether `file_name` carries one of the allowed extensions
    pub fn accepts_extension(&self, file_name: &str) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        let ext = extension_of(file_name);
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
    }

    /// Definition problems local to this descriptor
    fn definition_errors(&self, position: usize) -> Vec<SchemaError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(SchemaError::MissingName(position));
        }

        if self.field_type.has_options() && self.options.iter().all(|o| o.trim().is_empty()) {
            errors.push(SchemaError::MissingOptions(self.name.clone()));
        }

        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                errors.push(SchemaError::InvertedBounds {
                    field: self.name.clone(),
                    bound: "length",
                });
            }
        }

        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                errors.push(SchemaError::InvertedBounds {
                    field: self.name.clone(),
                    bound: "value",
                });
            }
        }

        if let Err(e) = self.max_file_bytes() {
            errors.push(e);
        }

        errors
    }
}

/// Lowercased extension of a file name, without the dot; empty if none
pub fn extension_of(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

fn parse_file_size(raw: &str) -> Option<u64> {
    let raw = raw.trim().to_ascii_uppercase();
    let (digits, multiplier) = if let Some(n) = raw.strip_suffix("KB") {
        (n, 1024u64)
    } else if let Some(n) = raw.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = raw.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else {
        return None;
    };
    digits.trim().parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Validate a whole schema: per-field definition checks plus unique names
pub fn validate_schema(fields: &[FieldDescriptor]) -> Result<(), Vec<SchemaError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (idx, field) in fields.iter().enumerate() {
        errors.extend(field.definition_errors(idx));
        if !field.name.trim().is_empty() && !seen.insert(field.name.as_str()) {
            errors.push(SchemaError::DuplicateName(field.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Trim names and options; drop attributes the field type does not use.
///
/// Applied to every schema before it is validated and stored.
pub fn normalize(mut descriptor: FieldDescriptor) -> FieldDescriptor {
    descriptor.name = descriptor.name.trim().to_string();
    descriptor.description = descriptor
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let ty = descriptor.field_type;
    if ty.has_options() {
        let mut options: Vec<String> = Vec::with_capacity(descriptor.options.len());
        for option in descriptor.options.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            if !options.iter().any(|o| o == option) {
                options.push(option.to_string());
            }
        }
        descriptor.options = options;
    } else {
        descriptor.options.clear();
    }
    if !ty.has_length() {
        descriptor.min_length = None;
        descriptor.max_length = None;
    }
    if ty != FieldType::Number {
        descriptor.min_value = None;
        descriptor.max_value = None;
    }
    if ty != FieldType::File {
        descriptor.allowed_extensions.clear();
        descriptor.max_file_size = None;
    } else {
        descriptor.allowed_extensions = descriptor
            .allowed_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
    }
    descriptor
}
