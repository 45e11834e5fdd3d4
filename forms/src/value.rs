//! Typed field values and the coercion rules between widgets, JSON and the bag

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{EditError, FieldErrorKind};
use crate::field::{extension_of, FieldDescriptor, FieldType};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Attachments
// ============================================================================

/// A file chosen for upload but not yet stored
pub trait Attachment: Clone {
    fn file_name(&self) -> String;

    /// Size in bytes
    fn size(&self) -> u64;

    fn extension(&self) -> String {
        extension_of(&self.file_name())
    }
}

/// Metadata of a file the server already stored for a record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_name: String,
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Value of a file field: a persisted reference, a new choice, both or neither
#[derive(Clone, Debug, PartialEq)]
pub struct FileSlot<F> {
    pub stored: Option<StoredFile>,
    pub chosen: Option<F>,
}

impl<F> Default for FileSlot<F> {
    fn default() -> Self {
        Self {
            stored: None,
            chosen: None,
        }
    }
}

impl<F> FileSlot<F> {
    /// A new file or a previous upload satisfies a required file field
    pub fn is_satisfied(&self) -> bool {
        self.chosen.is_some() || self.stored.is_some()
    }
}

// ============================================================================
// Field Value
// ============================================================================

/// Value held for one field; the variant always matches the field's type
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<F> {
    Text(String),
    Number(Option<f64>),
    Textarea(String),
    Date(Option<NaiveDate>),
    Select(Option<String>),
    Checkbox(Vec<String>),
    File(FileSlot<F>),
}

/// Raw input coming from a rendered control
#[derive(Clone, Debug, PartialEq)]
pub enum FieldInput<F> {
    /// Current text of an input, textarea, date or select element
    Raw(String),
    /// One checkbox option changed
    Toggle { option: String, checked: bool },
    /// File picker selection; `None` when the picker was cleared
    File(Option<F>),
}

impl<F> FieldInput<F> {
    fn kind(&self) -> &'static str {
        match self {
            FieldInput::Raw(_) => "text",
            FieldInput::Toggle { .. } => "toggle",
            FieldInput::File(_) => "file",
        }
    }
}

impl<F> FieldValue<F> {
    /// The empty form of a type: `[]` for checkbox, `""` for everything else
    pub fn empty(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Number => FieldValue::Number(None),
            FieldType::Textarea => FieldValue::Textarea(String::new()),
            FieldType::Date => FieldValue::Date(None),
            FieldType::Select => FieldValue::Select(None),
            FieldType::Checkbox => FieldValue::Checkbox(Vec::new()),
            FieldType::File => FieldValue::File(FileSlot::default()),
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Number(_) => FieldType::Number,
            FieldValue::Textarea(_) => FieldType::Textarea,
            FieldValue::Date(_) => FieldType::Date,
            FieldValue::Select(_) => FieldType::Select,
            FieldValue::Checkbox(_) => FieldType::Checkbox,
            FieldValue::File(_) => FieldType::File,
        }
    }

    /// No value entered; a stored file counts as a value
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Textarea(s) => s.trim().is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Select(s) => s.is_none(),
            FieldValue::Checkbox(items) => items.is_empty(),
            FieldValue::File(slot) => !slot.is_satisfied(),
        }
    }

    /// Text shown in the control for this value
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) | FieldValue::Textarea(s) => s.clone(),
            FieldValue::Number(n) => n.map(format_number).unwrap_or_default(),
            FieldValue::Date(d) => d.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            FieldValue::Select(s) => s.clone().unwrap_or_default(),
            FieldValue::Checkbox(items) => items.join(", "),
            FieldValue::File(slot) => slot
                .stored
                .as_ref()
                .map(|f| f.file_name.clone())
                .unwrap_or_default(),
        }
    }

    pub fn is_checked(&self, option: &str) -> bool {
        matches!(self, FieldValue::Checkbox(items) if items.iter().any(|i| i == option))
    }

    /// JSON shape of the value; a file that is only chosen, not stored, has none
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) | FieldValue::Textarea(s) => Value::String(s.clone()),
            FieldValue::Number(Some(n)) => number_to_json(*n),
            FieldValue::Number(None) | FieldValue::Date(None) | FieldValue::Select(None) => {
                Value::String(String::new())
            }
            FieldValue::Date(Some(d)) => Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::Select(Some(s)) => Value::String(s.clone()),
            FieldValue::Checkbox(items) => json!(items),
            FieldValue::File(slot) => slot
                .stored
                .as_ref()
                .and_then(|f| serde_json::to_value(f).ok())
                .unwrap_or_else(|| Value::String(String::new())),
        }
    }

    /// Coerce a JSON value into the shape declared by `descriptor`.
    ///
    /// Accepts the pre-coercion shapes a browser may send: numeric strings for
    /// numbers, `""`/`null` for any empty value.
    pub fn from_json(descriptor: &FieldDescriptor, value: &Value) -> Result<Self, FieldErrorKind> {
        if value.is_null() {
            return Ok(Self::empty(descriptor.field_type));
        }

        match descriptor.field_type {
            FieldType::Text => expect_string(value).map(FieldValue::Text),
            FieldType::Textarea => expect_string(value).map(FieldValue::Textarea),
            FieldType::Number => match value {
                Value::Number(n) => n
                    .as_f64()
                    .filter(|n| n.is_finite())
                    .map(|n| FieldValue::Number(Some(n)))
                    .ok_or(FieldErrorKind::NotANumber),
                Value::String(s) => parse_number(s)
                    .map(FieldValue::Number)
                    .ok_or(FieldErrorKind::NotANumber),
                _ => Err(FieldErrorKind::NotANumber),
            },
            FieldType::Date => match value {
                Value::String(s) => parse_date(s)
                    .map(FieldValue::Date)
                    .ok_or(FieldErrorKind::NotADate),
                _ => Err(FieldErrorKind::NotADate),
            },
            FieldType::Select => {
                let s = expect_string(value)?;
                if s.is_empty() {
                    Ok(FieldValue::Select(None))
                } else if descriptor.has_option(&s) {
                    Ok(FieldValue::Select(Some(s)))
                } else {
                    Err(FieldErrorKind::NotAnOption {
                        options: descriptor.options.clone(),
                    })
                }
            }
            FieldType::Checkbox => {
                let items = value.as_array().ok_or(FieldErrorKind::NotAList)?;
                let mut selected: Vec<String> = Vec::with_capacity(items.len());
                for item in items {
                    let option = item.as_str().ok_or(FieldErrorKind::NotAList)?;
                    if !descriptor.has_option(option) {
                        return Err(FieldErrorKind::InvalidOption {
                            value: option.to_string(),
                        });
                    }
                    if !selected.iter().any(|s| s == option) {
                        selected.push(option.to_string());
                    }
                }
                Ok(FieldValue::Checkbox(selected))
            }
            FieldType::File => match value {
                Value::String(s) if s.is_empty() => Ok(Self::empty(FieldType::File)),
                Value::Object(_) => serde_json::from_value::<StoredFile>(value.clone())
                    .map(|stored| {
                        FieldValue::File(FileSlot {
                            stored: Some(stored),
                            chosen: None,
                        })
                    })
                    .map_err(|_| FieldErrorKind::NotAFileReference),
                _ => Err(FieldErrorKind::NotAFileReference),
            },
        }
    }

    /// Apply widget input. On error the value is left as it was.
    pub fn apply(&mut self, descriptor: &FieldDescriptor, input: FieldInput<F>) -> Result<(), EditError> {
        let incompatible = |input: &FieldInput<F>| EditError::IncompatibleInput {
            field: descriptor.name.clone(),
            field_type: descriptor.field_type,
            input: input.kind(),
        };

        match (self, input) {
            (FieldValue::Text(current), FieldInput::Raw(raw))
            | (FieldValue::Textarea(current), FieldInput::Raw(raw)) => {
                *current = raw;
                Ok(())
            }
            (FieldValue::Number(current), FieldInput::Raw(raw)) => {
                *current = parse_number(&raw).ok_or_else(|| EditError::NotANumber {
                    field: descriptor.name.clone(),
                    input: raw.clone(),
                })?;
                Ok(())
            }
            (FieldValue::Date(current), FieldInput::Raw(raw)) => {
                *current = parse_date(&raw).ok_or_else(|| EditError::NotADate {
                    field: descriptor.name.clone(),
                    input: raw.clone(),
                })?;
                Ok(())
            }
            (FieldValue::Select(current), FieldInput::Raw(raw)) => {
                if raw.is_empty() {
                    *current = None;
                } else if descriptor.has_option(&raw) {
                    *current = Some(raw);
                } else {
                    return Err(EditError::NotAnOption {
                        field: descriptor.name.clone(),
                        option: raw,
                    });
                }
                Ok(())
            }
            (FieldValue::Checkbox(items), FieldInput::Toggle { option, checked }) => {
                if !descriptor.has_option(&option) {
                    return Err(EditError::NotAnOption {
                        field: descriptor.name.clone(),
                        option,
                    });
                }
                let present = items.iter().any(|i| *i == option);
                if checked && !present {
                    items.push(option);
                } else if !checked && present {
                    items.retain(|i| *i != option);
                }
                Ok(())
            }
            (FieldValue::File(slot), FieldInput::File(chosen)) => {
                slot.chosen = chosen;
                Ok(())
            }
            (_, input) => Err(incompatible(&input)),
        }
    }
}

fn expect_string(value: &Value) -> Result<String, FieldErrorKind> {
    value
        .as_str()
        .map(String::from)
        .ok_or(FieldErrorKind::NotAString)
}

/// `""` (after trimming) is empty; anything else must parse as a finite number
fn parse_number(raw: &str) -> Option<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite()).map(Some)
}

fn parse_date(raw: &str) -> Option<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok().map(Some)
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}
