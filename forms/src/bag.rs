//! The value bag: current values of one open form, keyed by field name

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{EditError, FieldError, FieldErrorKind};
use crate::field::{FieldDescriptor, FieldType};
use crate::value::{FieldInput, FieldValue, FileSlot, StoredFile};

/// Field name -> typed value. Created when a form opens, dropped when it closes.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueBag<F> {
    values: BTreeMap<String, FieldValue<F>>,
}

impl<F> Default for ValueBag<F> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<F> ValueBag<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field of the schema at its empty form
    pub fn for_schema(schema: &[FieldDescriptor]) -> Self {
        let values = schema
            .iter()
            .map(|field| (field.name.clone(), FieldValue::empty(field.field_type)))
            .collect();
        Self { values }
    }

    /// Seed from a persisted record.
    ///
    /// Entries for fields no longer in the schema are dropped and entries whose
    /// shape no longer fits the field (the schema changed since the record was
    /// saved) fall back to the empty form.
    pub fn from_record(schema: &[FieldDescriptor], record: &Map<String, Value>) -> Self {
        let values = schema
            .iter()
            .map(|field| {
                let value = record
                    .get(&field.name)
                    .and_then(|raw| FieldValue::from_json(field, raw).ok())
                    .unwrap_or_else(|| FieldValue::empty(field.field_type));
                (field.name.clone(), value)
            })
            .collect();
        Self { values }
    }

    /// Strict parse of submitted feedback: every problem is reported
    pub fn from_submission(
        schema: &[FieldDescriptor],
        feedback: &Map<String, Value>,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        for name in feedback.keys() {
            if !schema.iter().any(|f| f.name == *name) {
                errors.push(FieldError::new(name.clone(), FieldErrorKind::UnknownField));
            }
        }

        let mut bag = Self::for_schema(schema);
        for field in schema {
            let Some(raw) = feedback.get(&field.name) else {
                continue;
            };
            match FieldValue::from_json(field, raw) {
                Ok(value) => {
                    bag.values.insert(field.name.clone(), value);
                }
                Err(kind) => errors.push(FieldError::new(field.name.clone(), kind)),
            }
        }

        if errors.is_empty() {
            Ok(bag)
        } else {
            Err(errors)
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue<F>> {
        self.values.get(name)
    }

    /// Whether the field has no value (missing entries count as empty)
    pub fn is_empty_for(&self, field: &FieldDescriptor) -> bool {
        self.values
            .get(&field.name)
            .map(|v| v.field_type() != field.field_type || v.is_empty())
            .unwrap_or(true)
    }

    /// Route widget input into the field's value.
    ///
    /// A stored value whose variant no longer matches the descriptor is reset to
    /// the empty form before the input is applied.
    pub fn edit(&mut self, field: &FieldDescriptor, input: FieldInput<F>) -> Result<(), EditError> {
        let slot = self
            .values
            .entry(field.name.clone())
            .or_insert_with(|| FieldValue::empty(field.field_type));
        if slot.field_type() != field.field_type {
            *slot = FieldValue::empty(field.field_type);
        }
        slot.apply(field, input)
    }

    /// Keep a persisted file reference for a file field
    pub fn set_stored_file(&mut self, field: &FieldDescriptor, stored: StoredFile) -> Result<(), EditError> {
        if field.field_type != FieldType::File {
            return Err(EditError::IncompatibleInput {
                field: field.name.clone(),
                field_type: field.field_type,
                input: "stored file",
            });
        }
        let slot = self
            .values
            .entry(field.name.clone())
            .or_insert_with(|| FieldValue::File(FileSlot::default()));
        match slot {
            FieldValue::File(file) => file.stored = Some(stored),
            other => {
                *other = FieldValue::File(FileSlot {
                    stored: Some(stored),
                    chosen: None,
                })
            }
        }
        Ok(())
    }

    /// Stored file reference of a file field, if any
    pub fn stored_file(&self, name: &str) -> Option<&StoredFile> {
        match self.values.get(name) {
            Some(FieldValue::File(slot)) => slot.stored.as_ref(),
            _ => None,
        }
    }

    /// Reset every field to its empty form.
    ///
    /// Persisted file references survive: they belong to the saved record, not
    /// to what was entered, and still satisfy a required file field.
    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            match value {
                FieldValue::File(slot) => slot.chosen = None,
                other => *other = FieldValue::empty(other.field_type()),
            }
        }
    }

    /// Non-empty, non-file values as the feedback JSON object.
    ///
    /// File fields are never part of the feedback: new files travel as
    /// multipart parts and stored references stay on the server.
    pub fn to_feedback(&self, schema: &[FieldDescriptor]) -> Map<String, Value> {
        self.collect(schema, false)
    }

    /// Non-empty values including stored file references, as persisted
    pub fn to_record(&self, schema: &[FieldDescriptor]) -> Map<String, Value> {
        self.collect(schema, true)
    }

    fn collect(&self, schema: &[FieldDescriptor], include_files: bool) -> Map<String, Value> {
        let mut out = Map::new();
        for field in schema {
            let Some(value) = self.values.get(&field.name) else {
                continue;
            };
            if value.field_type() != field.field_type || value.is_empty() {
                continue;
            }
            match value {
                FieldValue::File(slot) => {
                    if include_files && slot.stored.is_some() {
                        out.insert(field.name.clone(), value.to_json());
                    }
                }
                _ => {
                    out.insert(field.name.clone(), value.to_json());
                }
            }
        }
        out
    }
}

impl<F: Clone> ValueBag<F> {
    /// Newly chosen files, in schema order
    pub fn chosen_files(&self, schema: &[FieldDescriptor]) -> Vec<(String, F)> {
        schema
            .iter()
            .filter_map(|field| match self.values.get(&field.name) {
                Some(FieldValue::File(FileSlot {
                    chosen: Some(file), ..
                })) if field.field_type == FieldType::File => Some((field.name.clone(), file.clone())),
                _ => None,
            })
            .collect()
    }

    /// Value of a field, or its empty form when absent or of a stale shape
    pub fn value_or_empty(&self, field: &FieldDescriptor) -> FieldValue<F> {
        match self.values.get(&field.name) {
            Some(v) if v.field_type() == field.field_type => v.clone(),
            _ => FieldValue::empty(field.field_type),
        }
    }
}
