//! Working copy of a product schema while its feedback fields are edited

use crate::error::{EditError, SchemaError};
use crate::field::{normalize, validate_schema, FieldDescriptor};
use crate::value::{FieldInput, FieldValue};

/// One field under edit, with the value its preview control currently shows
#[derive(Clone, Debug, PartialEq)]
pub struct DraftField<F> {
    pub id: u32,
    pub descriptor: FieldDescriptor,
    pub value: FieldValue<F>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchemaDraft<F> {
    fields: Vec<DraftField<F>>,
    next_id: u32,
}

impl<F> Default for SchemaDraft<F> {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            next_id: 1,
        }
    }
}

impl<F> SchemaDraft<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: &[FieldDescriptor]) -> Self {
        let mut draft = Self::new();
        for descriptor in schema {
            draft.add(descriptor.clone());
        }
        draft
    }

    pub fn fields(&self) -> &[DraftField<F>] {
        &self.fields
    }

    pub fn get(&self, id: u32) -> Option<&DraftField<F>> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a field and return its id
    pub fn add(&mut self, descriptor: FieldDescriptor) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let value = FieldValue::empty(descriptor.field_type);
        self.fields.push(DraftField { id, descriptor, value });
        id
    }

    /// Replace a field's descriptor. Returns false for an unknown id.
    ///
    /// A type change resets the preview value to the new type's empty form;
    /// otherwise the value is kept, minus options that no longer exist.
    pub fn update(&mut self, id: u32, descriptor: FieldDescriptor) -> bool {
        let Some(field) = self.fields.iter_mut().find(|f| f.id == id) else {
            return false;
        };

        if field.descriptor.field_type != descriptor.field_type {
            field.value = FieldValue::empty(descriptor.field_type);
        } else {
            match &mut field.value {
                FieldValue::Select(selected) => {
                    if selected.as_deref().is_some_and(|s| !descriptor.has_option(s)) {
                        *selected = None;
                    }
                }
                FieldValue::Checkbox(items) => items.retain(|i| descriptor.has_option(i)),
                _ => {}
            }
        }

        field.descriptor = descriptor;
        true
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.id != id);
        self.fields.len() != before
    }

    pub fn move_up(&mut self, id: u32) -> bool {
        match self.position(id) {
            Some(idx) if idx > 0 => {
                self.fields.swap(idx - 1, idx);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: u32) -> bool {
        match self.position(id) {
            Some(idx) if idx + 1 < self.fields.len() => {
                self.fields.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Feed preview input into a field's value
    pub fn edit_preview(&mut self, id: u32, input: FieldInput<F>) -> Result<(), EditError> {
        match self.fields.iter_mut().find(|f| f.id == id) {
            Some(field) => field.value.apply(&field.descriptor, input),
            None => Ok(()),
        }
    }

    /// Normalized, validated schema in the current order
    pub fn to_schema(&self) -> Result<Vec<FieldDescriptor>, Vec<SchemaError>> {
        let schema: Vec<FieldDescriptor> = self
            .fields
            .iter()
            .map(|f| normalize(f.descriptor.clone()))
            .collect();
        validate_schema(&schema)?;
        Ok(schema)
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.fields.iter().position(|f| f.id == id)
    }
}
