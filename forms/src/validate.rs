//! Required-field policy and server-side constraint checks

use crate::bag::ValueBag;
use crate::error::{FieldError, FieldErrorKind, MissingRequired};
use crate::field::{FieldDescriptor, FieldType};
use crate::value::{Attachment, FieldValue};

/// First required field without a value, in schema order.
///
/// Non-file fields need a non-empty value (a non-empty list for checkbox);
/// file fields need a newly chosen file or a persisted one.
pub fn first_missing_required<'a, F>(
    schema: &'a [FieldDescriptor],
    bag: &ValueBag<F>,
) -> Option<&'a FieldDescriptor> {
    schema
        .iter()
        .find(|field| field.is_required && bag.is_empty_for(field))
}

pub fn check_required<F>(schema: &[FieldDescriptor], bag: &ValueBag<F>) -> Result<(), MissingRequired> {
    match first_missing_required(schema, bag) {
        Some(field) => Err(MissingRequired {
            field: field.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Check every constraint of the schema against the bag and report all
/// violations. Empty optional fields are not checked further.
pub fn validate_feedback<F: Attachment>(
    schema: &[FieldDescriptor],
    bag: &ValueBag<F>,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for field in schema {
        let value = bag.value_or_empty(field);
        if value.is_empty() {
            if field.is_required {
                errors.push(FieldError::new(field.name.clone(), FieldErrorKind::Required));
            }
            continue;
        }

        match &value {
            FieldValue::Text(s) | FieldValue::Textarea(s) => check_length(field, s, &mut errors),
            FieldValue::Number(Some(n)) => check_range(field, *n, &mut errors),
            FieldValue::Select(Some(s)) => {
                if !field.has_option(s) {
                    errors.push(FieldError::new(
                        field.name.clone(),
                        FieldErrorKind::NotAnOption {
                            options: field.options.clone(),
                        },
                    ));
                }
            }
            FieldValue::Checkbox(items) => {
                for item in items.iter().filter(|i| !field.has_option(i)) {
                    errors.push(FieldError::new(
                        field.name.clone(),
                        FieldErrorKind::InvalidOption { value: item.clone() },
                    ));
                }
            }
            FieldValue::File(slot) => {
                if let Some(file) = &slot.chosen {
                    check_file(field, file, &mut errors);
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_length(field: &FieldDescriptor, value: &str, errors: &mut Vec<FieldError>) {
    let len = value.chars().count() as u64;
    if let Some(min) = field.min_length {
        if len < u64::from(min) {
            errors.push(FieldError::new(field.name.clone(), FieldErrorKind::TooShort { min }));
        }
    }
    if let Some(max) = field.max_length {
        if len > u64::from(max) {
            errors.push(FieldError::new(field.name.clone(), FieldErrorKind::TooLong { max }));
        }
    }
}

fn check_range(field: &FieldDescriptor, value: f64, errors: &mut Vec<FieldError>) {
    if let Some(min) = field.min_value {
        if value < min {
            errors.push(FieldError::new(field.name.clone(), FieldErrorKind::BelowMinimum { min }));
        }
    }
    if let Some(max) = field.max_value {
        if value > max {
            errors.push(FieldError::new(field.name.clone(), FieldErrorKind::AboveMaximum { max }));
        }
    }
}

fn check_file<F: Attachment>(field: &FieldDescriptor, file: &F, errors: &mut Vec<FieldError>) {
    debug_assert_eq!(field.field_type, FieldType::File);

    let name = file.file_name();
    if !field.accepts_extension(&name) {
        errors.push(FieldError::new(
            field.name.clone(),
            FieldErrorKind::ExtensionNotAllowed {
                extension: file.extension(),
                allowed: field.allowed_extensions.clone(),
            },
        ));
    }

    // An unparsable limit is a schema problem, caught when the schema is saved
    if let Ok(Some(limit)) = field.max_file_bytes() {
        if file.size() > limit {
            errors.push(FieldError::new(
                field.name.clone(),
                FieldErrorKind::FileTooLarge {
                    limit: field.max_file_size.clone().unwrap_or_default(),
                },
            ));
        }
    }
}
