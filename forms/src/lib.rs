//! # Dialdesk forms
//!
//! Products in Dialdesk carry a server-defined feedback schema: an ordered list
//! of [`FieldDescriptor`]s. This crate holds everything about those schemas that
//! does not depend on a rendering framework, so the browser UI and the server
//! agree on one set of rules:
//!
//! - **Field types**: the closed [`FieldType`] enumeration and its descriptor
//! - **Values**: [`FieldValue`], one variant per field type, kept in a [`ValueBag`]
//! - **Edits**: widget input coerced into the bag through [`FieldInput`]
//! - **Required policy**: [`check_required`] and the call status gate in [`Submission`]
//! - **Server validation**: [`validate_feedback`] for constraints the browser cannot enforce
//! - **Schema editing**: [`SchemaDraft`] for the product feedback-field editor
//!
//! File handles differ per host (a browser `File`, an uploaded byte buffer), so
//! values are generic over an [`Attachment`].

pub mod bag;
pub mod draft;
pub mod error;
pub mod field;
pub mod product;
pub mod submission;
pub mod validate;
pub mod value;

pub use bag::ValueBag;
pub use draft::{DraftField, SchemaDraft};
pub use error::{EditError, FieldError, FieldErrorKind, MissingRequired, SchemaError};
pub use field::{normalize, validate_schema, FieldDescriptor, FieldType};
pub use product::ProductStatus;
pub use submission::{CallStatus, Submission};
pub use validate::{check_required, first_missing_required, validate_feedback};
pub use value::{Attachment, FieldInput, FieldValue, FileSlot, StoredFile};
