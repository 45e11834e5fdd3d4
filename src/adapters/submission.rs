//! Multipart call submissions: parsing, validation against the product schema
//! and storing the attached files

use axum::extract::Multipart;
use bytes::Bytes;
use dialdesk_forms::{
    validate_feedback, Attachment, CallStatus, FieldDescriptor, FieldError, FieldErrorKind, FieldInput,
    FieldType, ValueBag,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::adapters::api_handler::ApiError;
use crate::adapters::file_storage::UploadStore;

/// A file part of a call submission, held in memory until validated
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Attachment for UploadedFile {
    fn file_name(&self) -> String {
        self.file_name.clone()
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Parsed parts of a create/update call request
#[derive(Debug, Default)]
pub struct CallSubmission {
    pub contact: Option<String>,
    pub status: Option<CallStatus>,
    pub feedback: Map<String, Value>,
    pub files: Vec<(String, UploadedFile)>,
}

impl CallSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "contact" => {
                    let text = field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    submission.contact = Some(text.trim().to_string());
                }
                "status" => {
                    let text = field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    let status = CallStatus::parse(text.trim())
                        .ok_or_else(|| ApiError::BadRequest(format!("Invalid call status '{}'", text.trim())))?;
                    submission.status = Some(status);
                }
                "feedback" => {
                    let text = field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    submission.feedback = parse_feedback(&text)?;
                }
                "" => return Err(ApiError::BadRequest("Multipart part without a name".to_string())),
                _ => {
                    let Some(file_name) = field.file_name().map(str::to_string) else {
                        return Err(ApiError::BadRequest(format!("Unexpected form part '{}'", name)));
                    };
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                    // An untouched file input still posts an empty, unnamed part
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    submission.files.push((
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    ));
                }
            }
        }

        Ok(submission)
    }
}

fn parse_feedback(text: &str) -> Result<Map<String, Value>, ApiError> {
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest("Feedback must be a JSON object".to_string())),
        Err(e) => Err(ApiError::BadRequest(format!("Invalid feedback JSON: {}", e))),
    }
}

/// Build the bag for a completed call: submitted values, new uploads, and
/// file references carried over from the record being updated.
///
/// File references inside the submitted JSON are ignored; only the server
/// hands them out.
pub fn collect_feedback(
    schema: &[FieldDescriptor],
    feedback: &Map<String, Value>,
    files: Vec<(String, UploadedFile)>,
    previous: Option<&Map<String, Value>>,
) -> Result<ValueBag<UploadedFile>, Vec<FieldError>> {
    let mut errors = Vec::new();

    let submitted: Map<String, Value> = feedback
        .iter()
        .filter(|(name, _)| {
            !schema
                .iter()
                .any(|f| f.name == **name && f.field_type == FieldType::File)
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    // On parse errors keep checking the values that did parse
    let mut bag = match ValueBag::from_submission(schema, &submitted) {
        Ok(bag) => bag,
        Err(e) => {
            errors.extend(e);
            ValueBag::from_record(schema, &submitted)
        }
    };

    if let Some(previous) = previous {
        let prior = ValueBag::<UploadedFile>::from_record(schema, previous);
        for field in schema.iter().filter(|f| f.field_type == FieldType::File) {
            if let Some(stored) = prior.stored_file(&field.name) {
                // field type checked above, cannot fail
                let _ = bag.set_stored_file(field, stored.clone());
            }
        }
    }

    for (name, file) in files {
        match schema.iter().find(|f| f.name == name) {
            None => errors.push(FieldError::new(name, FieldErrorKind::UnknownField)),
            Some(field) if field.field_type != FieldType::File => {
                errors.push(FieldError::new(name, FieldErrorKind::NotAFileField))
            }
            Some(field) => {
                if let Err(e) = bag.edit(field, FieldInput::File(Some(file))) {
                    tracing::warn!("Could not attach upload to '{}': {}", field.name, e);
                }
            }
        }
    }

    if let Err(e) = validate_feedback(schema, &bag) {
        let reported: Vec<String> = errors.iter().map(|e| e.field.clone()).collect();
        errors.extend(e.into_iter().filter(|e| !reported.contains(&e.field)));
    }

    if errors.is_empty() {
        Ok(bag)
    } else {
        Err(errors)
    }
}

/// Write newly chosen files and return the feedback object to persist
pub async fn store_feedback(
    uploads: &UploadStore,
    call_id: Uuid,
    schema: &[FieldDescriptor],
    mut bag: ValueBag<UploadedFile>,
) -> Result<Map<String, Value>, ApiError> {
    for (name, file) in bag.chosen_files(schema) {
        let stored = uploads.save(call_id, &name, &file).await?;
        if let Some(field) = schema.iter().find(|f| f.name == name) {
            bag.set_stored_file(field, stored)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
            bag.edit(field, FieldInput::File(None))
                .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
        }
    }
    Ok(bag.to_record(schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialdesk_forms::StoredFile;
    use serde_json::json;

    fn schema() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("Outcome", FieldType::Select)
                .with_options(["Sold", "Declined"])
                .required(),
            FieldDescriptor::new("Proof", FieldType::File)
                .with_file_limits(["pdf"], Some("1KB"))
                .required(),
        ]
    }

    fn upload(name: &str, size: usize) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_feedback() {
        assert!(parse_feedback("").unwrap().is_empty());
        assert_eq!(parse_feedback(r#"{"a": 1}"#).unwrap()["a"], json!(1));
        assert!(parse_feedback("[1, 2]").is_err());
        assert!(parse_feedback("{oops").is_err());
    }

    #[test]
    fn test_new_upload_is_validated() {
        let errors = collect_feedback(
            &schema(),
            &object(json!({"Outcome": "Sold"})),
            vec![("Proof".to_string(), upload("setup.exe", 10))],
            None,
        )
        .unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "File extension 'exe' not allowed for 'Proof'. Allowed: pdf"
        );

        let errors = collect_feedback(
            &schema(),
            &object(json!({"Outcome": "Sold"})),
            vec![("Proof".to_string(), upload("big.pdf", 4096))],
            None,
        )
        .unwrap_err();
        assert_eq!(errors[0].kind, FieldErrorKind::FileTooLarge { limit: "1KB".to_string() });
    }

    #[test]
    fn test_previous_file_satisfies_required() {
        let previous = object(json!({
            "Outcome": "Sold",
            "Proof": {"file_name": "old.pdf", "file_url": "/uploads/calls/x/proof/old.pdf"}
        }));
        let bag = collect_feedback(&schema(), &object(json!({"Outcome": "Declined"})), vec![], Some(&previous))
            .unwrap();

        assert_eq!(bag.stored_file("Proof").map(|f| f.file_name.as_str()), Some("old.pdf"));
        let record = bag.to_record(&schema());
        assert_eq!(record["Outcome"], json!("Declined"));
    }

    #[test]
    fn test_client_file_references_are_ignored() {
        let forged = object(json!({
            "Outcome": "Sold",
            "Proof": {"file_name": "x.pdf", "file_url": "/elsewhere/x.pdf"}
        }));
        let errors = collect_feedback(&schema(), &forged, vec![], None).unwrap_err();
        assert_eq!(errors[0].to_string(), "Required field 'Proof' is missing");
    }

    #[test]
    fn test_upload_for_non_file_field() {
        let errors = collect_feedback(
            &schema(),
            &object(json!({"Outcome": "Sold"})),
            vec![
                ("Outcome".to_string(), upload("a.pdf", 1)),
                ("Photo".to_string(), upload("a.pdf", 1)),
            ],
            None,
        )
        .unwrap_err();
        let kinds: Vec<FieldErrorKind> = errors.into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&FieldErrorKind::NotAFileField));
        assert!(kinds.contains(&FieldErrorKind::UnknownField));
    }

    #[tokio::test]
    async fn test_store_feedback_records_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = UploadStore::local(dir.path()).unwrap();
        let schema = schema();
        let bag = collect_feedback(
            &schema,
            &object(json!({"Outcome": "Sold"})),
            vec![("Proof".to_string(), upload("proof.pdf", 12))],
            None,
        )
        .unwrap();

        let record = store_feedback(&uploads, Uuid::new_v4(), &schema, bag).await.unwrap();
        let stored: StoredFile = serde_json::from_value(record["Proof"].clone()).unwrap();
        assert_eq!(stored.file_name, "proof.pdf");
        assert!(stored.file_url.starts_with("/uploads/calls/"));
    }
}
