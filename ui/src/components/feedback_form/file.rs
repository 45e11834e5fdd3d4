//! Browser file handles as form attachments

use dialdesk_forms::{Attachment, FieldDescriptor};
use leptos::web_sys;

/// A file picked in the browser and not uploaded yet
#[derive(Clone, Debug)]
pub struct BrowserFile(web_sys::File);

impl BrowserFile {
    pub fn new(file: web_sys::File) -> Self {
        Self(file)
    }

    pub fn file(&self) -> &web_sys::File {
        &self.0
    }
}

impl Attachment for BrowserFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }
}

/// Value for the picker's `accept` attribute, e.g. ".pdf,.png"
pub fn accept_attribute(field: &FieldDescriptor) -> Option<String> {
    if field.allowed_extensions.is_empty() {
        return None;
    }
    Some(
        field
            .allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Hint shown under the picker
pub fn file_hint(field: &FieldDescriptor) -> Option<String> {
    let mut parts = Vec::new();
    if !field.allowed_extensions.is_empty() {
        parts.push(format!("Allowed: {}", field.allowed_extensions.join(", ")));
    }
    if let Some(size) = &field.max_file_size {
        parts.push(format!("Max size: {}", size));
    }
    (!parts.is_empty()).then(|| parts.join(" · "))
}
