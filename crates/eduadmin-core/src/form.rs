//! Captured form fields, the equivalent of a browser `FormData`.

use std::path::Path;

use anyhow::{Context, Result};

/// A single field value. Files carry their bytes so the payload is self-contained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File {
        filename: String,
        mime_type: String,
        data: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// Ordered list of named fields. Names may repeat, as with multi-value inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: Vec<FormField>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        });
    }

    pub fn push_file(
        &mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        data: Vec<u8>,
    ) {
        self.fields.push(FormField {
            name: name.into(),
            value: FieldValue::File {
                filename: filename.into(),
                mime_type: mime_type.into(),
                data,
            },
        });
    }

    /// Read a file from disk into a file field, guessing the MIME type from its extension.
    pub fn attach_path(&mut self, name: impl Into<String>, path: &Path) -> Result<()> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read attachment: {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime_type = mime_for_extension(path);
        self.push_file(name, filename, mime_type, data);
        Ok(())
    }

    /// Replace every value of `name` with a single text value (a hidden input being set).
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields.retain(|f| f.name != name);
        self.push_text(name, value);
    }

    /// First text value for `name`
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FieldValue::Text(v) if f.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Clear every field, like `form.reset()` on a form with no default values.
    pub fn reset(&mut self) {
        self.fields.clear();
    }
}

fn mime_for_extension(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "zip" => "application/zip",
        _ => "application/octet-stream",
    }
}
