//! Request bodies: JSON documents and multipart forms with image files

use crate::error::GatewayResult;
use readywall_core::config::UploadConfig;
use readywall_core::utils::image_mime_type;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// An image file ready to be sent as a multipart part
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Build an upload from bytes already in memory
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an image from disk, checking its type and size against `limits`
    ///
    /// # Errors
    ///
    /// Returns [`readywall_core::Error::InvalidUpload`] for a disallowed type or
    /// an oversized file, and an I/O error if the file cannot be read.
    pub async fn from_path(path: &Path, limits: &UploadConfig) -> readywall_core::Result<Self> {
        let invalid = |reason: String| readywall_core::Error::InvalidUpload {
            file: path.to_path_buf(),
            reason,
        };

        let mime_type = image_mime_type(path)
            .filter(|mime| limits.allowed_mime_types.iter().any(|allowed| allowed == mime))
            .ok_or_else(|| {
                invalid(format!(
                    "only {} images are accepted",
                    limits.allowed_mime_types.join(", ")
                ))
            })?;

        let size = tokio::fs::metadata(path).await?.len();
        if size > limits.max_image_bytes {
            return Err(invalid(format!(
                "file is {size} bytes, the limit is {} bytes",
                limits.max_image_bytes
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());

        debug!(file = %file_name, mime = mime_type, size, "image staged for upload");
        Ok(Self::from_bytes(file_name, mime_type, bytes))
    }

    /// File name sent with the part
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// MIME type sent with the part
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// File size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn into_part(self) -> GatewayResult<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)?)
    }
}

/// Multipart form contents, kept inspectable until the request is built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    files: Vec<(String, ImageUpload)>,
}

impl MultipartPayload {
    /// Empty form
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field
    pub fn text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Add a file part; repeated keys are sent as repeated parts
    pub fn file(mut self, key: impl Into<String>, upload: ImageUpload) -> Self {
        self.files.push((key.into(), upload));
        self
    }

    /// Text fields in insertion order
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first text field named `key`
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// File parts in insertion order
    pub fn files(&self) -> &[(String, ImageUpload)] {
        &self.files
    }

    pub(crate) fn into_form(self) -> GatewayResult<Form> {
        let mut form = Form::new();
        for (key, value) in self.fields {
            form = form.text(key, value);
        }
        for (key, upload) in self.files {
            form = form.part(key, upload.into_part()?);
        }
        Ok(form)
    }
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON document
    Json(Value),
    /// Multipart form, used whenever images are attached
    Multipart(MultipartPayload),
}

impl Payload {
    /// JSON body, if this is one
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Multipart(_) => None,
        }
    }

    /// Multipart body, if this is one
    pub const fn as_multipart(&self) -> Option<&MultipartPayload> {
        match self {
            Self::Multipart(form) => Some(form),
            Self::Json(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, len: usize) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; len]).unwrap();
        path
    }

    #[tokio::test]
    async fn test_from_path_accepts_allowed_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "paver.png", 64);

        let upload = ImageUpload::from_path(&path, &UploadConfig::default()).await.unwrap();

        assert_eq!(upload.file_name(), "paver.png");
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.len(), 64);
    }

    #[tokio::test]
    async fn test_from_path_rejects_disallowed_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "banner.gif", 8);

        let err = ImageUpload::from_path(&path, &UploadConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, readywall_core::Error::InvalidUpload { .. }));
        assert!(err.to_string().contains("image/jpeg"));
    }

    #[tokio::test]
    async fn test_from_path_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "huge.jpg", 2048);
        let limits = UploadConfig {
            max_image_bytes: 1024,
            ..UploadConfig::default()
        };

        let err = ImageUpload::from_path(&path, &limits).await.unwrap_err();

        assert!(err.to_string().contains("limit is 1024 bytes"));
    }

    #[test]
    fn test_multipart_keeps_repeated_keys_in_order() {
        let form = MultipartPayload::new()
            .text("name", "Paver")
            .text("specifications[dimensions][length]", "200")
            .file("images", ImageUpload::from_bytes("a.jpg", "image/jpeg", vec![1]))
            .file("images", ImageUpload::from_bytes("b.jpg", "image/jpeg", vec![2]));

        assert_eq!(form.field("specifications[dimensions][length]"), Some("200"));
        assert_eq!(form.files().len(), 2);
        assert_eq!(form.files()[1].1.file_name(), "b.jpg");
        assert!(form.into_form().is_ok());
    }
}
