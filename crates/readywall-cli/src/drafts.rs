//! Draft files and image attachments for create/update

use anyhow::{Context, Result, bail};
use readywall_client::entities::{BlogDraft, InquiryDraft, LeadDraft, ProductDraft};
use readywall_client::{Draft, Entity, ImageUpload};
use readywall_core::config::UploadConfig;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A draft that can be filled from a JSON file
pub trait DraftFile: Draft + Serialize + DeserializeOwned {
    /// Attach picked images; drafts without uploads refuse any
    ///
    /// # Errors
    ///
    /// Returns an error if images were given for a record kind without uploads.
    fn attach_images(&mut self, images: Vec<ImageUpload>) -> Result<()> {
        if images.is_empty() {
            return Ok(());
        }
        bail!(
            "{} records have no images",
            <Self::Record as Entity>::NAME
        )
    }
}

impl DraftFile for LeadDraft {}

impl DraftFile for InquiryDraft {}

impl DraftFile for ProductDraft {
    fn attach_images(&mut self, images: Vec<ImageUpload>) -> Result<()> {
        self.images = images;
        Ok(())
    }
}

impl DraftFile for BlogDraft {
    fn attach_images(&mut self, images: Vec<ImageUpload>) -> Result<()> {
        self.images = images;
        Ok(())
    }
}

/// Read a draft file; it must hold a JSON object
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON object.
pub async fn read_patch(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read draft {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("draft {} is not valid JSON", path.display()))?;
    if !value.is_object() {
        bail!("draft {} must be a JSON object", path.display());
    }
    Ok(value)
}

/// Merge `patch` into `base`; objects merge key by key, anything else replaces
pub fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Apply a draft file on top of the form's current fields
///
/// # Errors
///
/// Returns an error naming the field when the merged draft has the wrong shape.
pub fn overlay<D: DraftFile>(fields: &D, patch: Value) -> Result<D> {
    let mut value = serde_json::to_value(fields)?;
    merge(&mut value, patch);
    serde_json::from_value(value).context("draft fields must be strings, as typed into the form")
}

/// Read picked images, rejecting disallowed or oversized files before any request
///
/// # Errors
///
/// Returns an error for the first file that cannot be read or is rejected.
pub async fn load_images(paths: &[PathBuf], limits: &UploadConfig) -> Result<Vec<ImageUpload>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(ImageUpload::from_path(path, limits).await?);
    }
    Ok(images)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_untouched_nested_fields() {
        let mut base = json!({
            "name": "Paver",
            "specifications": {"dimensions": {"length": "200", "unit": "mm"}, "color": "Red"}
        });

        merge(
            &mut base,
            json!({"specifications": {"dimensions": {"length": "250"}}}),
        );

        assert_eq!(
            base,
            json!({
                "name": "Paver",
                "specifications": {"dimensions": {"length": "250", "unit": "mm"}, "color": "Red"}
            })
        );
    }

    #[test]
    fn test_overlay_fills_only_given_fields() {
        let existing = LeadDraft {
            name: "Asha".to_string(),
            city: "Pune".to_string(),
            ..LeadDraft::default()
        };

        let merged = overlay(&existing, json!({"city": "Nashik"})).unwrap();

        assert_eq!(merged.name, "Asha");
        assert_eq!(merged.city, "Nashik");
    }

    #[test]
    fn test_overlay_rejects_numbers() {
        let result = overlay(&ProductDraft::default(), json!({"price": 45}));

        assert!(result.is_err());
    }

    #[test]
    fn test_images_only_attach_to_upload_drafts() {
        let image = ImageUpload::from_bytes("a.jpg", "image/jpeg", vec![1]);

        let mut lead = LeadDraft::default();
        assert!(lead.attach_images(vec![image.clone()]).is_err());
        assert!(lead.attach_images(Vec::new()).is_ok());

        let mut blog = BlogDraft::default();
        blog.attach_images(vec![image]).unwrap();
        assert_eq!(blog.images.len(), 1);
    }

    #[tokio::test]
    async fn test_read_patch_requires_object() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("list.json");
        let object = dir.path().join("object.json");
        tokio::fs::write(&list, "[1, 2]").await.unwrap();
        tokio::fs::write(&object, r#"{"title": "Choosing pavers"}"#).await.unwrap();

        assert!(read_patch(&list).await.is_err());
        assert_eq!(
            read_patch(&object).await.unwrap(),
            json!({"title": "Choosing pavers"})
        );
        assert!(read_patch(&dir.path().join("missing.json")).await.is_err());
    }
}
