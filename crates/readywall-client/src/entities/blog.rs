//! Blog posts

use crate::entity::{Endpoints, Entity, Envelope};
use crate::form::{Draft, FieldErrors, FormMode};
use crate::upload::{ImageUpload, MultipartPayload, Payload};
use readywall_core::{Blog, BlogCategory, RecordId};
use serde::{Deserialize, Serialize};

impl Entity for Blog {
    const NAME: &'static str = "blog";
    const PLURAL: &'static str = "blogs";
    const ENDPOINTS: Endpoints = Endpoints {
        list: "/api/blogs",
        fetch: Some("/api/blogs/{id}"),
        create: Some("/api/blogs/create"),
        update: Some("/api/blogs/update/{id}"),
        delete: Some("/api/blogs/delete/{id}"),
    };
    const ENVELOPE: Envelope = Envelope::Keyed {
        one: "blog",
        many: "blogs",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.title, &self.meta_title, &self.meta_description]
    }

    fn filter_value(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

/// Blog form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogDraft {
    /// Title
    pub title: String,
    /// Category wire value
    pub category: String,
    /// SEO title
    pub meta_title: String,
    /// SEO description
    pub meta_description: String,
    /// Author
    pub author: String,
    /// New images; none on edit leaves the stored images alone
    #[serde(skip)]
    pub images: Vec<ImageUpload>,
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: BlogCategory::default().as_str().to_string(),
            meta_title: String::new(),
            meta_description: String::new(),
            author: String::new(),
            images: Vec::new(),
        }
    }
}

impl Draft for BlogDraft {
    type Record = Blog;

    fn from_record(blog: &Blog) -> Self {
        Self {
            title: blog.title.clone(),
            category: blog.category.as_str().to_string(),
            meta_title: blog.meta_title.clone(),
            meta_description: blog.meta_description.clone(),
            author: blog.author.clone(),
            images: Vec::new(),
        }
    }

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("title", &self.title, "Blog title is required");
        errors.require("author", &self.author, "Author name is required");
        errors
    }

    fn to_payload(&self, _mode: &FormMode) -> Payload {
        let mut form = MultipartPayload::new()
            .text("title", self.title.trim())
            .text("category", self.category.trim())
            .text("metaTitle", self.meta_title.trim())
            .text("metaDescription", self.meta_description.trim())
            .text("author", self.author.trim());
        for image in &self.images {
            form = form.file("image", image.clone());
        }
        Payload::Multipart(form)
    }

    fn apply_to(&self, blog: &Blog) -> Blog {
        Blog {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string().into(),
            meta_title: self.meta_title.trim().to_string(),
            meta_description: self.meta_description.trim().to_string(),
            author: self.author.trim().to_string(),
            ..blog.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_required_fields() {
        let errors = BlogDraft::default().validate(&FormMode::Create);

        assert_eq!(errors.get("title"), Some("Blog title is required"));
        assert_eq!(errors.get("author"), Some("Author name is required"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_default_category_is_other() {
        assert_eq!(BlogDraft::default().category, "other");
    }

    #[test]
    fn test_update_without_files_sends_no_image_part() {
        let draft = BlogDraft {
            title: "Choosing pavers".to_string(),
            author: "Meera".to_string(),
            ..BlogDraft::default()
        };

        let payload = draft.to_payload(&FormMode::Edit(RecordId::from("b1")));
        let form = payload.as_multipart();

        assert!(form.is_some_and(|form| form.files().is_empty()));
        assert_eq!(form.and_then(|form| form.field("metaTitle")), Some(""));
    }

    #[test]
    fn test_each_file_is_sent_under_image_key() {
        let draft = BlogDraft {
            images: vec![
                ImageUpload::from_bytes("a.jpg", "image/jpeg", vec![1]),
                ImageUpload::from_bytes("b.png", "image/png", vec![2]),
            ],
            ..BlogDraft::default()
        };

        let payload = draft.to_payload(&FormMode::Create);
        let keys: Vec<&str> = payload
            .as_multipart()
            .map(|form| form.files().iter().map(|(key, _)| key.as_str()).collect())
            .unwrap_or_default();

        assert_eq!(keys, vec!["image", "image"]);
    }
}
