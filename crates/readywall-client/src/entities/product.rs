//! Products

use crate::entity::{Endpoints, Entity, Envelope};
use crate::form::{Draft, FieldErrors, FormMode};
use crate::upload::{ImageUpload, MultipartPayload, Payload};
use readywall_core::types::{Dimensions, DimensionUnit, Specifications};
use readywall_core::utils::{parse_price, parse_quantity};
use readywall_core::{Product, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

impl Entity for Product {
    const NAME: &'static str = "product";
    const PLURAL: &'static str = "products";
    const ENDPOINTS: Endpoints = Endpoints {
        list: "/api/products",
        fetch: Some("/api/products/{id}"),
        create: Some("/api/products/createProduct"),
        update: Some("/api/products/{id}"),
        delete: Some("/api/products/{id}"),
    };
    const ENVELOPE: Envelope = Envelope::Keyed {
        one: "product",
        many: "products",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }

    fn filter_value(&self) -> Option<&str> {
        self.category.as_ref().map(|category| category.as_str())
    }
}

/// Dimension fields as typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimensionsDraft {
    /// Length
    pub length: String,
    /// Width
    pub width: String,
    /// Height
    pub height: String,
    /// Unit wire value
    pub unit: String,
}

impl Default for DimensionsDraft {
    fn default() -> Self {
        Self {
            length: String::new(),
            width: String::new(),
            height: String::new(),
            unit: DimensionUnit::default().as_str().to_string(),
        }
    }
}

/// Specification fields as typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationsDraft {
    /// Dimensions
    pub dimensions: DimensionsDraft,
    /// Strength rating
    pub strength: String,
    /// Colour
    pub color: String,
    /// Texture
    pub texture: String,
}

/// Product form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductDraft {
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Category wire value
    pub category: String,
    /// Unit wire value
    pub unit: String,
    /// Price as typed
    pub price: String,
    /// Stock as typed
    pub stock: String,
    /// Available for order
    pub is_available: bool,
    /// Specifications
    pub specifications: SpecificationsDraft,
    /// New images; on edit, any file replaces the stored set
    #[serde(skip)]
    pub images: Vec<ImageUpload>,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            category: String::new(),
            unit: String::new(),
            price: String::new(),
            stock: String::new(),
            is_available: true,
            specifications: SpecificationsDraft::default(),
            images: Vec::new(),
        }
    }
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn dimension(value: &str) -> Option<f64> {
    parse_price(value).filter(|v| *v >= 0.0)
}

impl ProductDraft {
    fn dimension_fields(&self) -> [(&'static str, &str); 3] {
        let dims = &self.specifications.dimensions;
        [
            ("length", dims.length.as_str()),
            ("width", dims.width.as_str()),
            ("height", dims.height.as_str()),
        ]
    }

    fn multipart(&self) -> MultipartPayload {
        let specs = &self.specifications;
        let mut form = MultipartPayload::new()
            .text("name", self.name.trim())
            .text("description", self.description.trim())
            .text("category", self.category.trim())
            .text("unit", self.unit.trim())
            .text("price", self.price.trim())
            .text("stock", self.stock.trim())
            .text("isAvailable", self.is_available.to_string());

        for (key, value) in self.dimension_fields() {
            if !value.trim().is_empty() {
                form = form.text(format!("specifications[dimensions][{key}]"), value.trim());
            }
        }
        form = form.text("specifications[dimensions][unit]", specs.dimensions.unit.trim());
        for (key, value) in [
            ("strength", &specs.strength),
            ("color", &specs.color),
            ("texture", &specs.texture),
        ] {
            if !value.trim().is_empty() {
                form = form.text(format!("specifications[{key}]"), value.trim());
            }
        }

        for image in &self.images {
            form = form.file("images", image.clone());
        }
        form
    }

    fn json(&self) -> Value {
        let specs = &self.specifications;
        let mut dimensions = Map::new();
        for (key, value) in self.dimension_fields() {
            if let Some(number) = dimension(value) {
                dimensions.insert(key.to_string(), json!(number));
            }
        }
        dimensions.insert("unit".to_string(), json!(specs.dimensions.unit.trim()));

        json!({
            "name": self.name.trim(),
            "description": self.description.trim(),
            "category": self.category.trim(),
            "unit": self.unit.trim(),
            "price": parse_price(&self.price),
            "stock": parse_quantity(&self.stock),
            "isAvailable": self.is_available,
            "specifications": {
                "dimensions": dimensions,
                "strength": specs.strength.trim(),
                "color": specs.color.trim(),
                "texture": specs.texture.trim(),
            },
        })
    }
}

impl Draft for ProductDraft {
    type Record = Product;

    fn from_record(product: &Product) -> Self {
        let specs = &product.specifications;
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category: product
                .category
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
            unit: product
                .unit
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
            price: format_number(product.price),
            stock: product.stock.map(|s| s.to_string()).unwrap_or_default(),
            is_available: product.is_available,
            specifications: SpecificationsDraft {
                dimensions: DimensionsDraft {
                    length: format_number(specs.dimensions.length),
                    width: format_number(specs.dimensions.width),
                    height: format_number(specs.dimensions.height),
                    unit: specs.dimensions.unit.as_str().to_string(),
                },
                strength: specs.strength.clone(),
                color: specs.color.clone(),
                texture: specs.texture.clone(),
            },
            images: Vec::new(),
        }
    }

    fn validate(&self, mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Product name is required");
        errors.require("description", &self.description, "Description is required");
        errors.require("category", &self.category, "Category is required");
        errors.require("unit", &self.unit, "Unit is required");
        errors.require("price", &self.price, "Price is required");
        errors.require("stock", &self.stock, "Stock is required");

        if !self.price.trim().is_empty() && parse_price(&self.price).is_none_or(|p| p < 0.0) {
            errors.insert("price", "Please enter a valid price");
        }
        if !self.stock.trim().is_empty() && parse_quantity(&self.stock).is_none() {
            errors.insert("stock", "Please enter a valid stock quantity");
        }
        for (key, value) in self.dimension_fields() {
            if !value.trim().is_empty() && dimension(value).is_none() {
                errors.insert(key, format!("Please enter a valid {key}"));
            }
        }
        if *mode == FormMode::Create && self.images.is_empty() {
            errors.insert("images", "At least one image is required");
        }
        errors
    }

    fn to_payload(&self, mode: &FormMode) -> Payload {
        match mode {
            FormMode::Edit(_) if self.images.is_empty() => Payload::Json(self.json()),
            _ => Payload::Multipart(self.multipart()),
        }
    }

    fn apply_to(&self, product: &Product) -> Product {
        let specs = &self.specifications;
        let category = self.category.trim();
        let unit = self.unit.trim();
        Product {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category: (!category.is_empty()).then(|| category.to_string().into()),
            unit: (!unit.is_empty()).then(|| unit.to_string().into()),
            price: parse_price(&self.price),
            stock: parse_quantity(&self.stock).and_then(|s| i64::try_from(s).ok()),
            is_available: self.is_available,
            specifications: Specifications {
                dimensions: Dimensions {
                    length: dimension(&specs.dimensions.length),
                    width: dimension(&specs.dimensions.width),
                    height: dimension(&specs.dimensions.height),
                    unit: specs.dimensions.unit.trim().to_string().into(),
                },
                strength: specs.strength.trim().to_string(),
                color: specs.color.trim().to_string(),
                texture: specs.texture.trim().to_string(),
            },
            ..product.clone()
        }
    }
}
