//! Client-side projections of the records the gateway owns

use crate::utils::{lenient_f64, lenient_i64};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned record identifier (`_id` on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap an identifier string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Record id carried as `_id`, `id` or both; `_id` wins when both are present
mod record_key {
    use super::RecordId;
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Keys {
        #[serde(default, rename = "_id")]
        primary: Option<RecordId>,
        #[serde(default)]
        id: Option<RecordId>,
    }

    pub fn serialize<S: Serializer>(id: &RecordId, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("_id", id)?;
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RecordId, D::Error> {
        optional::deserialize(deserializer)?.ok_or_else(|| D::Error::missing_field("_id"))
    }

    pub mod optional {
        use super::{Keys, RecordId};
        use serde::ser::SerializeMap;
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            id: &Option<RecordId>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(usize::from(id.is_some())))?;
            if let Some(id) = id {
                map.serialize_entry("_id", id)?;
            }
            map.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<RecordId>, D::Error> {
            let keys = Keys::deserialize(deserializer)?;
            Ok(keys.primary.or(keys.id))
        }
    }
}

/// Enumerated string field as the gateway spells it.
///
/// Values this client does not know decode into `Other` instead of failing,
/// so a new server-side status never empties a list.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Value not known to this client
            Other(String),
        }

        impl $name {
            /// Wire spelling
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(value) => value,
                }
            }

            /// Wire spellings of every known value
            #[must_use]
            pub fn known_values() -> Vec<&'static str> {
                vec![$($wire),+]
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(value),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(value) => value,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::Error;

            fn from_str(value: &str) -> crate::Result<Self> {
                match value {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(crate::Error::InvalidInput {
                        field: stringify!($name).to_string(),
                        message: format!(
                            "'{value}' is not one of {}",
                            Self::known_values().join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Sales pipeline stage of a lead
    LeadStatus {
        /// Freshly captured
        New => "New",
        /// Someone reached out
        Contacted => "Contacted",
        /// Confirmed as a real opportunity
        Qualified => "Qualified",
        /// Became a customer
        Converted => "Converted",
        /// Dropped
        Lost => "Lost",
    }
}

wire_enum! {
    /// Kind of construction project behind a lead
    ProjectType {
        /// Homes
        Residential => "residential",
        /// Shops and offices
        Commercial => "commercial",
        /// Plants and warehouses
        Industrial => "industrial",
        /// Roads, bridges, utilities
        Infrastructure => "infrastructure",
        /// Anything else
        Unlisted => "other",
    }
}

wire_enum! {
    /// Rough project size
    ProjectSize {
        /// Small
        Small => "small",
        /// Medium
        Medium => "medium",
        /// Large
        Large => "large",
        /// Very large
        VeryLarge => "very-large",
    }
}

wire_enum! {
    /// When the customer wants to start
    Timeline {
        /// Right away
        Immediate => "immediate",
        /// One to three months
        OneToThreeMonths => "1-3months",
        /// Three to six months
        ThreeToSixMonths => "3-6months",
        /// Six to twelve months
        SixToTwelveMonths => "6-12months",
        /// More than a year out
        AboveOneYear => "above-1year",
    }
}

wire_enum! {
    /// Product catalogue category
    ProductCategory {
        /// Paver blocks
        Pavers => "pavers",
        /// Precast concrete
        Precast => "precast",
        /// Chain-link fencing
        ChainLinks => "chainlinks",
        /// Tiles
        Tiles => "tiles",
        /// Blocks
        Blocks => "blocks",
        /// Anything else
        Unlisted => "other",
        /// Fencing poles
        FencingPoles => "fencingpoles",
    }
}

wire_enum! {
    /// Unit a product is priced in
    ProductUnit {
        /// Square feet
        SquareFeet => "sqft",
        /// Square metre
        SquareMeter => "sqm",
        /// Per piece
        Piece => "piece",
        /// Kilogram
        Kilogram => "kg",
        /// Ton
        Ton => "ton",
        /// Cubic metre
        CubicMeter => "m3",
    }
}

wire_enum! {
    /// Length unit for product dimensions
    DimensionUnit {
        /// Millimetre
        Millimeter => "mm",
        /// Centimetre
        Centimeter => "cm",
        /// Metre
        Meter => "m",
        /// Inch
        Inch => "inch",
    }
}

wire_enum! {
    /// Blog post category
    BlogCategory {
        /// Construction
        Construction => "construction",
        /// Design
        Design => "design",
        /// Tips
        Tips => "tips",
        /// News
        News => "news",
        /// Anything else
        Unlisted => "other",
    }
}

wire_enum! {
    /// Handling state of a customer inquiry
    InquiryStatus {
        /// Not yet handled
        New => "new",
        /// Customer was contacted
        Contacted => "contacted",
        /// Done
        Closed => "closed",
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        Self::New
    }
}

impl Default for DimensionUnit {
    fn default() -> Self {
        Self::Millimeter
    }
}

impl Default for BlogCategory {
    fn default() -> Self {
        Self::Unlisted
    }
}

impl Default for InquiryStatus {
    fn default() -> Self {
        Self::New
    }
}

/// Site address attached to a lead
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street address
    #[serde(default)]
    pub address: String,
    /// City
    #[serde(default)]
    pub city: String,
    /// State
    #[serde(default)]
    pub state: String,
    /// Postal code
    #[serde(default)]
    pub pincode: String,
}

/// A sales lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Record id
    #[serde(flatten, with = "record_key")]
    pub id: RecordId,
    /// Contact name
    #[serde(default)]
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// Company name
    #[serde(default)]
    pub company: String,
    /// Project type
    #[serde(default)]
    pub project_type: Option<ProjectType>,
    /// Project size
    #[serde(default)]
    pub project_size: Option<ProjectSize>,
    /// Site address
    #[serde(default)]
    pub location: Option<Location>,
    /// Free-text requirements
    #[serde(default)]
    pub requirements: String,
    /// Desired start
    #[serde(default)]
    pub timeline: Option<Timeline>,
    /// Pipeline stage
    #[serde(default)]
    pub status: LeadStatus,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Physical size of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: Option<f64>,
    /// Width
    #[serde(default, deserialize_with = "lenient_f64")]
    pub width: Option<f64>,
    /// Height
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
    /// Unit for all three
    #[serde(default)]
    pub unit: DimensionUnit,
}

/// Technical details of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specifications {
    /// Dimensions
    #[serde(default)]
    pub dimensions: Dimensions,
    /// Compressive strength rating
    #[serde(default)]
    pub strength: String,
    /// Colour
    #[serde(default)]
    pub color: String,
    /// Surface texture
    #[serde(default)]
    pub texture: String,
}

/// A catalogue product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Record id
    #[serde(flatten, with = "record_key")]
    pub id: RecordId,
    /// Name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Category
    #[serde(default)]
    pub category: Option<ProductCategory>,
    /// Pricing unit
    #[serde(default)]
    pub unit: Option<ProductUnit>,
    /// Price per unit
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Units in stock
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: Option<i64>,
    /// Whether the product can be ordered
    #[serde(default = "default_true")]
    pub is_available: bool,
    /// Uploaded image filenames or absolute URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Legacy single image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Technical details
    #[serde(default)]
    pub specifications: Specifications,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Record id
    #[serde(flatten, with = "record_key")]
    pub id: RecordId,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Category
    #[serde(default)]
    pub category: BlogCategory,
    /// SEO title
    #[serde(default)]
    pub meta_title: String,
    /// SEO description
    #[serde(default)]
    pub meta_description: String,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Uploaded image filenames or absolute URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Legacy single image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A customer inquiry from the public site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    /// Record id
    #[serde(flatten, with = "record_key")]
    pub id: RecordId,
    /// First name
    #[serde(default)]
    pub first_name: String,
    /// Last name
    #[serde(default)]
    pub last_name: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Phone
    #[serde(default)]
    pub phone: String,
    /// Product the customer asked about
    #[serde(default)]
    pub product_interest: String,
    /// Message body
    #[serde(default)]
    pub message: String,
    /// Handling state
    #[serde(default)]
    pub status: InquiryStatus,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A registered site user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Record id
    #[serde(flatten, with = "record_key")]
    pub id: RecordId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Role name
    #[serde(default)]
    pub role: String,
    /// Whether the account may sign in
    #[serde(default)]
    pub is_active: bool,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The administrator returned by a successful login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    /// Record id
    #[serde(flatten, with = "record_key::optional")]
    pub id: Option<RecordId>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email
    #[serde(default)]
    pub email: String,
    /// Role name
    #[serde(default)]
    pub role: String,
}

/// Record totals shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Registered users
    #[serde(default)]
    pub users: u64,
    /// Catalogue products
    #[serde(default)]
    pub products: u64,
    /// Blog posts
    #[serde(default)]
    pub blogs: u64,
    /// Sales leads
    #[serde(default)]
    pub leads: u64,
    /// Customer inquiries
    #[serde(default)]
    pub inquiries: u64,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Image references in display order, falling back to the legacy single image
    #[must_use]
    pub fn gallery(&self) -> Vec<&str> {
        gallery(&self.images, self.image.as_deref())
    }
}

impl Blog {
    /// Image references in display order, falling back to the legacy single image
    #[must_use]
    pub fn gallery(&self) -> Vec<&str> {
        gallery(&self.images, self.image.as_deref())
    }
}

impl Inquiry {
    /// First and last name joined
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn gallery<'a>(images: &'a [String], single: Option<&'a str>) -> Vec<&'a str> {
    let images: Vec<&str> = images
        .iter()
        .map(String::as_str)
        .filter(|image| !image.is_empty())
        .collect();

    if images.is_empty() {
        single.filter(|image| !image.is_empty()).into_iter().collect()
    } else {
        images
    }
}
