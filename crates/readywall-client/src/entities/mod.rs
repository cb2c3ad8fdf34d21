//! Endpoint tables, drafts and status fields for each managed record kind

pub mod blog;
pub mod inquiry;
pub mod lead;
pub mod product;
pub mod user;

pub use blog::BlogDraft;
pub use inquiry::InquiryDraft;
pub use lead::LeadDraft;
pub use product::{DimensionsDraft, ProductDraft, SpecificationsDraft};
pub use user::Activation;
