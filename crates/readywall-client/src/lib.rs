//! Gateway client and screen workflows for the `ReadyWall` admin dashboard
//!
//! A [`Gateway`] talks to the REST backend. One generic [`ListController`],
//! [`FormWorkflow`] and [`DeleteWorkflow`] drive every entity screen; the
//! per-entity endpoint tables and drafts live in [`entities`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::return_self_not_must_use,
    clippy::future_not_send
)]

pub mod auth;
pub mod carousel;
pub mod dashboard;
pub mod delete;
pub mod entities;
pub mod entity;
pub mod error;
pub mod form;
pub mod gateway;
pub mod list;
pub mod notice;
pub mod session;
pub mod status;
pub mod upload;

pub use auth::{Route, RouteDecision, SessionGuard};
pub use carousel::CarouselCursors;
pub use dashboard::{DashboardAggregator, DashboardView, RecentActivity, StatusTone};
pub use delete::{DeleteOutcome, DeleteWorkflow};
pub use entity::{Endpoints, Entity, Envelope};
pub use error::{GatewayError, GatewayResult};
pub use form::{Draft, FieldErrors, FormDraft, FormMode, FormWorkflow, SubmitOutcome};
pub use gateway::{Gateway, ListQuery};
pub use list::{ListController, ListState};
pub use notice::{Notice, NoticeLevel, Notices};
pub use session::{Credentials, FileTokenStore, MemoryTokenStore, Session, TokenStore};
pub use status::{StatusField, StatusOutcome, StatusWorkflow};
pub use upload::{ImageUpload, MultipartPayload, Payload};
