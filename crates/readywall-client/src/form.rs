//! Create/edit form workflow shared by every entity
//!
//! Validation runs before any network call. A submission that fails keeps the
//! form open with the operator's input; one that succeeds reconciles the list,
//! closes the form and resets the draft.

use crate::entity::Entity;
use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::notice::Notices;
use crate::session::Session;
use crate::status::capitalize;
use crate::upload::Payload;
use indexmap::IndexMap;
use readywall_core::RecordId;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Validation messages keyed by field name, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    /// No errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, keeping the first one reported
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Record `message` when `value` is blank
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.insert(field, message);
        }
    }

    /// Error for `field`
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Drop the error for `field`, as when the operator edits it
    pub fn clear(&mut self, field: &str) {
        self.0.shift_remove(field);
    }

    /// Whether no field has an error
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with errors
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors in form order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Whether the form creates a new record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    /// New record
    Create,
    /// Existing record
    Edit(RecordId),
}

/// Editable fields of one entity
pub trait Draft: Clone + Default + fmt::Debug + Send + Sync {
    /// Record the draft produces
    type Record: Entity;

    /// Draft pre-filled from an existing record
    fn from_record(record: &Self::Record) -> Self;

    /// Field errors; empty when the draft may be submitted
    fn validate(&self, mode: &FormMode) -> FieldErrors;

    /// Request body for a validated draft
    fn to_payload(&self, mode: &FormMode) -> Payload;

    /// `record` with the draft's fields applied, for servers that do not echo updates
    fn apply_to(&self, record: &Self::Record) -> Self::Record;
}

/// Form state: field values, field errors, in-flight flag
#[derive(Debug, Clone, Default)]
pub struct FormDraft<D> {
    /// Field values
    pub fields: D,
    /// Field errors from the last validation
    pub field_errors: FieldErrors,
    /// A submission is in flight
    pub submitting: bool,
}

/// Result of a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    /// Saved and reconciled into the list
    Saved(E),
    /// Saved, but the record was neither echoed nor loaded, so the list is unchanged
    Accepted,
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// A submission is already in flight
    Busy,
    /// The form is closed
    NotOpen,
    /// The gateway refused; the form stays open
    Failed(String),
    /// Finished after the view was detached; nothing was applied
    Discarded,
}

/// A validated submission ready to send
#[derive(Debug)]
pub struct SubmitRequest {
    mode: FormMode,
    payload: Payload,
}

impl SubmitRequest {
    /// Create or edit
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Body that will be sent
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Send to the gateway; `Ok(None)` means an update the server did not echo
    pub async fn send<E: Entity>(
        self,
        gateway: &Gateway,
        session: &Session,
    ) -> GatewayResult<Option<E>> {
        match self.mode {
            FormMode::Create => gateway.create::<E>(session, self.payload).await.map(Some),
            FormMode::Edit(id) => gateway.update::<E>(session, &id, self.payload).await,
        }
    }
}

/// Busy marker that resets to its default when dropped, so a request future
/// cancelled mid-flight never leaves a workflow stuck busy
pub(crate) struct InFlight<'a, T: Default>(&'a mut T);

impl<'a, T: Default> InFlight<'a, T> {
    pub(crate) fn start(marker: &'a mut T, busy: T) -> Self {
        *marker = busy;
        Self(marker)
    }
}

impl<T: Default> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        *self.0 = T::default();
    }
}

/// Create/edit workflow for draft type `D`
#[derive(Debug, Clone, Default)]
pub struct FormWorkflow<D> {
    draft: FormDraft<D>,
    mode: Option<FormMode>,
}

impl<D: Draft> FormWorkflow<D> {
    /// Closed form
    pub fn new() -> Self {
        Self {
            draft: FormDraft::default(),
            mode: None,
        }
    }

    /// Open an empty create form
    pub fn open_create(&mut self) {
        self.draft = FormDraft::default();
        self.mode = Some(FormMode::Create);
    }

    /// Open an edit form pre-filled from `record`
    pub fn open_edit(&mut self, record: &D::Record) {
        self.draft = FormDraft {
            fields: D::from_record(record),
            ..FormDraft::default()
        };
        self.mode = Some(FormMode::Edit(record.id().clone()));
    }

    /// Close and reset to empty defaults
    pub fn close(&mut self) {
        self.draft = FormDraft::default();
        self.mode = None;
    }

    /// Whether the form is open
    pub const fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    /// Create or edit, while open
    pub const fn mode(&self) -> Option<&FormMode> {
        self.mode.as_ref()
    }

    /// Form state
    pub const fn draft(&self) -> &FormDraft<D> {
        &self.draft
    }

    /// Field values
    pub const fn fields(&self) -> &D {
        &self.draft.fields
    }

    /// Mutable field values
    pub const fn fields_mut(&mut self) -> &mut D {
        &mut self.draft.fields
    }

    /// Field errors from the last validation
    pub const fn field_errors(&self) -> &FieldErrors {
        &self.draft.field_errors
    }

    /// Drop the error for a field the operator just edited
    pub fn clear_field_error(&mut self, field: &str) {
        self.draft.field_errors.clear(field);
    }

    /// Whether a submission is in flight
    pub const fn is_submitting(&self) -> bool {
        self.draft.submitting
    }

    /// Validate and mark the form as submitting
    ///
    /// Returns the request to send, or the outcome when nothing may be sent.
    pub fn begin_submit(
        &mut self,
        notices: &mut Notices,
    ) -> Result<SubmitRequest, SubmitOutcome<D::Record>> {
        let Some(mode) = self.mode.clone() else {
            return Err(SubmitOutcome::NotOpen);
        };
        if self.draft.submitting {
            return Err(SubmitOutcome::Busy);
        }

        let errors = self.draft.fields.validate(&mode);
        if !errors.is_empty() {
            debug!(entity = <D::Record as Entity>::NAME, errors = errors.len(), "draft rejected");
            self.draft.field_errors = errors.clone();
            notices.error("Please fix the errors in the form");
            return Err(SubmitOutcome::Invalid(errors));
        }

        self.draft.field_errors = FieldErrors::new();
        self.draft.submitting = true;
        Ok(SubmitRequest {
            payload: self.draft.fields.to_payload(&mode),
            mode,
        })
    }

    /// Apply the gateway's answer to the form and the list
    ///
    /// Always clears the submitting flag.
    pub fn finish_submit(
        &mut self,
        mode: &FormMode,
        ticket: crate::list::MutationTicket,
        result: GatewayResult<Option<D::Record>>,
        list: &mut ListController<D::Record>,
        notices: &mut Notices,
    ) -> SubmitOutcome<D::Record> {
        self.draft.submitting = false;

        if list.is_stale(ticket) {
            debug!(entity = <D::Record as Entity>::NAME, "submission finished after detach");
            return SubmitOutcome::Discarded;
        }

        let name = capitalize(<D::Record as Entity>::NAME);
        match (mode, result) {
            (FormMode::Create, Ok(Some(record))) => {
                info!(entity = <D::Record as Entity>::NAME, id = %record.id(), "record created");
                list.apply_created(ticket, record.clone());
                self.close();
                notices.success(format!("{name} created successfully"));
                SubmitOutcome::Saved(record)
            }
            (FormMode::Edit(id), Ok(echo)) => {
                info!(entity = <D::Record as Entity>::NAME, %id, echoed = echo.is_some(), "record updated");
                let record = echo.or_else(|| {
                    list.find(id)
                        .map(|existing| self.draft.fields.apply_to(existing))
                });
                if let Some(ref record) = record {
                    list.apply_updated(ticket, record.clone());
                }
                self.close();
                notices.success(format!("{name} updated successfully"));
                record.map_or(SubmitOutcome::Accepted, SubmitOutcome::Saved)
            }
            (FormMode::Create, Ok(None)) => {
                let message = format!("Failed to create {}", <D::Record as Entity>::NAME);
                notices.error(message.clone());
                SubmitOutcome::Failed(message)
            }
            (_, Err(e)) => {
                warn!(entity = <D::Record as Entity>::NAME, error = %e, "submission failed");
                let message = e.user_message();
                notices.error(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Validate, send and reconcile in one step
    ///
    /// Dropping the returned future mid-request clears the submitting flag
    /// and leaves the form open with its fields.
    pub async fn submit(
        &mut self,
        gateway: &Gateway,
        session: &Session,
        list: &mut ListController<D::Record>,
        notices: &mut Notices,
    ) -> SubmitOutcome<D::Record> {
        let request = match self.begin_submit(notices) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let mode = request.mode.clone();
        let ticket = list.mutation_ticket();
        let flight = InFlight::start(&mut self.draft.submitting, true);
        let result = request.send::<D::Record>(gateway, session).await;
        drop(flight);
        self.finish_submit(&mode, ticket, result, list, notices)
    }
}
