//! Single-field status changes (inquiry handling state, user activation)

use crate::entity::Entity;
use crate::form::InFlight;
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::notice::Notices;
use crate::session::Session;
use readywall_core::RecordId;
use reqwest::Method;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};

/// HTTP call that changes a status
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRequest {
    /// Method
    pub method: Method,
    /// Path relative to the gateway base
    pub path: String,
    /// JSON body
    pub body: Value,
}

/// An entity with a status the dashboard can change on its own
pub trait StatusField: Entity {
    /// Status value type
    type Status: Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync;

    /// Current status
    fn status(&self) -> Self::Status;

    /// Overwrite the status and nothing else
    fn set_status(&mut self, status: Self::Status);

    /// Request that moves record `id` to `status`
    fn status_request(id: &RecordId, status: &Self::Status) -> StatusRequest;
}

/// Result of a status change
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome<S> {
    /// Applied on the server and in the list
    Changed(S),
    /// Another change for this record is still in flight
    Busy,
    /// The server refused; the list is untouched
    Failed(String),
    /// Finished after the view was detached; nothing was applied
    Discarded,
}

/// Tracks the record whose status is being changed
#[derive(Debug, Default)]
pub struct StatusWorkflow {
    updating: Option<RecordId>,
}

impl StatusWorkflow {
    /// Idle workflow
    pub fn new() -> Self {
        Self::default()
    }

    /// Record currently being updated, for per-row spinners
    pub const fn updating(&self) -> Option<&RecordId> {
        self.updating.as_ref()
    }

    /// Send a status change and patch the matching row in place on success
    ///
    /// Only the status field changes; every other field and the row position
    /// are preserved. Dropping the returned future mid-request frees the
    /// workflow for the next change.
    pub async fn change<E: StatusField>(
        &mut self,
        gateway: &Gateway,
        session: &Session,
        list: &mut ListController<E>,
        notices: &mut Notices,
        id: &RecordId,
        status: E::Status,
    ) -> StatusOutcome<E::Status> {
        if self.updating.is_some() {
            return StatusOutcome::Busy;
        }

        let ticket = list.mutation_ticket();
        let flight = InFlight::start(&mut self.updating, Some(id.clone()));
        let result = gateway.change_status::<E>(session, id, &status).await;
        drop(flight);

        if list.is_stale(ticket) {
            debug!(entity = E::NAME, %id, "status change finished after detach");
            return StatusOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                info!(entity = E::NAME, %id, %status, "status changed");
                let applied = status.clone();
                list.apply_patch(ticket, id, move |record| record.set_status(applied));
                notices.success(format!("{} status updated to {status}", capitalize(E::NAME)));
                StatusOutcome::Changed(status)
            }
            Err(e) => {
                let message = e.user_message();
                notices.error(message.clone());
                StatusOutcome::Failed(message)
            }
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("inquiry"), "Inquiry");
        assert_eq!(capitalize(""), "");
    }
}
