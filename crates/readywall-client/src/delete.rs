//! Two-phase delete: request, then confirm or cancel

use crate::entity::Entity;
use crate::form::InFlight;
use crate::gateway::Gateway;
use crate::list::ListController;
use crate::notice::Notices;
use crate::session::Session;
use crate::status::capitalize;
use readywall_core::RecordId;
use tracing::{debug, info, warn};

/// Result of confirming a delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed on the server and from the list
    Deleted(RecordId),
    /// No candidate was pending
    NothingPending,
    /// A delete is already in flight
    Busy,
    /// The server refused; the candidate is still pending
    Failed(String),
    /// Finished after the view was detached; nothing was applied
    Discarded,
}

/// Holds the record awaiting confirmation
#[derive(Debug, Clone)]
pub struct DeleteWorkflow<E> {
    candidate: Option<E>,
    deleting: bool,
}

impl<E> Default for DeleteWorkflow<E> {
    fn default() -> Self {
        Self {
            candidate: None,
            deleting: false,
        }
    }
}

impl<E: Entity> DeleteWorkflow<E> {
    /// Nothing pending
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the confirmation for `item`
    pub fn request_delete(&mut self, item: &E) {
        self.candidate = Some(item.clone());
    }

    /// Drop the candidate without contacting the gateway
    pub fn cancel_delete(&mut self) {
        self.candidate = None;
    }

    /// Record awaiting confirmation
    pub const fn candidate(&self) -> Option<&E> {
        self.candidate.as_ref()
    }

    /// Whether a delete is in flight
    pub const fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Delete the candidate and remove it from the list
    ///
    /// Dropping the returned future mid-request clears the deleting flag and
    /// keeps the candidate pending.
    pub async fn confirm_delete(
        &mut self,
        gateway: &Gateway,
        session: &Session,
        list: &mut ListController<E>,
        notices: &mut Notices,
    ) -> DeleteOutcome {
        if self.deleting {
            return DeleteOutcome::Busy;
        }
        let Some(id) = self.candidate.as_ref().map(|item| item.id().clone()) else {
            return DeleteOutcome::NothingPending;
        };

        let ticket = list.mutation_ticket();
        let flight = InFlight::start(&mut self.deleting, true);
        let result = gateway.delete::<E>(session, &id).await;
        drop(flight);

        if list.is_stale(ticket) {
            debug!(entity = E::NAME, %id, "delete finished after detach");
            return DeleteOutcome::Discarded;
        }

        match result {
            Ok(()) => {
                list.apply_removed(ticket, &id);
                self.candidate = None;
                info!(entity = E::NAME, %id, "record deleted");
                notices.success(format!("{} deleted successfully", capitalize(E::NAME)));
                DeleteOutcome::Deleted(id)
            }
            Err(e) => {
                warn!(entity = E::NAME, %id, error = %e, "delete failed");
                let message = e.user_message();
                notices.error(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use readywall_core::Blog;
    use serde_json::json;

    #[tokio::test]
    async fn test_confirm_without_candidate_sends_nothing() {
        let mut workflow = DeleteWorkflow::<Blog>::new();
        let mut list = ListController::new();
        let mut notices = Notices::new();
        let gateway = Gateway::new("http://127.0.0.1:9");

        let outcome = workflow
            .confirm_delete(&gateway, &Session::new("tok", None), &mut list, &mut notices)
            .await;

        assert_eq!(outcome, DeleteOutcome::NothingPending);
        assert!(notices.is_empty());
    }

    #[test]
    fn test_request_and_cancel() {
        let blog: Blog = serde_json::from_value(json!({"_id": "b1", "title": "Pavers"})).unwrap();
        let mut workflow = DeleteWorkflow::new();

        workflow.request_delete(&blog);
        assert_eq!(workflow.candidate().map(|b| b.title.as_str()), Some("Pavers"));

        workflow.cancel_delete();
        assert!(workflow.candidate().is_none());
    }
}
