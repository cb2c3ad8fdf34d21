//! List state for one entity: load, filter, select and reconcile mutations
//!
//! Results that arrive after the view was detached, or after a newer load was
//! started, are discarded. Every async operation hands out a ticket and the
//! matching `finish`/`apply` call checks it.

use crate::entity::{Entity, matches_search};
use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{Gateway, ListQuery};
use crate::session::Session;
use readywall_core::RecordId;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Filter value meaning "no filter"
pub const ALL: &str = "all";

/// Ticket for one list load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    generation: u64,
}

/// Ticket for a create/update/delete/status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationTicket {
    epoch: u64,
}

/// Observable list state
#[derive(Debug, Clone)]
pub struct ListState<E> {
    /// Records in server order, with local creations prepended
    pub items: Vec<E>,
    /// A load is in flight
    pub loading: bool,
    /// Message from the last failed load
    pub error: Option<String>,
    /// Free-text search term
    pub search_term: String,
    /// Category/status filter; `None` means all
    pub status_filter: Option<String>,
    selected: Option<RecordId>,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            search_term: String::new(),
            status_filter: None,
            selected: None,
        }
    }
}

/// Drives the list view of entity `E`
#[derive(Debug, Clone)]
pub struct ListController<E> {
    state: ListState<E>,
    query: ListQuery,
    epoch: u64,
    generation: u64,
}

impl<E: Entity> Default for ListController<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> ListController<E> {
    /// Empty list that loads with no query parameters
    pub fn new() -> Self {
        Self::with_query(ListQuery::default())
    }

    /// Empty list that loads with `query`
    pub fn with_query(query: ListQuery) -> Self {
        Self {
            state: ListState::default(),
            query,
            epoch: 0,
            generation: 0,
        }
    }

    /// Current state
    pub const fn state(&self) -> &ListState<E> {
        &self.state
    }

    /// All loaded records
    pub fn items(&self) -> &[E] {
        &self.state.items
    }

    /// Whether a load is in flight
    pub const fn is_loading(&self) -> bool {
        self.state.loading
    }

    /// Error from the last load
    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Parameters sent with each load
    pub const fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Record with `id`, if loaded
    pub fn find(&self, id: &RecordId) -> Option<&E> {
        self.state.items.iter().find(|item| item.id() == id)
    }

    // Loading

    /// Mark a load as started; the returned ticket supersedes older ones
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;
        LoadTicket {
            epoch: self.epoch,
            generation: self.generation,
        }
    }

    /// Apply a load result; returns whether it was applied
    ///
    /// Results for superseded or detached tickets are dropped without
    /// touching state.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: GatewayResult<Vec<E>>) -> bool {
        if ticket.epoch != self.epoch || ticket.generation != self.generation {
            debug!(entity = E::NAME, "dropping stale list result");
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(items) => {
                debug!(entity = E::NAME, count = items.len(), "list loaded");
                self.state.items = items;
            }
            Err(e) => {
                warn!(entity = E::NAME, error = %e, "list load failed");
                self.state.error = Some(e.user_message());
            }
        }
        true
    }

    /// Fetch the list from the gateway
    pub async fn load(&mut self, gateway: &Gateway, session: &Session) -> bool {
        let ticket = self.begin_load();
        let result = gateway.list::<E>(session, &self.query).await;
        self.finish_load(ticket, result)
    }

    /// Fetch a single record, falling back to the loaded copy if the request fails
    ///
    /// # Errors
    ///
    /// Returns the gateway error when the record is not loaded locally either.
    pub async fn load_detail(
        &self,
        gateway: &Gateway,
        session: &Session,
        id: &RecordId,
    ) -> GatewayResult<E> {
        match gateway.fetch::<E>(session, id).await {
            Ok(record) => Ok(record),
            Err(e @ (GatewayError::MissingToken | GatewayError::Unauthorized { .. })) => Err(e),
            Err(e) => self.find(id).cloned().ok_or(e),
        }
    }

    /// Stop accepting results of operations started before this call
    pub const fn detach(&mut self) {
        self.epoch += 1;
        self.state.loading = false;
    }

    /// Ticket for a mutation started now
    pub const fn mutation_ticket(&self) -> MutationTicket {
        MutationTicket { epoch: self.epoch }
    }

    /// Whether the view was detached after `ticket` was issued
    pub const fn is_stale(&self, ticket: MutationTicket) -> bool {
        ticket.epoch != self.epoch
    }

    // Filtering

    /// Set the free-text search term
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    /// Current search term
    pub fn search_term(&self) -> &str {
        &self.state.search_term
    }

    /// Set the category/status filter; `"all"` or blank clears it
    pub fn set_status_filter(&mut self, filter: &str) {
        let filter = filter.trim();
        self.state.status_filter =
            (!filter.is_empty() && !filter.eq_ignore_ascii_case(ALL)).then(|| filter.to_string());
    }

    /// Current filter, `"all"` when none is set
    pub fn status_filter(&self) -> &str {
        self.state.status_filter.as_deref().unwrap_or(ALL)
    }

    /// Whether `item` passes both the search term and the filter
    ///
    /// Search is a case-insensitive substring match; the filter must match exactly.
    pub fn matches(&self, item: &E) -> bool {
        let filter_ok = self.state.status_filter.as_deref().is_none_or(|filter| {
            item.filter_value()
                .is_some_and(|value| value == filter)
        });
        filter_ok && matches_search(item, &self.state.search_term)
    }

    /// Records passing the search term and filter, in list order
    pub fn filtered_items(&self) -> Vec<&E> {
        self.state.items.iter().filter(|item| self.matches(item)).collect()
    }

    /// "Showing X of Y {plural}"
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} {}",
            self.filtered_items().len(),
            self.state.items.len(),
            E::PLURAL
        )
    }

    /// Number of loaded records per filter value, plus `"all"`
    pub fn filter_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        counts.insert(ALL.to_string(), self.state.items.len());
        for value in self.state.items.iter().filter_map(E::filter_value) {
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }
        counts
    }

    // Selection

    /// Select one record, replacing any previous selection
    pub fn select(&mut self, id: &RecordId) -> bool {
        if self.find(id).is_some() {
            self.state.selected = Some(id.clone());
            true
        } else {
            false
        }
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    /// Selected record; a selection whose record is gone reads as none
    pub fn selected(&self) -> Option<&E> {
        self.state.selected.as_ref().and_then(|id| self.find(id))
    }

    // Reconciliation

    /// Prepend a record the server just created
    pub fn apply_created(&mut self, ticket: MutationTicket, record: E) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        self.state.items.insert(0, record);
        true
    }

    /// Replace the record with the same id, keeping its position
    pub fn apply_updated(&mut self, ticket: MutationTicket, record: E) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        match self
            .state
            .items
            .iter_mut()
            .find(|item| item.id() == record.id())
        {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Modify the record with `id` in place
    pub fn apply_patch(
        &mut self,
        ticket: MutationTicket,
        id: &RecordId,
        patch: impl FnOnce(&mut E),
    ) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        match self.state.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`, clearing the selection if it pointed there
    pub fn apply_removed(&mut self, ticket: MutationTicket, id: &RecordId) -> bool {
        if self.is_stale(ticket) {
            return false;
        }
        let before = self.state.items.len();
        self.state.items.retain(|item| item.id() != id);
        if self.state.selected.as_ref() == Some(id) {
            self.state.selected = None;
        }
        self.state.items.len() != before
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use readywall_core::{Lead, LeadStatus};
    use rstest::rstest;
    use serde_json::json;

    fn lead(id: &str, name: &str, company: &str, status: &str) -> Lead {
        serde_json::from_value(json!({
            "_id": id,
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "company": company,
            "status": status
        }))
        .unwrap()
    }

    fn loaded() -> ListController<Lead> {
        let mut list = ListController::new();
        let ticket = list.begin_load();
        list.finish_load(
            ticket,
            Ok(vec![
                lead("1", "Asha", "Rao Builders", "New"),
                lead("2", "Ravi", "Acme Infra", "Converted"),
                lead("3", "Meera", "Shah Homes", "Converted"),
            ]),
        );
        list
    }

    #[test]
    fn test_load_replaces_items_and_clears_loading() {
        let list = loaded();

        assert!(!list.is_loading());
        assert_eq!(list.items().len(), 3);
        assert!(list.error().is_none());
    }

    #[test]
    fn test_failed_load_sets_error_and_keeps_items() {
        let mut list = loaded();
        let ticket = list.begin_load();

        list.finish_load(
            ticket,
            Err(GatewayError::Business {
                status: 500,
                message: "Failed to fetch leads".to_string(),
            }),
        );

        assert_eq!(list.error(), Some("Failed to fetch leads"));
        assert_eq!(list.items().len(), 3);
        assert!(!list.is_loading());
    }

    #[test]
    fn test_superseded_load_is_dropped() {
        let mut list = ListController::<Lead>::new();
        let first = list.begin_load();
        let second = list.begin_load();

        assert!(list.finish_load(second, Ok(vec![lead("2", "Ravi", "", "New")])));
        assert!(!list.finish_load(first, Ok(vec![lead("1", "Asha", "", "New")])));

        assert_eq!(list.items().len(), 1);
        assert_eq!(list.items()[0].name, "Ravi");
    }

    #[test]
    fn test_detached_results_are_not_applied() {
        let mut list = loaded();
        let load = list.begin_load();
        let mutation = list.mutation_ticket();

        list.detach();

        assert!(!list.finish_load(load, Ok(Vec::new())));
        assert!(!list.apply_created(mutation, lead("9", "Late", "", "New")));
        assert!(!list.apply_removed(mutation, &RecordId::from("1")));
        assert_eq!(list.items().len(), 3);
        assert!(!list.is_loading());
    }

    #[rstest]
    #[case("", "all", 3)]
    #[case("", "Converted", 2)]
    #[case("", "converted", 0)]
    #[case("", "Lost", 0)]
    #[case("acme", "all", 1)]
    #[case("ASHA", "all", 1)]
    #[case("shah", "Converted", 1)]
    #[case("shah", "New", 0)]
    fn test_filtering(#[case] term: &str, #[case] filter: &str, #[case] expected: usize) {
        let mut list = loaded();
        list.set_search_term(term);
        list.set_status_filter(filter);

        assert_eq!(list.filtered_items().len(), expected);
        assert!(list.filtered_items().len() <= list.items().len());
    }

    #[test]
    fn test_converted_filter_returns_only_converted() {
        let mut list = loaded();
        list.set_status_filter("Converted");

        assert!(
            list.filtered_items()
                .iter()
                .all(|lead| lead.status == LeadStatus::Converted)
        );
        assert_eq!(list.summary(), "Showing 2 of 3 leads");
    }

    #[test]
    fn test_filter_counts() {
        let counts = loaded().filter_counts();

        assert_eq!(counts.get("all"), Some(&3));
        assert_eq!(counts.get("Converted"), Some(&2));
        assert_eq!(counts.get("New"), Some(&1));
        assert_eq!(counts.get("Lost"), None);
    }

    #[test]
    fn test_selection_is_single_and_cleared_by_removal() {
        let mut list = loaded();

        assert!(list.select(&RecordId::from("1")));
        assert!(list.select(&RecordId::from("2")));
        assert_eq!(list.selected().map(|l| l.name.as_str()), Some("Ravi"));
        assert!(!list.select(&RecordId::from("missing")));

        let ticket = list.mutation_ticket();
        assert!(list.apply_removed(ticket, &RecordId::from("2")));
        assert!(list.selected().is_none());
    }

    #[test]
    fn test_reconciliation_preserves_order() {
        let mut list = loaded();
        let ticket = list.mutation_ticket();

        assert!(list.apply_created(ticket, lead("4", "Kiran", "", "New")));
        assert_eq!(list.items()[0].id.as_str(), "4");

        let mut renamed = lead("2", "Ravi K", "Acme Infra", "Converted");
        renamed.phone = "123".to_string();
        assert!(list.apply_updated(ticket, renamed));
        assert_eq!(list.items()[2].name, "Ravi K");

        assert!(list.apply_patch(ticket, &RecordId::from("3"), |lead| {
            lead.status = LeadStatus::Lost;
        }));
        assert_eq!(list.items()[3].status, LeadStatus::Lost);
        assert_eq!(list.items()[3].name, "Meera");

        assert!(!list.apply_updated(ticket, lead("77", "Nobody", "", "New")));
        assert_eq!(list.items().len(), 4);
    }
}
