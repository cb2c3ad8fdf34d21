//! Dashboard: record totals plus a feed of the most recent leads

use crate::error::GatewayResult;
use crate::gateway::{Gateway, ListQuery};
use crate::session::Session;
use readywall_core::utils::format_local_timestamp;
use readywall_core::{Lead, LeadStatus, StatsSummary};
use serde::Serialize;
use tracing::{debug, warn};

/// One line of the activity feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentActivity {
    /// What happened
    pub action: String,
    /// Who it concerns
    pub description: String,
    /// When, in local time
    pub time: Option<String>,
}

impl RecentActivity {
    /// Feed line for a newly captured lead
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            action: "New lead added".to_string(),
            description: format!("{} \u{2022} {}", lead.name, lead.email)
                .trim()
                .to_string(),
            time: lead.created_at.as_ref().map(format_local_timestamp),
        }
    }
}

/// Colour of a lead status chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    /// New
    Blue,
    /// Contacted
    Yellow,
    /// Qualified
    Purple,
    /// Converted
    Green,
    /// Lost
    Red,
    /// Anything else
    Gray,
}

impl StatusTone {
    /// Chip colour for a lead status
    pub fn for_lead(status: &LeadStatus) -> Self {
        match status {
            LeadStatus::New => Self::Blue,
            LeadStatus::Contacted => Self::Yellow,
            LeadStatus::Qualified => Self::Purple,
            LeadStatus::Converted => Self::Green,
            LeadStatus::Lost => Self::Red,
            LeadStatus::Other(other) if other.eq_ignore_ascii_case("won") => Self::Green,
            LeadStatus::Other(_) => Self::Gray,
        }
    }
}

/// Everything the dashboard shows
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    /// Record totals; zeros when the counts call failed
    pub counts: StatsSummary,
    /// Most recent leads
    pub recent_leads: Vec<Lead>,
    /// Leads projected into feed lines
    pub activities: Vec<RecentActivity>,
    /// First error seen, counts before leads
    pub error: Option<String>,
}

impl DashboardView {
    /// Combine the two call results; each half survives the other's failure
    pub fn from_results(
        counts: GatewayResult<StatsSummary>,
        leads: GatewayResult<Vec<Lead>>,
        limit: usize,
    ) -> Self {
        let mut view = Self::default();

        match counts {
            Ok(counts) => view.counts = counts,
            Err(e) => {
                warn!(error = %e, "dashboard counts failed");
                view.error = Some(e.user_message());
            }
        }

        match leads {
            Ok(mut leads) => {
                leads.truncate(limit);
                view.activities = leads.iter().map(RecentActivity::from_lead).collect();
                view.recent_leads = leads;
            }
            Err(e) => {
                warn!(error = %e, "dashboard recent leads failed");
                if view.error.is_none() {
                    view.error = Some(e.user_message());
                }
            }
        }

        view
    }
}

/// Loads the dashboard
#[derive(Debug, Clone)]
pub struct DashboardAggregator {
    recent_limit: u32,
}

impl DashboardAggregator {
    /// Aggregator showing up to `recent_limit` leads
    pub const fn new(recent_limit: u32) -> Self {
        Self { recent_limit }
    }

    /// Fetch counts and recent leads concurrently
    pub async fn load(&self, gateway: &Gateway, session: &Session) -> DashboardView {
        let query = ListQuery::page(1, self.recent_limit);
        let (counts, leads) = tokio::join!(
            gateway.stats_summary(session),
            gateway.list::<Lead>(session, &query)
        );

        let view = DashboardView::from_results(
            counts,
            leads,
            usize::try_from(self.recent_limit).unwrap_or(usize::MAX),
        );
        debug!(leads = view.recent_leads.len(), failed = view.error.is_some(), "dashboard loaded");
        view
    }
}
