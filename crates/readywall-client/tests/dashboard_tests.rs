//! Dashboard aggregation against a mock backend

mod common;

use common::*;
use pretty_assertions::assert_eq;
use readywall_client::DashboardAggregator;
use readywall_core::StatsSummary;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mount_stats(test: &TestGateway, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(template)
        .expect(1)
        .mount(&test.server)
        .await;
}

async fn mount_leads(test: &TestGateway, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "6"))
        .respond_with(template)
        .expect(1)
        .mount(&test.server)
        .await;
}

#[tokio::test]
async fn test_dashboard_loads_counts_and_recent_leads() {
    let test = TestGateway::start().await;
    mount_stats(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({
            "users": 12, "products": 40, "blogs": 7, "leads": 95, "inquiries": 18
        })),
    )
    .await;
    mount_leads(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({
            "leads": [lead_json("1", "Asha", "New"), lead_json("2", "Ravi", "Converted")]
        })),
    )
    .await;

    let view = DashboardAggregator::new(6)
        .load(&test.gateway, &test.session)
        .await;

    assert_eq!(view.error, None);
    assert_eq!(
        view.counts,
        StatsSummary {
            users: 12,
            products: 40,
            blogs: 7,
            leads: 95,
            inquiries: 18,
        }
    );
    assert_eq!(view.recent_leads.len(), 2);
    assert_eq!(view.activities[0].action, "New lead added");
    assert_eq!(view.activities[1].description, "Ravi • ravi@example.com");
}

#[tokio::test]
async fn test_dashboard_counts_failure_keeps_leads() {
    let test = TestGateway::start().await;
    mount_stats(&test, ResponseTemplate::new(500)).await;
    mount_leads(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({
            "leads": [lead_json("1", "Asha", "New")]
        })),
    )
    .await;

    let view = DashboardAggregator::new(6)
        .load(&test.gateway, &test.session)
        .await;

    assert_eq!(view.error.as_deref(), Some("Failed to load stats"));
    assert_eq!(view.counts, StatsSummary::default());
    assert_eq!(view.recent_leads.len(), 1);
}

#[tokio::test]
async fn test_dashboard_leads_failure_keeps_counts() {
    let test = TestGateway::start().await;
    mount_stats(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({"leads": 3})),
    )
    .await;
    mount_leads(
        &test,
        ResponseTemplate::new(503).set_body_json(json!({"message": "Lead service unavailable"})),
    )
    .await;

    let view = DashboardAggregator::new(6)
        .load(&test.gateway, &test.session)
        .await;

    assert_eq!(view.error.as_deref(), Some("Lead service unavailable"));
    assert_eq!(view.counts.leads, 3);
    assert!(view.recent_leads.is_empty());
    assert!(view.activities.is_empty());
}
