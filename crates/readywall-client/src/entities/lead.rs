//! Leads

use crate::entity::{Endpoints, Entity, Envelope};
use crate::form::{Draft, FieldErrors, FormMode};
use crate::upload::Payload;
use readywall_core::types::{Location, ProjectSize, ProjectType, Timeline};
use readywall_core::{Lead, RecordId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;

impl Entity for Lead {
    const NAME: &'static str = "lead";
    const PLURAL: &'static str = "leads";
    const ENDPOINTS: Endpoints = Endpoints {
        list: "/api/leads",
        fetch: Some("/api/leads/{id}"),
        create: Some("/api/leads"),
        update: Some("/api/leads/{id}"),
        delete: Some("/api/leads/{id}"),
    };
    const ENVELOPE: Envelope = Envelope::Keyed {
        one: "lead",
        many: "leads",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.company]
    }

    fn filter_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

/// Lead form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LeadDraft {
    /// Contact name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Company
    pub company: String,
    /// Project type wire value
    pub project_type: String,
    /// Project size wire value
    pub project_size: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// Postal code
    pub pincode: String,
    /// Requirements
    pub requirements: String,
    /// Timeline wire value
    pub timeline: String,
}

fn check_choice<T: FromStr>(errors: &mut FieldErrors, field: &str, value: &str, label: &str) {
    let value = value.trim();
    if !value.is_empty() && T::from_str(value).is_err() {
        errors.insert(field, format!("Select a valid {label}"));
    }
}

fn optional_choice<T: From<String>>(value: &str) -> Option<T> {
    let value = value.trim();
    (!value.is_empty()).then(|| T::from(value.to_string()))
}

impl Draft for LeadDraft {
    type Record = Lead;

    fn from_record(lead: &Lead) -> Self {
        let location = lead.location.clone().unwrap_or_default();
        Self {
            name: lead.name.clone(),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            company: lead.company.clone(),
            project_type: lead
                .project_type
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
            project_size: lead
                .project_size
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
            address: location.address,
            city: location.city,
            state: location.state,
            pincode: location.pincode,
            requirements: lead.requirements.clone(),
            timeline: lead
                .timeline
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("phone", &self.phone, "Phone is required");
        errors.require("projectType", &self.project_type, "Project type is required");
        errors.require("projectSize", &self.project_size, "Project size is required");
        errors.require("address", &self.address, "Address is required");
        errors.require("city", &self.city, "City is required");
        errors.require("state", &self.state, "State is required");
        errors.require("pincode", &self.pincode, "Pincode is required");
        errors.require("requirements", &self.requirements, "Requirements are required");
        errors.require("timeline", &self.timeline, "Timeline is required");

        check_choice::<ProjectType>(&mut errors, "projectType", &self.project_type, "project type");
        check_choice::<ProjectSize>(&mut errors, "projectSize", &self.project_size, "project size");
        check_choice::<Timeline>(&mut errors, "timeline", &self.timeline, "timeline");
        errors
    }

    fn to_payload(&self, _mode: &FormMode) -> Payload {
        Payload::Json(json!({
            "name": self.name.trim(),
            "email": self.email.trim(),
            "phone": self.phone.trim(),
            "company": self.company.trim(),
            "projectType": self.project_type.trim(),
            "projectSize": self.project_size.trim(),
            "location": {
                "address": self.address.trim(),
                "city": self.city.trim(),
                "state": self.state.trim(),
                "pincode": self.pincode.trim(),
            },
            "requirements": self.requirements.trim(),
            "timeline": self.timeline.trim(),
        }))
    }

    fn apply_to(&self, lead: &Lead) -> Lead {
        Lead {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company: self.company.trim().to_string(),
            project_type: optional_choice(&self.project_type),
            project_size: optional_choice(&self.project_size),
            location: Some(Location {
                address: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                state: self.state.trim().to_string(),
                pincode: self.pincode.trim().to_string(),
            }),
            requirements: self.requirements.trim().to_string(),
            timeline: optional_choice(&self.timeline),
            ..lead.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use readywall_core::LeadStatus;

    fn complete() -> LeadDraft {
        LeadDraft {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9999999999".to_string(),
            company: "Rao Builders".to_string(),
            project_type: "commercial".to_string(),
            project_size: "large".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: "411001".to_string(),
            requirements: "Paver blocks".to_string(),
            timeline: "1-3months".to_string(),
        }
    }

    #[test]
    fn test_empty_draft_reports_every_required_field_at_once() {
        let errors = LeadDraft::default().validate(&FormMode::Create);

        assert_eq!(errors.len(), 11);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("requirements"), Some("Requirements are required"));
        assert!(errors.get("company").is_none());
    }

    #[test]
    fn test_unknown_choice_is_rejected() {
        let draft = LeadDraft {
            timeline: "someday".to_string(),
            ..complete()
        };

        let errors = draft.validate(&FormMode::Create);

        assert_eq!(errors.get("timeline"), Some("Select a valid timeline"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_payload_nests_location() {
        let payload = complete().to_payload(&FormMode::Create);
        let body = payload.as_json().unwrap();

        assert_eq!(body["location"]["city"], "Pune");
        assert_eq!(body["projectType"], "commercial");
        assert!(body.get("city").is_none());
    }

    #[test]
    fn test_apply_to_keeps_status_and_id() {
        let lead: Lead = serde_json::from_value(json!({
            "_id": "l1",
            "name": "Old",
            "status": "Qualified"
        }))
        .unwrap();

        let merged = complete().apply_to(&lead);

        assert_eq!(merged.id.as_str(), "l1");
        assert_eq!(merged.status, LeadStatus::Qualified);
        assert_eq!(merged.name, "Asha Rao");
        assert_eq!(merged.project_type, Some(ProjectType::Commercial));
    }

    #[test]
    fn test_from_record_round_trips_complete_draft() {
        let lead = complete().apply_to(
            &serde_json::from_value::<Lead>(json!({"_id": "l1"})).unwrap(),
        );

        assert_eq!(LeadDraft::from_record(&lead), complete());
    }
}
