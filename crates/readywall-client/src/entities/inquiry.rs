//! Customer inquiries

use crate::entity::{Endpoints, Entity, Envelope, endpoint_path};
use crate::form::{Draft, FieldErrors, FormMode};
use crate::status::{StatusField, StatusRequest};
use crate::upload::Payload;
use readywall_core::{Inquiry, InquiryStatus, RecordId};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

impl Entity for Inquiry {
    const NAME: &'static str = "inquiry";
    const PLURAL: &'static str = "inquiries";
    const ENDPOINTS: Endpoints = Endpoints {
        list: "/api/inquiry",
        fetch: None,
        create: Some("/api/inquiry/create"),
        update: None,
        delete: Some("/api/inquiry/{id}"),
    };
    const ENVELOPE: Envelope = Envelope::Data;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.phone,
            &self.message,
            &self.product_interest,
        ]
    }

    fn filter_value(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

impl StatusField for Inquiry {
    type Status = InquiryStatus;

    fn status(&self) -> InquiryStatus {
        self.status.clone()
    }

    fn set_status(&mut self, status: InquiryStatus) {
        self.status = status;
    }

    fn status_request(id: &RecordId, status: &InquiryStatus) -> StatusRequest {
        StatusRequest {
            method: Method::PATCH,
            path: endpoint_path("/api/inquiry/{id}/status", id),
            body: json!({ "status": status.as_str() }),
        }
    }
}

/// Inquiry form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InquiryDraft {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Phone
    pub phone: String,
    /// Product asked about
    pub product_interest: String,
    /// Message
    pub message: String,
}

impl Draft for InquiryDraft {
    type Record = Inquiry;

    fn from_record(inquiry: &Inquiry) -> Self {
        Self {
            first_name: inquiry.first_name.clone(),
            last_name: inquiry.last_name.clone(),
            email: inquiry.email.clone(),
            phone: inquiry.phone.clone(),
            product_interest: inquiry.product_interest.clone(),
            message: inquiry.message.clone(),
        }
    }

    fn validate(&self, _mode: &FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("firstName", &self.first_name, "First name is required");
        errors.require("lastName", &self.last_name, "Last name is required");
        errors.require("email", &self.email, "Email is required");
        errors.require("phone", &self.phone, "Phone is required");
        errors.require("message", &self.message, "Message is required");
        errors
    }

    fn to_payload(&self, _mode: &FormMode) -> Payload {
        Payload::Json(json!({
            "firstName": self.first_name.trim(),
            "lastName": self.last_name.trim(),
            "email": self.email.trim(),
            "phone": self.phone.trim(),
            "productInterest": self.product_interest.trim(),
            "message": self.message.trim(),
        }))
    }

    fn apply_to(&self, inquiry: &Inquiry) -> Inquiry {
        Inquiry {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            product_interest: self.product_interest.trim().to_string(),
            message: self.message.trim().to_string(),
            ..inquiry.clone()
        }
    }
}
