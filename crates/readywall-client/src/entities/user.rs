//! Registered users

use crate::entity::{Endpoints, Entity, Envelope, endpoint_path};
use crate::status::{StatusField, StatusRequest};
use readywall_core::{RecordId, User};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

impl Entity for User {
    const NAME: &'static str = "user";
    const PLURAL: &'static str = "users";
    const ENDPOINTS: Endpoints = Endpoints {
        list: "/api/auth/users",
        fetch: None,
        create: None,
        update: None,
        delete: None,
    };
    const ENVELOPE: Envelope = Envelope::Keyed {
        one: "user",
        many: "users",
    };

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email, &self.role]
    }

    fn filter_value(&self) -> Option<&str> {
        Some(Activation::from(self.is_active).as_str())
    }
}

/// Whether an account may sign in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// May sign in
    Active,
    /// Blocked
    Inactive,
}

impl Activation {
    /// Filter value
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// The other state
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Value of the `isActive` flag
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for Activation {
    fn from(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StatusField for User {
    type Status = Activation;

    fn status(&self) -> Activation {
        Activation::from(self.is_active)
    }

    fn set_status(&mut self, status: Activation) {
        self.is_active = status.is_active();
    }

    fn status_request(id: &RecordId, status: &Activation) -> StatusRequest {
        let template = match status {
            Activation::Active => "/api/auth/users/{id}/activate",
            Activation::Inactive => "/api/auth/users/{id}/deactivate",
        };
        StatusRequest {
            method: Method::PUT,
            path: endpoint_path(template, id),
            body: json!({ "isActive": status.is_active() }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_value_follows_flag() {
        let mut user: User =
            serde_json::from_value(json!({"_id": "u1", "name": "Ravi", "isActive": true})).unwrap();
        assert_eq!(user.filter_value(), Some("active"));

        user.set_status(Activation::Inactive);
        assert_eq!(user.filter_value(), Some("inactive"));
        assert!(!user.is_active);
        assert_eq!(user.name, "Ravi");
    }

    #[test]
    fn test_deactivate_request() {
        let request = User::status_request(&RecordId::from("u1"), &Activation::Inactive);

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.path, "/api/auth/users/u1/deactivate");
        assert_eq!(request.body, json!({"isActive": false}));
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Activation::from(true).toggled(), Activation::Inactive);
        assert_eq!(Activation::Inactive.toggled(), Activation::Active);
    }
}
