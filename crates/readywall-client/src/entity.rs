//! Per-entity endpoint tables and response envelopes
//!
//! Every record kind the dashboard manages implements [`Entity`]. The list,
//! form and delete workflows are written once against this trait.

use crate::error::{GatewayError, GatewayResult};
use readywall_core::RecordId;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use tracing::error;

/// Endpoint paths for one entity; `{id}` is replaced by the percent-encoded record id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Collection listing
    pub list: &'static str,
    /// Single record
    pub fetch: Option<&'static str>,
    /// Create
    pub create: Option<&'static str>,
    /// Update (PUT)
    pub update: Option<&'static str>,
    /// Delete
    pub delete: Option<&'static str>,
}

/// Fill `{id}` in an endpoint template
#[must_use]
pub fn endpoint_path(template: &str, id: &RecordId) -> String {
    template.replace("{id}", &urlencoding::encode(id.as_str()))
}

fn decode_failure(context: &str, message: impl Into<String>) -> GatewayError {
    let message = message.into();
    error!(context, %message, "undecodable gateway response");
    GatewayError::decode(context, message)
}

/// How a response body wraps its records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{"lead": {...}}` for one record, `{"leads": [...]}` for a list
    Keyed {
        /// Key holding a single record
        one: &'static str,
        /// Key holding a list
        many: &'static str,
    },
    /// `{"success": bool, "message": "...", "data": ...}`
    Data,
}

impl Envelope {
    const fn key(self, many: bool) -> &'static str {
        match self {
            Self::Keyed { one, many: plural } => {
                if many {
                    plural
                } else {
                    one
                }
            }
            Self::Data => "data",
        }
    }

    /// Fail when a `Data` body reports `success: false`
    ///
    /// A missing `success` flag counts as success.
    pub fn check_ack(self, body: &Value) -> GatewayResult<()> {
        if self != Self::Data {
            return Ok(());
        }

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or("Request was not successful");
            return Err(GatewayError::Rejected {
                message: message.to_string(),
            });
        }

        Ok(())
    }

    fn take(self, body: Value, many: bool, context: &str) -> GatewayResult<Option<Value>> {
        self.check_ack(&body)?;
        match body {
            Value::Null => Ok(None),
            Value::Object(mut map) => Ok(map.remove(self.key(many)).filter(|v| !v.is_null())),
            _ => Err(decode_failure(context, "response is not a JSON object")),
        }
    }

    /// Extract a record list
    pub fn decode_many<E: DeserializeOwned>(self, body: Value, context: &str) -> GatewayResult<Vec<E>> {
        let payload = self.take(body, true, context)?.ok_or_else(|| {
            decode_failure(context, format!("response has no `{}` field", self.key(true)))
        })?;
        serde_json::from_value(payload).map_err(|e| decode_failure(context, e.to_string()))
    }

    /// Extract a single record that must be present
    pub fn decode_one<E: DeserializeOwned>(self, body: Value, context: &str) -> GatewayResult<E> {
        self.decode_echo(body, context)?.ok_or_else(|| {
            decode_failure(context, format!("response has no `{}` field", self.key(false)))
        })
    }

    /// Extract a single record the server may or may not echo back
    pub fn decode_echo<E: DeserializeOwned>(
        self,
        body: Value,
        context: &str,
    ) -> GatewayResult<Option<E>> {
        self.take(body, false, context)?
            .map(|payload| {
                serde_json::from_value(payload)
                    .map_err(|e| decode_failure(context, e.to_string()))
            })
            .transpose()
    }
}

/// A record kind managed through the dashboard
pub trait Entity:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Singular name used in messages ("lead")
    const NAME: &'static str;
    /// Plural name used in messages ("leads")
    const PLURAL: &'static str;
    /// Endpoint table
    const ENDPOINTS: Endpoints;
    /// Response envelope shape
    const ENVELOPE: Envelope;

    /// Record id
    fn id(&self) -> &RecordId;

    /// Text fields the free-text search matches against
    fn search_fields(&self) -> Vec<&str>;

    /// Value the category/status filter compares against, if the entity has one
    fn filter_value(&self) -> Option<&str>;
}

/// Whether `item` matches a case-insensitive search term
///
/// An empty term matches everything.
pub fn matches_search<E: Entity>(item: &E, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use readywall_core::{Inquiry, Lead};
    use serde_json::json;

    const LEADS: Envelope = Envelope::Keyed {
        one: "lead",
        many: "leads",
    };

    #[test]
    fn test_endpoint_path_encodes_id() {
        let id = RecordId::from("a b/c");
        assert_eq!(endpoint_path("/api/leads/{id}", &id), "/api/leads/a%20b%2Fc");
        assert_eq!(
            endpoint_path("/api/inquiry/{id}/status", &RecordId::from("i1")),
            "/api/inquiry/i1/status"
        );
    }

    #[test]
    fn test_keyed_envelope_decodes_list() {
        let body = json!({"leads": [{"_id": "1", "name": "Asha"}, {"_id": "2", "name": "Ravi"}]});
        let leads: Vec<Lead> = LEADS.decode_many(body, "fetch leads").unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[1].name, "Ravi");
    }

    #[test]
    fn test_list_accepts_records_with_virtual_id() {
        let body = json!({"leads": [
            {"_id": "1", "id": "1", "name": "Asha"},
            {"id": "2", "name": "Ravi"}
        ]});
        let leads: Vec<Lead> = LEADS.decode_many(body, "fetch leads").unwrap();

        assert_eq!(leads[0].id.as_str(), "1");
        assert_eq!(leads[1].id.as_str(), "2");
    }

    #[test]
    fn test_missing_list_key_is_a_decode_error() {
        let result: GatewayResult<Vec<Lead>> = LEADS.decode_many(json!({"items": []}), "fetch leads");

        assert!(matches!(result, Err(GatewayError::Decode { .. })));
    }

    #[test]
    fn test_data_envelope_with_failure_flag_is_rejected() {
        let body = json!({"success": false, "message": "Inquiry not found"});
        let result: GatewayResult<Vec<Inquiry>> = Envelope::Data.decode_many(body, "fetch inquiries");

        match result {
            Err(GatewayError::Rejected { message }) => assert_eq!(message, "Inquiry not found"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_echo_is_optional_but_must_be_well_formed() {
        let absent: Option<Lead> = LEADS.decode_echo(json!({"message": "ok"}), "update lead").unwrap();
        assert!(absent.is_none());

        let empty: Option<Lead> = LEADS.decode_echo(Value::Null, "update lead").unwrap();
        assert!(empty.is_none());

        let malformed: GatewayResult<Option<Lead>> =
            LEADS.decode_echo(json!({"lead": "not a record"}), "update lead");
        assert!(malformed.is_err());
    }

    #[test]
    fn test_decode_one_requires_record() {
        let result: GatewayResult<Lead> = LEADS.decode_one(json!({}), "create lead");
        assert!(matches!(result, Err(GatewayError::Decode { .. })));

        let lead: Lead = LEADS
            .decode_one(json!({"lead": {"_id": "9", "name": "Meera"}}), "create lead")
            .unwrap();
        assert_eq!(lead.id.as_str(), "9");
    }
}
