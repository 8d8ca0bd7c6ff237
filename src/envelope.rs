use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request parameters carried by an envelope
pub type Params = Map<String, Value>;

/// Global counter keeping envelope ids unique within one process
static ENVELOPE_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Get the next global sequence number
fn next_sequence_number() -> usize {
    ENVELOPE_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// One request between two named agents. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    id: String,
    method: String,
    params: Params,
    timestamp: DateTime<Utc>,
    sender: String,
    recipient: String,
}

impl Envelope {
    pub fn new(sender: &str, recipient: &str, method: &str, params: Params) -> Self {
        let timestamp = Utc::now();
        let id = format!(
            "{}_{}_{:03}",
            sender,
            timestamp.timestamp_millis(),
            next_sequence_number()
        );

        Self {
            id,
            method: method.to_string(),
            params,
            timestamp,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

/// Outcome of a handled request: either a text payload or an error description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentResult {
    Success(String),
    Failure(String),
}

impl AgentResult {
    pub fn unknown_method() -> Self {
        AgentResult::Failure("Unknown method".to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentResult::Success(_))
    }

    pub fn data(&self) -> Option<&str> {
        match self {
            AgentResult::Success(data) => Some(data),
            AgentResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AgentResult::Success(_) => None,
            AgentResult::Failure(error) => Some(error),
        }
    }

    /// Wire form: `{"success": bool, "data"|"error": string}`
    pub fn to_json(&self) -> Value {
        match self {
            AgentResult::Success(data) => json!({ "success": true, "data": data }),
            AgentResult::Failure(error) => json!({ "success": false, "error": error }),
        }
    }
}

impl<E: fmt::Display> From<std::result::Result<String, E>> for AgentResult {
    fn from(result: std::result::Result<String, E>) -> Self {
        match result {
            Ok(data) => AgentResult::Success(data),
            Err(e) => AgentResult::Failure(e.to_string()),
        }
    }
}

/// Read a string parameter, treating a missing or non-string value as empty
pub fn str_param<'a>(params: &'a Params, key: &str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_within_the_same_millisecond() {
        let first = Envelope::new("coordinator", "search_agent", "web_search", Params::new());
        let second = Envelope::new("coordinator", "search_agent", "web_search", Params::new());

        assert_ne!(first.id(), second.id());
        assert!(first.id().starts_with("coordinator_"));
    }

    #[test]
    fn envelope_keeps_routing_fields() {
        let mut params = Params::new();
        params.insert("query".to_string(), json!("rust"));
        let envelope = Envelope::new("coordinator", "search_agent", "web_search", params);

        assert_eq!(envelope.sender(), "coordinator");
        assert_eq!(envelope.recipient(), "search_agent");
        assert_eq!(envelope.method(), "web_search");
        assert_eq!(str_param(envelope.params(), "query"), "rust");
        assert_eq!(str_param(envelope.params(), "missing"), "");
    }

    #[test]
    fn result_json_has_exactly_one_payload_key() {
        let ok = AgentResult::Success("done".to_string()).to_json();
        assert_eq!(ok["success"], json!(true));
        assert_eq!(ok["data"], json!("done"));
        assert!(ok.get("error").is_none());

        let failed = AgentResult::unknown_method().to_json();
        assert_eq!(failed["success"], json!(false));
        assert_eq!(failed["error"], json!("Unknown method"));
        assert!(failed.get("data").is_none());
    }
}
