use crate::envelope::{AgentResult, Envelope, Params};
use crate::error::Result;
use std::str::FromStr;

/// Core trait that all agents must implement
/// Requests arrive as envelopes and are dispatched on a per-agent method tag
#[async_trait::async_trait]
pub trait Agent: Send {
    /// Methods this agent understands, parsed from the envelope's method string
    type Method: FromStr + Send;

    /// Input of the agent's core capability
    type Input: Send;

    /// Get the name of the agent
    fn name(&self) -> &str;

    /// Envelopes this agent has sent or received, oldest first
    fn message_log(&self) -> &[Envelope];

    /// Append an envelope to the message log
    fn record(&mut self, envelope: Envelope);

    /// Handle an already-recognized method
    async fn handle(&mut self, method: Self::Method, params: &Params) -> AgentResult;

    /// The agent's core capability
    async fn run(&mut self, input: Self::Input) -> Result<String>;

    /// Build an envelope addressed to `recipient` and log it as sent
    fn send(&mut self, recipient: &str, method: &str, params: Params) -> Envelope {
        let envelope = Envelope::new(self.name(), recipient, method, params);
        log::info!("{} → {}: {}", self.name(), recipient, method);
        self.record(envelope.clone());
        envelope
    }

    /// Log an incoming envelope and dispatch it synchronously
    async fn receive(&mut self, envelope: Envelope) -> AgentResult {
        log::info!(
            "{} ← {}: {}",
            self.name(),
            envelope.sender(),
            envelope.method()
        );
        let method = envelope.method().to_string();
        let params = envelope.params().clone();
        self.record(envelope);

        self.handle_request(&method, &params).await
    }

    /// Reply for a method string that does not parse into `Self::Method`
    fn unrecognized(&self, method: &str) -> AgentResult {
        log::warn!("{} received unknown method: {}", self.name(), method);
        AgentResult::unknown_method()
    }

    /// String-keyed entry point; unrecognized methods never reach `handle`
    async fn handle_request(&mut self, method: &str, params: &Params) -> AgentResult {
        let parsed = method.parse::<Self::Method>().ok();
        match parsed {
            Some(method) => self.handle(method, params).await,
            None => self.unrecognized(method),
        }
    }
}
