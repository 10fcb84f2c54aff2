//! Prometheus counters for relayed calls.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::RelayError;
use crate::relay::Relayed;

/// Upstream backend a call was relayed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Azure,
    Ollama,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Azure => "azure",
            Backend::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    requests: IntCounterVec,
}

impl RelayMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let requests = IntCounterVec::new(
            Opts::new("relay_requests_total", "Relayed requests by backend and outcome"),
            &["backend", "outcome"],
        )?;
        registry.register(Box::new(requests.clone()))?;
        Ok(Self { registry, requests })
    }

    /// Count one call. The outcome label is the upstream status code, or
    /// `error` when no upstream response was relayed.
    pub fn observe(&self, backend: Backend, result: &Result<Relayed, RelayError>) {
        let outcome = match result {
            Ok(relayed) => relayed.status.as_str().to_string(),
            Err(_) => "error".to_string(),
        };
        self.requests
            .with_label_values(&[backend.as_str(), outcome.as_str()])
            .inc();
    }

    pub fn count(&self, backend: Backend, outcome: &str) -> u64 {
        self.requests
            .with_label_values(&[backend.as_str(), outcome])
            .get()
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
