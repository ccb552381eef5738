use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::DeliveryError,
    protocol::{SubmissionAck, SubmissionRequest, SubmissionResponse},
};
use tracing::{info, warn};

pub const DEFAULT_SUBMIT_ENDPOINT: &str = "https://api.web3forms.com/submit";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const FALLBACK_REJECTION_MESSAGE: &str = "Failed to send message";

#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn deliver(&self, request: &SubmissionRequest) -> Result<SubmissionAck, DeliveryError>;
}

pub struct HttpSubmissionTransport {
    http: Client,
    endpoint: String,
}

impl HttpSubmissionTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build submission http client")?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmissionTransport {
    async fn deliver(&self, request: &SubmissionRequest) -> Result<SubmissionAck, DeliveryError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        let parsed = serde_json::from_str::<SubmissionResponse>(&raw);

        if !status.is_success() {
            warn!(endpoint = %self.endpoint, %status, "submission endpoint returned error status");
            return Err(match parsed {
                Ok(body) if !body.success => DeliveryError::Rejected {
                    message: body
                        .message
                        .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string()),
                },
                _ => DeliveryError::Transport(format!("endpoint returned HTTP {status}")),
            });
        }

        let body = parsed
            .map_err(|err| DeliveryError::Transport(format!("malformed endpoint response: {err}")))?;
        if !body.success {
            return Err(DeliveryError::Rejected {
                message: body
                    .message
                    .unwrap_or_else(|| FALLBACK_REJECTION_MESSAGE.to_string()),
            });
        }

        info!(endpoint = %self.endpoint, "submission accepted");
        Ok(SubmissionAck {
            message: body.message,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Accept,
    Reject(String),
    TransportFailure(String),
}

/// In-process stand-in for the delivery endpoint: waits `latency`, records the
/// request, then answers with the configured outcome.
pub struct SimulatedTransport {
    latency: Duration,
    outcome: Mutex<SimulatedOutcome>,
    requests: Mutex<Vec<SubmissionRequest>>,
}

impl SimulatedTransport {
    pub fn new(outcome: SimulatedOutcome) -> Self {
        Self {
            latency: Duration::ZERO,
            outcome: Mutex::new(outcome),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting() -> Self {
        Self::new(SimulatedOutcome::Accept)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_outcome(&self, outcome: SimulatedOutcome) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = outcome;
    }

    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn requests(&self) -> Vec<SubmissionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionTransport for SimulatedTransport {
    async fn deliver(&self, request: &SubmissionRequest) -> Result<SubmissionAck, DeliveryError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let outcome = self
            .outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match outcome {
            SimulatedOutcome::Accept => Ok(SubmissionAck::default()),
            SimulatedOutcome::Reject(message) => Err(DeliveryError::Rejected { message }),
            SimulatedOutcome::TransportFailure(reason) => Err(DeliveryError::Transport(reason)),
        }
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
