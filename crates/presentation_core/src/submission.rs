//! Contact form lifecycle: editing, a single in-flight delivery, and the
//! success banner that resets the form when it clears.

use std::{
    sync::{Arc, LazyLock},
    time::Duration,
};

use regex::Regex;
use shared::{
    domain::{ContactFields, FieldName, SubmissionStatus},
    error::{ContactError, DeliveryError, ValidationError, DELIVERY_FAILED_MESSAGE},
    protocol::{SubmissionAck, SubmissionRequest},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};

use crate::{
    feedback::{EphemeralFeedback, SUCCESS_BANNER_DURATION},
    transport::SubmissionTransport,
};

const FORM_EVENT_CAPACITY: usize = 32;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

#[derive(Debug, Clone)]
pub struct ContactFormConfig {
    pub access_key: String,
    pub success_banner: Duration,
}

impl ContactFormConfig {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            success_banner: SUCCESS_BANNER_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    StatusChanged {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
}

#[derive(Debug, Default)]
struct FormState {
    fields: ContactFields,
    status: SubmissionStatus,
    error_message: Option<String>,
}

fn transition(state: &mut FormState, events: &broadcast::Sender<FormEvent>, to: SubmissionStatus) {
    let from = state.status;
    if from == to {
        return;
    }
    state.status = to;
    info!(?from, ?to, "contact form status changed");
    let _ = events.send(FormEvent::StatusChanged { from, to });
}

pub fn validate_fields(fields: &ContactFields) -> Result<(), ValidationError> {
    for field in FieldName::ALL {
        if fields.get(field).trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    let email = fields.email.trim();
    if !EMAIL_SHAPE.is_match(email) {
        return Err(ValidationError::MalformedEmail(email.to_string()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct ContactForm {
    inner: Arc<Mutex<FormState>>,
    transport: Arc<dyn SubmissionTransport>,
    banner: EphemeralFeedback,
    events: broadcast::Sender<FormEvent>,
    config: Arc<ContactFormConfig>,
}

impl ContactForm {
    pub fn new(config: ContactFormConfig, transport: Arc<dyn SubmissionTransport>) -> Self {
        let (events, _) = broadcast::channel(FORM_EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(FormState::default())),
            transport,
            banner: EphemeralFeedback::new("message-sent"),
            events,
            config: Arc::new(config),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub async fn status(&self) -> SubmissionStatus {
        self.inner.lock().await.status
    }

    pub async fn fields(&self) -> ContactFields {
        self.inner.lock().await.fields.clone()
    }

    pub async fn error_message(&self) -> Option<String> {
        self.inner.lock().await.error_message.clone()
    }

    pub fn success_banner_visible(&self) -> bool {
        self.banner.is_active()
    }

    pub async fn update_field(
        &self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<(), ContactError> {
        let mut state = self.inner.lock().await;
        if !state.status.accepts_edits() {
            return Err(ContactError::Locked(state.status));
        }
        state.fields.set(field, value);
        if state.status == SubmissionStatus::Failed {
            state.error_message = None;
            transition(&mut state, &self.events, SubmissionStatus::Idle);
        }
        Ok(())
    }

    /// Validates and delivers the current fields. Only one delivery may be in
    /// flight; once sent it runs to completion even if the caller stops waiting.
    pub async fn submit(&self) -> Result<SubmissionAck, ContactError> {
        let delivery = self.start_submit().await?;
        match delivery.await {
            Ok(result) => result,
            Err(join_err) => {
                let failure = DeliveryError::Transport(format!("submission task failed: {join_err}"));
                self.finish(Err(failure)).await
            }
        }
    }

    /// Moves the form to `Submitting` and hands delivery to a background task.
    /// The outcome is reported through [`ContactForm::subscribe`] and the
    /// returned handle.
    pub async fn start_submit(
        &self,
    ) -> Result<JoinHandle<Result<SubmissionAck, ContactError>>, ContactError> {
        let request = {
            let mut state = self.inner.lock().await;
            match state.status {
                SubmissionStatus::Submitting => return Err(ContactError::AlreadySubmitting),
                SubmissionStatus::Succeeded => {
                    return Err(ContactError::Locked(SubmissionStatus::Succeeded))
                }
                SubmissionStatus::Idle | SubmissionStatus::Failed => {}
            }
            validate_fields(&state.fields)?;
            if state.status == SubmissionStatus::Failed {
                state.error_message = None;
                transition(&mut state, &self.events, SubmissionStatus::Idle);
            }
            transition(&mut state, &self.events, SubmissionStatus::Submitting);
            SubmissionRequest::from_fields(self.config.access_key.clone(), &state.fields)
        };

        let form = self.clone();
        Ok(tokio::spawn(async move {
            let outcome = form.transport.deliver(&request).await;
            form.finish(outcome).await
        }))
    }

    async fn finish(
        &self,
        outcome: Result<SubmissionAck, DeliveryError>,
    ) -> Result<SubmissionAck, ContactError> {
        let mut state = self.inner.lock().await;
        match outcome {
            Ok(ack) => {
                state.error_message = None;
                transition(&mut state, &self.events, SubmissionStatus::Succeeded);
                drop(state);
                self.arm_reset();
                Ok(ack)
            }
            Err(err) => {
                warn!(error = %err, "contact submission failed");
                state.error_message = Some(DELIVERY_FAILED_MESSAGE.to_string());
                transition(&mut state, &self.events, SubmissionStatus::Failed);
                Err(err.into())
            }
        }
    }

    fn arm_reset(&self) {
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        self.banner
            .arm_then(self.config.success_banner, async move {
                let mut state = inner.lock().await;
                if state.status == SubmissionStatus::Succeeded {
                    state.fields.clear();
                    transition(&mut state, &events, SubmissionStatus::Idle);
                }
            });
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
