use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::feedback::{EphemeralFeedback, COPY_FEEDBACK_DURATION};

pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

/// Copies a fixed piece of text and shows a short acknowledgement.
#[derive(Clone)]
pub struct CopyAction {
    clipboard: Arc<dyn ClipboardWriter>,
    feedback: EphemeralFeedback,
    text: String,
    duration: Duration,
}

impl CopyAction {
    pub fn new(clipboard: Arc<dyn ClipboardWriter>, text: impl Into<String>) -> Self {
        Self {
            clipboard,
            feedback: EphemeralFeedback::new("copied"),
            text: text.into(),
            duration: COPY_FEEDBACK_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The acknowledgement is armed whether or not the clipboard accepted the write.
    pub fn copy(&self) {
        match self.clipboard.write_text(&self.text) {
            Ok(()) => info!("copied contact address to clipboard"),
            Err(err) => warn!(error = %err, "clipboard write failed"),
        }
        self.feedback.arm(self.duration);
    }

    pub fn is_acknowledged(&self) -> bool {
        self.feedback.is_active()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingClipboard {
        fail: bool,
        writes: Mutex<Vec<String>>,
    }

    impl ClipboardWriter for RecordingClipboard {
        fn write_text(&self, text: &str) -> anyhow::Result<()> {
            self.writes.lock().expect("writes").push(text.to_string());
            if self.fail {
                anyhow::bail!("clipboard unavailable");
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn copy_writes_and_acknowledges_for_two_seconds() {
        let clipboard = Arc::new(RecordingClipboard::default());
        let action = CopyAction::new(clipboard.clone(), "me@example.com");

        action.copy();
        assert!(action.is_acknowledged());
        assert_eq!(
            *clipboard.writes.lock().expect("writes"),
            vec!["me@example.com".to_string()]
        );

        tokio::time::sleep(Duration::from_millis(2001)).await;
        assert!(!action.is_acknowledged());
    }

    #[tokio::test]
    async fn failed_write_still_acknowledges() {
        let clipboard = Arc::new(RecordingClipboard {
            fail: true,
            ..Default::default()
        });
        let action = CopyAction::new(clipboard, "me@example.com");
        action.copy();
        assert!(action.is_acknowledged());
    }
}
