//! Mock implementations of kernel traits for tests.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::kernel::BaseSmsService;

/// Recording SMS mock. Stores every (recipient, code) pair instead of
/// talking to Twilio, so tests can assert on delivery (or its absence).
#[derive(Default)]
pub struct MockSmsService {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far, oldest first.
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("mock lock poisoned").clone()
    }

    /// Number of messages recorded.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mock lock poisoned").len()
    }

    /// Most recent code delivered to the given recipient, if any.
    pub fn last_code_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .iter()
            .rev()
            .find(|(to, _)| to == recipient)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl BaseSmsService for MockSmsService {
    async fn send_code(&self, recipient: &str, code: &str) -> Result<()> {
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .push((recipient.to_string(), code.to_string()));
        Ok(())
    }
}
