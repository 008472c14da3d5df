use crate::CollaboratorError;
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

/// Outbound customer notification seam (email/SMS delivery lives behind it).
///
/// The engine decides *whether* a notification fires and what data it
/// carries; rendering and delivery are this collaborator's problem. A send
/// is invoked at most once per accepted effect; the engine flips its own
/// "already sent" flags, so re-entry does not duplicate.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        kind: &str,
        order_id: Uuid,
        payload: serde_json::Value,
    ) -> Result<(), CollaboratorError>;
}

/// Recording notifier for tests; optionally fails matching kinds.
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<(String, Uuid, serde_json::Value)>>,
    fail_kinds: Vec<String>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends of the given kind fail, for exercising failure reporting
    pub fn failing_on(kind: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_kinds: vec![kind.to_string()],
        }
    }

    pub fn sent(&self) -> Vec<(String, Uuid, serde_json::Value)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_kinds(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(k, _, _)| k.clone()).collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        kind: &str,
        order_id: Uuid,
        payload: serde_json::Value,
    ) -> Result<(), CollaboratorError> {
        if self.fail_kinds.iter().any(|k| k == kind) {
            return Err(format!("simulated delivery failure for {kind}").into());
        }
        self.sent
            .lock()
            .unwrap()
            .push((kind.to_string(), order_id, payload));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_sends() {
        let notifier = MockNotifier::new();
        let order_id = Uuid::new_v4();
        notifier
            .send("documents_received", order_id, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(notifier.sent_kinds(), vec!["documents_received"]);
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let notifier = MockNotifier::failing_on("invoice_sent");
        let result = notifier
            .send("invoice_sent", Uuid::new_v4(), serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }
}
