use crate::CollaboratorError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Invoice creation and delivery seam
#[async_trait]
pub trait Invoicer: Send + Sync {
    /// Create an invoice from the order's current payable total.
    /// Returns the new invoice id.
    async fn create_invoice(&self, order_id: Uuid) -> Result<String, CollaboratorError>;

    async fn send_invoice(&self, invoice_id: &str) -> Result<(), CollaboratorError>;
}

/// Test double that mints sequential invoice numbers
#[derive(Default)]
pub struct MockInvoicer {
    counter: AtomicU32,
    sent: Mutex<Vec<String>>,
    fail_send: bool,
}

impl MockInvoicer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub fn sent_invoices(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoicer for MockInvoicer {
    async fn create_invoice(&self, _order_id: Uuid) -> Result<String, CollaboratorError> {
        let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("INV-{seq:05}"))
    }

    async fn send_invoice(&self, invoice_id: &str) -> Result<(), CollaboratorError> {
        if self.fail_send {
            return Err(format!("simulated send failure for {invoice_id}").into());
        }
        self.sent.lock().unwrap().push(invoice_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sequential_invoice_ids() {
        let invoicer = MockInvoicer::new();
        let a = invoicer.create_invoice(Uuid::new_v4()).await.unwrap();
        let b = invoicer.create_invoice(Uuid::new_v4()).await.unwrap();
        assert_eq!(a, "INV-00001");
        assert_eq!(b, "INV-00002");
    }
}
