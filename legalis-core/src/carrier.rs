use crate::CollaboratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Result of booking a shipment with a carrier (DHL, PostNord)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRef {
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_url: Option<String>,
    /// Shipping label PDF, base64 encoded, when the carrier returns one
    pub label_base64: Option<String>,
    pub booked_at: chrono::DateTime<chrono::Utc>,
}

/// Carrier booking seam. Opaque to the engine: step completion cares only
/// about operator-confirmed status, never about carrier callbacks.
#[async_trait]
pub trait CarrierBooking: Send + Sync {
    /// Book the return shipment for an order
    async fn book_return(&self, order_id: Uuid) -> Result<BookingRef, CollaboratorError>;

    /// Book a pickup from the customer address
    async fn book_pickup(&self, order_id: Uuid) -> Result<BookingRef, CollaboratorError>;
}

pub struct MockCarrierBooking {
    carrier: String,
}

impl MockCarrierBooking {
    pub fn new(carrier: &str) -> Self {
        Self {
            carrier: carrier.to_string(),
        }
    }
}

#[async_trait]
impl CarrierBooking for MockCarrierBooking {
    async fn book_return(&self, order_id: Uuid) -> Result<BookingRef, CollaboratorError> {
        Ok(BookingRef {
            carrier: self.carrier.clone(),
            tracking_number: format!("TRK-{}", order_id.simple()),
            tracking_url: None,
            label_base64: None,
            booked_at: chrono::Utc::now(),
        })
    }

    async fn book_pickup(&self, order_id: Uuid) -> Result<BookingRef, CollaboratorError> {
        Ok(BookingRef {
            carrier: self.carrier.clone(),
            tracking_number: format!("PKP-{}", order_id.simple()),
            tracking_url: None,
            label_base64: None,
            booked_at: chrono::Utc::now(),
        })
    }
}
