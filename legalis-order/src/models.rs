use crate::steps::StepId;
use chrono::{DateTime, NaiveDate, Utc};
use legalis_catalog::{ReturnService, ServiceKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a single processing step
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// Where the customer's documents come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Original,
    Upload,
}

/// One entry in the per-order processing checklist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessingStep {
    pub id: StepId,
    pub name: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Date the documents were handed to the authority (delivery legs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<NaiveDate>,
    /// Date the authority is expected to release the documents (pickup legs)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<NaiveDate>,
    /// Last expected-completion date the customer was actually told about.
    /// Only advanced when a notification really went out, never speculatively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notified_expected_completion_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_by: Option<String>,
}

impl ProcessingStep {
    pub fn new(id: StepId) -> Self {
        Self {
            id,
            name: id.display_name().to_string(),
            status: StepStatus::Pending,
            notes: None,
            submitted_at: None,
            expected_completion_date: None,
            notified_expected_completion_date: None,
            completed_at: None,
            completed_by: None,
        }
    }

    /// Fresh template step seeded already completed (e.g. files were
    /// uploaded before the checklist existed)
    pub fn completed_on_creation(id: StepId) -> Self {
        Self {
            status: StepStatus::Completed,
            ..Self::new(id)
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// Stamp completion metadata; `completed_at`/`completed_by` exist iff
    /// the step is completed.
    pub(crate) fn set_status(&mut self, status: StepStatus, actor: &str, now: DateTime<Utc>) {
        self.status = status;
        if status == StepStatus::Completed {
            self.completed_at = Some(now);
            self.completed_by = Some(actor.to_string());
        } else {
            self.completed_at = None;
            self.completed_by = None;
        }
    }
}

/// One immutable line of the base price breakdown. Older orders stored the
/// charged amount under different field names, hence the pile of options;
/// `pricing::line_base_amount` resolves them in fixed preference order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PriceLine {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_rate: Option<f64>,
    /// Line amount still "to be confirmed" (typically an embassy fee)
    #[serde(default)]
    pub is_tbc: bool,
}

impl PriceLine {
    pub fn with_total(description: &str, total: f64) -> Self {
        Self {
            description: description.to_string(),
            total: Some(total),
            ..Self::default()
        }
    }
}

/// Admin-entered replacement for one breakdown line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineOverride {
    pub index: usize,
    pub label: String,
    pub base_amount: f64,
    #[serde(default)]
    pub override_amount: Option<f64>,
    /// Stored for invoice export only; not part of the total computation
    #[serde(default)]
    pub vat_percent: Option<f64>,
    pub include: bool,
}

/// Free-form price adjustment line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Adjustment {
    pub description: String,
    pub amount: f64,
}

/// Admin price override record. Created or replaced wholesale on every
/// save, never partially merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingOverride {
    pub discount_amount: f64,
    pub discount_percent: f64,
    pub adjustments: Vec<Adjustment>,
    pub line_overrides: Vec<LineOverride>,
    /// Sum of included lines before adjustments and discount
    pub breakdown_base: f64,
    pub computed_total: f64,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

/// Snapshot of a legalization order, as the engine sees it.
///
/// Owned by the external store; engine operations take it by reference and
/// return new step lists, effects and patches rather than mutating shared
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    /// Unique, entry order preserved for display
    pub services: Vec<ServiceKind>,
    pub quantity: u32,
    pub country: String,
    #[serde(default)]
    pub pickup_service: bool,
    #[serde(default)]
    pub scanned_copies: bool,
    #[serde(default)]
    pub expedited: bool,
    pub document_source: DocumentSource,
    #[serde(default)]
    pub will_send_main_docs_later: bool,
    #[serde(default)]
    pub files_uploaded: bool,
    #[serde(default)]
    pub return_service: Option<ReturnService>,
    /// Customer supplied their own prepaid return label
    #[serde(default)]
    pub has_return_label: bool,
    #[serde(default)]
    pub confirm_return_address_later: bool,

    #[serde(default)]
    pub pricing_breakdown: Vec<PriceLine>,
    #[serde(default)]
    pub admin_price: Option<PricingOverride>,
    #[serde(default)]
    pub total_price: f64,

    #[serde(default)]
    pub processing_steps: Vec<ProcessingStep>,

    // Embassy price confirmation state
    #[serde(default)]
    pub has_unconfirmed_prices: bool,
    #[serde(default)]
    pub pending_embassy_price: Option<f64>,
    #[serde(default)]
    pub confirmed_embassy_price: Option<f64>,
    #[serde(default)]
    pub embassy_price_confirmation_sent: bool,
    #[serde(default)]
    pub embassy_price_confirmed: bool,
    #[serde(default)]
    pub embassy_price_declined: bool,

    // Address confirmation state; once confirmed it stays confirmed
    #[serde(default)]
    pub pickup_address_confirmed: bool,
    #[serde(default)]
    pub pickup_address_confirmation_sent: bool,
    #[serde(default)]
    pub return_address_confirmed: bool,
    #[serde(default)]
    pub return_address_confirmation_sent: bool,

    // At-most-once notification flags
    #[serde(default)]
    pub documents_received_email_sent: bool,
    #[serde(default)]
    pub own_delivery_tracking_email_sent: bool,
    #[serde(default)]
    pub office_pickup_ready_email_sent: bool,
    #[serde(default)]
    pub return_shipment_sent_email_sent: bool,

    /// Orders sharing a physical shipment. Membership is symmetric by
    /// convention; see `link_orders`.
    #[serde(default)]
    pub linked_orders: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(order_number: &str, country: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            order_number: order_number.to_string(),
            services: Vec::new(),
            quantity: 1,
            country: country.to_string(),
            pickup_service: false,
            scanned_copies: false,
            expedited: false,
            document_source: DocumentSource::Upload,
            will_send_main_docs_later: false,
            files_uploaded: false,
            return_service: None,
            has_return_label: false,
            confirm_return_address_later: false,
            pricing_breakdown: Vec::new(),
            admin_price: None,
            total_price: 0.0,
            processing_steps: Vec::new(),
            has_unconfirmed_prices: false,
            pending_embassy_price: None,
            confirmed_embassy_price: None,
            embassy_price_confirmation_sent: false,
            embassy_price_confirmed: false,
            embassy_price_declined: false,
            pickup_address_confirmed: false,
            pickup_address_confirmation_sent: false,
            return_address_confirmed: false,
            return_address_confirmation_sent: false,
            documents_received_email_sent: false,
            own_delivery_tracking_email_sent: false,
            office_pickup_ready_email_sent: false,
            return_shipment_sent_email_sent: false,
            linked_orders: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_service(&self, service: ServiceKind) -> bool {
        self.services.contains(&service)
    }

    /// Add a service, keeping the list unique and entry-ordered
    pub fn add_service(&mut self, service: ServiceKind) {
        if !self.has_service(service) {
            self.services.push(service);
            self.updated_at = Utc::now();
        }
    }

    pub fn remove_service(&mut self, service: ServiceKind) {
        self.services.retain(|s| *s != service);
        self.updated_at = Utc::now();
    }

    pub fn is_linked_to(&self, other: Uuid) -> bool {
        self.linked_orders.contains(&other)
    }
}

/// Link two orders into a combined shipment, both directions at once.
///
/// Persisting the two sides still takes two independent store writes; a
/// partial failure leaves an asymmetric link that a later read-repair
/// reconciles. The engine offers no cross-order atomicity.
pub fn link_orders(a: &mut Order, b: &mut Order) {
    if !a.is_linked_to(b.id) {
        a.linked_orders.push(b.id);
        a.updated_at = Utc::now();
    }
    if !b.is_linked_to(a.id) {
        b.linked_orders.push(a.id);
        b.updated_at = Utc::now();
    }
}
