use crate::confirmation::{requires_confirmation, ConfirmationKind};
use crate::models::{Order, ProcessingStep, StepStatus};
use crate::pricing;
use crate::steps::{Leg, StepId};
use chrono::{DateTime, NaiveDate, Utc};
use legalis_catalog::ReturnService;
use serde::{Deserialize, Serialize};

/// Who is making the change and when
#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub actor: String,
    pub now: DateTime<Utc>,
}

impl TransitionContext {
    pub fn new(actor: &str) -> Self {
        Self {
            actor: actor.to_string(),
            now: Utc::now(),
        }
    }

    pub fn at(actor: &str, now: DateTime<Utc>) -> Self {
        Self {
            actor: actor.to_string(),
            now,
        }
    }
}

/// Date-field edit travelling alongside (or instead of) a status change.
/// When a patch is present the change came from a date field, not the plain
/// status selector, and the date gate does not apply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StepPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<NaiveDate>,
}

impl StepPatch {
    pub fn submitted(date: NaiveDate) -> Self {
        Self {
            submitted_at: Some(date),
            ..Self::default()
        }
    }

    pub fn expected(date: NaiveDate) -> Self {
        Self {
            expected_completion_date: Some(date),
            ..Self::default()
        }
    }
}

/// A side action the engine proposes but never executes itself. Execution
/// is the dispatcher's job; see `dispatch::EffectDispatcher`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    /// Tell the customer their documents arrived. Fired only after the
    /// operator explicitly confirms. A gate, not a hard block.
    DocumentsReceivedNotification,
    CreateAndSendInvoice,
    /// Customer handles transport themselves; send them the tracking data
    OwnDeliveryTrackingNotification,
    OfficePickupReadyNotification,
    ReturnShipmentSentNotification,
    PickupInitialNotification { step_id: StepId, date: NaiveDate },
    PickupUpdateNotification { step_id: StepId, date: NaiveDate },
    AddressConfirmationRequest { confirmation: ConfirmationKind },
    EmbassyPriceConfirmationRequest { fee: f64, projected_total: f64 },
}

impl Effect {
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::DocumentsReceivedNotification => "documents_received",
            Effect::CreateAndSendInvoice => "create_and_send_invoice",
            Effect::OwnDeliveryTrackingNotification => "own_delivery_tracking",
            Effect::OfficePickupReadyNotification => "office_pickup_ready",
            Effect::ReturnShipmentSentNotification => "return_shipment_sent",
            Effect::PickupInitialNotification { .. } => "pickup_schedule_initial",
            Effect::PickupUpdateNotification { .. } => "pickup_schedule_update",
            Effect::AddressConfirmationRequest { .. } => "address_confirmation_request",
            Effect::EmbassyPriceConfirmationRequest { .. } => "embassy_price_confirmation_request",
        }
    }
}

/// A step update the confirmation gate held back. Re-submitting it through
/// `apply_pending` bypasses the gate exactly once: the value is consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStepUpdate {
    pub step_id: StepId,
    pub new_status: StepStatus,
    pub notes: Option<String>,
    pub patch: Option<StepPatch>,
}

/// Steps after an applied update, plus the effects the caller should run
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub steps: Vec<ProcessingStep>,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone)]
pub enum TransitionResult {
    Applied(TransitionOutcome),
    /// The step needs a customer confirmation first. The caller decides:
    /// send a confirmation request, proceed anyway via `apply_pending`, or
    /// drop the update.
    ConfirmationRequired {
        confirmation: ConfirmationKind,
        pending: PendingStepUpdate,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Invalid transition: no step {0} on this order")]
    InvalidTransition(String),

    #[error("Step {step} needs {required} before leaving pending")]
    MissingRequiredDate {
        step: String,
        required: &'static str,
    },
}

/// Validate and apply one status change, returning the updated step list
/// and the side effects it calls for. Pure: the inputs are untouched, and
/// a rejection leaves nothing to persist.
pub fn transition(
    order: &Order,
    steps: &[ProcessingStep],
    step_id: StepId,
    new_status: StepStatus,
    notes: Option<&str>,
    patch: Option<StepPatch>,
    ctx: &TransitionContext,
) -> Result<TransitionResult, TransitionError> {
    let idx = steps
        .iter()
        .position(|s| s.id == step_id)
        .ok_or_else(|| TransitionError::InvalidTransition(step_id.to_string()))?;

    if patch.is_none() {
        enforce_date_gate(&steps[idx], new_status)?;
    }

    if new_status == StepStatus::Completed && !steps[idx].is_completed() {
        if let Some(confirmation) = requires_confirmation(order, steps, step_id) {
            tracing::debug!(
                order = %order.order_number,
                step = %step_id,
                confirmation = confirmation.as_str(),
                "transition held for customer confirmation"
            );
            return Ok(TransitionResult::ConfirmationRequired {
                confirmation,
                pending: PendingStepUpdate {
                    step_id,
                    new_status,
                    notes: notes.map(str::to_string),
                    patch,
                },
            });
        }
    }

    Ok(TransitionResult::Applied(apply_update(
        order, steps, idx, new_status, notes, patch, ctx,
    )))
}

/// Apply an update previously held by the confirmation gate, bypassing the
/// gate for this one update. The date gate still applies.
pub fn apply_pending(
    order: &Order,
    steps: &[ProcessingStep],
    pending: PendingStepUpdate,
    ctx: &TransitionContext,
) -> Result<TransitionOutcome, TransitionError> {
    let idx = steps
        .iter()
        .position(|s| s.id == pending.step_id)
        .ok_or_else(|| TransitionError::InvalidTransition(pending.step_id.to_string()))?;

    if pending.patch.is_none() {
        enforce_date_gate(&steps[idx], pending.new_status)?;
    }

    tracing::info!(
        order = %order.order_number,
        step = %pending.step_id,
        "confirmation gate overridden by operator"
    );

    Ok(apply_update(
        order,
        steps,
        idx,
        pending.new_status,
        pending.notes.as_deref(),
        pending.patch,
        ctx,
    ))
}

/// Authority steps must carry their dates before leaving `pending` through
/// the plain status selector.
fn enforce_date_gate(step: &ProcessingStep, new_status: StepStatus) -> Result<(), TransitionError> {
    if step.status != StepStatus::Pending || new_status == StepStatus::Pending {
        return Ok(());
    }
    let Some((_, leg)) = step.id.authority_leg() else {
        return Ok(());
    };
    let missing = match leg {
        Some(Leg::Delivery) => step.submitted_at.is_none().then_some("a submitted date"),
        Some(Leg::Pickup) => step
            .expected_completion_date
            .is_none()
            .then_some("an expected completion date"),
        // Legacy single-leg steps accept either date
        None => (step.submitted_at.is_none() && step.expected_completion_date.is_none())
            .then_some("a submitted or expected completion date"),
    };
    match missing {
        Some(required) => Err(TransitionError::MissingRequiredDate {
            step: step.id.to_string(),
            required,
        }),
        None => Ok(()),
    }
}

fn apply_update(
    order: &Order,
    steps: &[ProcessingStep],
    idx: usize,
    new_status: StepStatus,
    notes: Option<&str>,
    patch: Option<StepPatch>,
    ctx: &TransitionContext,
) -> TransitionOutcome {
    let mut updated: Vec<ProcessingStep> = steps.to_vec();
    let previous_status = updated[idx].status;

    {
        let step = &mut updated[idx];
        if let Some(patch) = &patch {
            if let Some(date) = patch.submitted_at {
                step.submitted_at = Some(date);
            }
            if let Some(date) = patch.expected_completion_date {
                step.expected_completion_date = Some(date);
            }
        }
        if let Some(text) = notes {
            step.notes = Some(text.to_string());
        }
        step.set_status(new_status, &ctx.actor, ctx.now);
    }

    let effects = propose_effects(order, &updated[idx], previous_status);

    tracing::debug!(
        order = %order.order_number,
        step = %updated[idx].id,
        from = ?previous_status,
        to = ?new_status,
        effects = effects.len(),
        "processing step transition applied"
    );

    TransitionOutcome { steps: updated, effects }
}

fn propose_effects(
    order: &Order,
    step: &ProcessingStep,
    previous_status: StepStatus,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    let newly_completed =
        step.status == StepStatus::Completed && previous_status != StepStatus::Completed;

    if newly_completed && step.id.is_document_intake() && !order.documents_received_email_sent {
        effects.push(Effect::DocumentsReceivedNotification);
    }

    if newly_completed && step.id == StepId::Invoicing {
        effects.push(Effect::CreateAndSendInvoice);
    }

    if newly_completed && step.id == StepId::ReturnShipping {
        if let Some(effect) = return_notification(order) {
            effects.push(effect);
        }
    }

    // Pickup-leg scheduling notifications: initial when the customer has
    // never been told a date, update when the told date changed.
    if step.status == StepStatus::InProgress {
        if let Some((_, Some(Leg::Pickup))) = step.id.authority_leg() {
            if let Some(date) = step.expected_completion_date {
                match step.notified_expected_completion_date {
                    None => effects.push(Effect::PickupInitialNotification { step_id: step.id, date }),
                    Some(told) if told != date => {
                        effects.push(Effect::PickupUpdateNotification { step_id: step.id, date })
                    }
                    Some(_) => {}
                }
            }
        }
    }

    effects
}

/// Exactly one completion notification per order, selected by return
/// method and suppressed once its flag says it already went out.
fn return_notification(order: &Order) -> Option<Effect> {
    match order.return_service {
        Some(ReturnService::OwnDelivery) => (!order.own_delivery_tracking_email_sent)
            .then_some(Effect::OwnDeliveryTrackingNotification),
        Some(ReturnService::OfficePickup) => (!order.office_pickup_ready_email_sent)
            .then_some(Effect::OfficePickupReadyNotification),
        _ => (!order.return_shipment_sent_email_sent)
            .then_some(Effect::ReturnShipmentSentNotification),
    }
}

/// Build the confirmation-request effect for a gate the operator chose to
/// resolve by asking the customer.
pub fn confirmation_request(order: &Order, confirmation: ConfirmationKind) -> Effect {
    match confirmation {
        ConfirmationKind::EmbassyPrice => {
            let fee = order
                .pending_embassy_price
                .or(order.confirmed_embassy_price)
                .unwrap_or(0.0);
            embassy_price_confirmation_request(order, fee)
        }
        other => Effect::AddressConfirmationRequest { confirmation: other },
    }
}

/// Confirmation request carrying the entered embassy fee and the total the
/// order lands on if the customer accepts it.
pub fn embassy_price_confirmation_request(order: &Order, fee: f64) -> Effect {
    let projected_total =
        pricing::round_to_cents(pricing::total_excluding_tbc(&order.pricing_breakdown) + fee);
    Effect::EmbassyPriceConfirmationRequest { fee, projected_total }
}

/// Record that an accepted effect was actually delivered. This is the only
/// path that flips "already sent" flags or advances
/// `notified_expected_completion_date`; never set speculatively.
pub fn acknowledge_effect(order: &mut Order, steps: &mut [ProcessingStep], effect: &Effect) {
    match effect {
        Effect::DocumentsReceivedNotification => order.documents_received_email_sent = true,
        Effect::OwnDeliveryTrackingNotification => order.own_delivery_tracking_email_sent = true,
        Effect::OfficePickupReadyNotification => order.office_pickup_ready_email_sent = true,
        Effect::ReturnShipmentSentNotification => order.return_shipment_sent_email_sent = true,
        Effect::PickupInitialNotification { step_id, date }
        | Effect::PickupUpdateNotification { step_id, date } => {
            if let Some(step) = steps.iter_mut().find(|s| s.id == *step_id) {
                step.notified_expected_completion_date = Some(*date);
            }
        }
        Effect::AddressConfirmationRequest { confirmation } => match confirmation {
            ConfirmationKind::PickupAddress => order.pickup_address_confirmation_sent = true,
            ConfirmationKind::ReturnAddress => order.return_address_confirmation_sent = true,
            ConfirmationKind::EmbassyPrice => order.embassy_price_confirmation_sent = true,
        },
        Effect::EmbassyPriceConfirmationRequest { fee, .. } => {
            order.embassy_price_confirmation_sent = true;
            order.pending_embassy_price = Some(*fee);
        }
        Effect::CreateAndSendInvoice => {}
    }
    order.updated_at = Utc::now();
}
