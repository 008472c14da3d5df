use crate::models::{Order, ProcessingStep};
use crate::transition::{acknowledge_effect, Effect};
use legalis_core::{CollaboratorError, Invoicer, Notifier};
use serde_json::json;
use std::sync::Arc;

/// One effect that could not be delivered. The step change that proposed
/// it stands; the operator retries the delivery manually.
#[derive(Debug, thiserror::Error)]
#[error("effect {kind} failed: {cause}")]
pub struct EffectFailed {
    pub kind: &'static str,
    #[source]
    pub cause: CollaboratorError,
}

/// Runs accepted effects against the notifier and invoicer collaborators.
pub struct EffectDispatcher {
    notifier: Arc<dyn Notifier>,
    invoicer: Arc<dyn Invoicer>,
}

impl EffectDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>, invoicer: Arc<dyn Invoicer>) -> Self {
        Self { notifier, invoicer }
    }

    /// Execute effects in order. Each delivery that succeeds is
    /// acknowledged on the order immediately, so a later failure never
    /// forgets an earlier send. Failures are collected, not propagated;
    /// nothing is rolled back and nothing is retried here.
    pub async fn execute(
        &self,
        order: &mut Order,
        steps: &mut [ProcessingStep],
        effects: &[Effect],
    ) -> Vec<EffectFailed> {
        let mut failures = Vec::new();
        for effect in effects {
            match self.deliver(order, effect).await {
                Ok(()) => acknowledge_effect(order, steps, effect),
                Err(cause) => {
                    tracing::warn!(
                        order = %order.order_number,
                        kind = effect.kind(),
                        error = %cause,
                        "effect delivery failed; step change stands, retry manually"
                    );
                    failures.push(EffectFailed {
                        kind: effect.kind(),
                        cause,
                    });
                }
            }
        }
        failures
    }

    async fn deliver(&self, order: &Order, effect: &Effect) -> Result<(), CollaboratorError> {
        match effect {
            Effect::CreateAndSendInvoice => {
                let invoice_id = self.invoicer.create_invoice(order.id).await?;
                self.invoicer.send_invoice(&invoice_id).await
            }
            other => {
                self.notifier
                    .send(other.kind(), order.id, payload(order, other))
                    .await
            }
        }
    }
}

fn payload(order: &Order, effect: &Effect) -> serde_json::Value {
    let mut payload = json!({ "order_number": order.order_number });
    match effect {
        Effect::PickupInitialNotification { step_id, date }
        | Effect::PickupUpdateNotification { step_id, date } => {
            payload["step"] = json!(step_id.as_str());
            payload["expected_completion_date"] = json!(date);
        }
        Effect::AddressConfirmationRequest { confirmation } => {
            payload["confirmation"] = json!(confirmation.as_str());
        }
        Effect::EmbassyPriceConfirmationRequest { fee, projected_total } => {
            payload["fee"] = json!(fee);
            payload["projected_total"] = json!(projected_total);
            if let Some(country) = legalis_catalog::resolve_country(&order.country) {
                payload["country"] = json!(country.name);
            }
        }
        _ => {}
    }
    payload
}
