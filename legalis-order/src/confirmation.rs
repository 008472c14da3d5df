use crate::models::{Order, ProcessingStep};
use crate::steps::StepId;
use serde::{Deserialize, Serialize};

/// What the customer still has to confirm before a step may complete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConfirmationKind {
    PickupAddress,
    ReturnAddress,
    EmbassyPrice,
}

impl ConfirmationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationKind::PickupAddress => "pickup-address",
            ConfirmationKind::ReturnAddress => "return-address",
            ConfirmationKind::EmbassyPrice => "embassy-price",
        }
    }
}

/// Policy check consulted before a step reaches `completed`.
///
/// Confirmation state, once true, is permanent for the order; the gate
/// never re-asserts after the customer has confirmed.
pub fn requires_confirmation(
    order: &Order,
    steps: &[ProcessingStep],
    step_id: StepId,
) -> Option<ConfirmationKind> {
    match step_id {
        StepId::OrderVerification => {
            if order.pickup_service && !order.pickup_address_confirmed {
                Some(ConfirmationKind::PickupAddress)
            } else {
                None
            }
        }
        StepId::AwaitReturnAddressConfirmation => {
            if order.return_address_confirmed {
                None
            } else {
                Some(ConfirmationKind::ReturnAddress)
            }
        }
        StepId::PrepareReturn => {
            if order.return_address_confirmed {
                return None;
            }
            // Self-managed returns have no address to confirm
            if order.return_service.map(|r| r.is_self_managed()).unwrap_or(false) {
                return None;
            }
            // A dedicated await-step already guards the address
            if steps.iter().any(|s| s.id == StepId::AwaitReturnAddressConfirmation) {
                return None;
            }
            Some(ConfirmationKind::ReturnAddress)
        }
        StepId::EmbassyPriceConfirmation => {
            if order.embassy_price_confirmed {
                None
            } else {
                Some(ConfirmationKind::EmbassyPrice)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::generate_steps;
    use legalis_catalog::{ReturnService, ServiceKind};

    #[test]
    fn test_order_verification_gated_on_pickup_address() {
        let mut order = Order::new("SWE000030", "AE");
        order.pickup_service = true;
        let steps = generate_steps(&order);

        assert_eq!(
            requires_confirmation(&order, &steps, StepId::OrderVerification),
            Some(ConfirmationKind::PickupAddress)
        );

        order.pickup_address_confirmed = true;
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::OrderVerification),
            None
        );
    }

    #[test]
    fn test_no_pickup_service_no_gate() {
        let order = Order::new("SWE000031", "AE");
        let steps = generate_steps(&order);
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::OrderVerification),
            None
        );
    }

    #[test]
    fn test_prepare_return_skips_self_managed() {
        let mut order = Order::new("SWE000032", "AE");
        order.return_service = Some(ReturnService::OfficePickup);
        let steps = generate_steps(&order);
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::PrepareReturn),
            None
        );

        order.return_service = Some(ReturnService::DhlReturn);
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::PrepareReturn),
            Some(ConfirmationKind::ReturnAddress)
        );
    }

    #[test]
    fn test_prepare_return_covered_by_await_step() {
        let mut order = Order::new("SWE000033", "AE");
        order.return_service = Some(ReturnService::DhlReturn);
        order.confirm_return_address_later = true;
        let steps = generate_steps(&order);

        // The await step carries the gate; prepare_return does not double up
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::PrepareReturn),
            None
        );
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::AwaitReturnAddressConfirmation),
            Some(ConfirmationKind::ReturnAddress)
        );
    }

    #[test]
    fn test_embassy_price_gate_clears_after_confirmation() {
        let mut order = Order::new("SWE000034", "IR");
        order.add_service(ServiceKind::Embassy);
        order.has_unconfirmed_prices = true;
        let steps = generate_steps(&order);

        assert_eq!(
            requires_confirmation(&order, &steps, StepId::EmbassyPriceConfirmation),
            Some(ConfirmationKind::EmbassyPrice)
        );

        order.embassy_price_confirmed = true;
        assert_eq!(
            requires_confirmation(&order, &steps, StepId::EmbassyPriceConfirmation),
            None
        );
    }
}
