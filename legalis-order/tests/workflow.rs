use chrono::NaiveDate;
use legalis_catalog::{ReturnService, ServiceKind};
use legalis_core::{
    CarrierBooking, MockCarrierBooking, MockInvoicer, MockNotifier, MockOrderStore, OrderStore,
};
use legalis_order::confirmation::ConfirmationKind;
use legalis_order::transition::{
    apply_pending, confirmation_request, StepPatch, TransitionContext,
};
use legalis_order::{
    generate_steps, merge_steps, pricing, regenerate_steps, transition, Effect, EffectDispatcher,
    Order, PriceLine, StepId, StepStatus, TransitionResult,
};
use std::sync::Arc;

fn ctx() -> TransitionContext {
    TransitionContext::new("Maria")
}

fn applied(result: TransitionResult) -> legalis_order::TransitionOutcome {
    match result {
        TransitionResult::Applied(outcome) => outcome,
        other => panic!("expected applied transition, got {other:?}"),
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Full pass over an embassy order: generate the checklist, work the
/// embassy legs with the date gate, finish return shipping and invoicing
/// with effects delivered through the dispatcher.
#[tokio::test]
async fn test_embassy_order_end_to_end() {
    let notifier = Arc::new(MockNotifier::new());
    let invoicer = Arc::new(MockInvoicer::new());
    let dispatcher = EffectDispatcher::new(notifier.clone(), invoicer.clone());

    let mut order = Order::new("SWE000100", "AE");
    order.add_service(ServiceKind::Embassy);
    order.document_source = legalis_order::models::DocumentSource::Original;
    order.return_service = Some(ReturnService::DhlReturn);
    order.return_address_confirmed = true;

    let mut steps = generate_steps(&order);
    assert_eq!(steps[0].id, StepId::OrderVerification);

    // Documents arrive; customer is told
    let outcome = applied(
        transition(&order, &steps, StepId::DocumentReceipt, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    steps = outcome.steps;
    let failures = dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;
    assert!(failures.is_empty());
    assert!(order.documents_received_email_sent);

    // Embassy delivery needs its submitted date first
    let embassy_delivery: StepId = "embassy_delivery".parse().unwrap();
    let gate = transition(&order, &steps, embassy_delivery, StepStatus::InProgress, None, None, &ctx());
    assert!(gate.is_err());

    let outcome = applied(
        transition(
            &order,
            &steps,
            embassy_delivery,
            StepStatus::InProgress,
            None,
            Some(StepPatch::submitted(date("2026-04-01"))),
            &ctx(),
        )
        .unwrap(),
    );
    steps = outcome.steps;

    // Pickup leg gets a date; customer is notified once
    let embassy_pickup: StepId = "embassy_pickup".parse().unwrap();
    let outcome = applied(
        transition(
            &order,
            &steps,
            embassy_pickup,
            StepStatus::InProgress,
            None,
            Some(StepPatch::expected(date("2026-04-09"))),
            &ctx(),
        )
        .unwrap(),
    );
    steps = outcome.steps;
    dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;
    let pickup = steps.iter().find(|s| s.id == embassy_pickup).unwrap();
    assert_eq!(pickup.notified_expected_completion_date, Some(date("2026-04-09")));

    // Return goes out; invoicing wraps up
    let outcome = applied(
        transition(&order, &steps, StepId::ReturnShipping, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    steps = outcome.steps;
    dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;
    assert!(order.return_shipment_sent_email_sent);

    let outcome = applied(
        transition(&order, &steps, StepId::Invoicing, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    steps = outcome.steps;
    dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;
    assert_eq!(invoicer.sent_invoices(), vec!["INV-00001"]);

    assert_eq!(
        notifier.sent_kinds(),
        vec![
            "documents_received",
            "pickup_schedule_initial",
            "return_shipment_sent",
        ]
    );
}

/// The confirmation gate holds completion, the operator asks the customer,
/// the confirmation lands, and the held update goes through.
#[tokio::test]
async fn test_pickup_address_confirmation_round_trip() {
    let notifier = Arc::new(MockNotifier::new());
    let dispatcher = EffectDispatcher::new(notifier.clone(), Arc::new(MockInvoicer::new()));

    let mut order = Order::new("SWE000101", "CN");
    order.add_service(ServiceKind::Apostille);
    order.pickup_service = true;
    let mut steps = generate_steps(&order);

    let result = transition(
        &order,
        &steps,
        StepId::OrderVerification,
        StepStatus::Completed,
        None,
        None,
        &ctx(),
    )
    .unwrap();
    let TransitionResult::ConfirmationRequired { confirmation, pending } = result else {
        panic!("expected the confirmation gate to hold the update");
    };
    assert_eq!(confirmation, ConfirmationKind::PickupAddress);

    // Operator sends the request rather than overriding
    let request = confirmation_request(&order, confirmation);
    dispatcher.execute(&mut order, &mut steps, &[request]).await;
    assert!(order.pickup_address_confirmation_sent);

    // Customer confirms through the external surface; the gate clears
    order.pickup_address_confirmed = true;
    let outcome = applied(
        transition(&order, &steps, StepId::OrderVerification, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    assert!(outcome.steps[0].is_completed());

    // The earlier held update can also be applied directly
    let outcome = apply_pending(&order, &steps, pending, &ctx()).unwrap();
    assert!(outcome.steps[0].is_completed());
}

/// Service edits regenerate the checklist without losing progress.
#[test]
fn test_service_edit_keeps_progress() {
    let mut order = Order::new("SWE000102", "BR");
    order.add_service(ServiceKind::Notarization);
    order.add_service(ServiceKind::Apostille);
    order.processing_steps = generate_steps(&order);

    let qc = order
        .processing_steps
        .iter()
        .position(|s| s.id == StepId::QualityControl)
        .unwrap();
    let outcome = applied(
        transition(
            &order,
            &order.processing_steps,
            order.processing_steps[qc].id,
            StepStatus::Completed,
            Some("all pages verified"),
            None,
            &ctx(),
        )
        .unwrap(),
    );
    order.processing_steps = outcome.steps;

    order.add_service(ServiceKind::Embassy);
    let merged = regenerate_steps(&order);

    let kept = merged.iter().find(|s| s.id == StepId::QualityControl).unwrap();
    assert!(kept.is_completed());
    assert_eq!(kept.notes.as_deref(), Some("all pages verified"));
    assert!(merged.iter().any(|s| s.id.as_str() == "embassy_delivery"));

    // Removing a service drops its steps on the next merge
    order.processing_steps = merged;
    order.remove_service(ServiceKind::Embassy);
    let merged = merge_steps(&order.processing_steps, generate_steps(&order));
    assert!(!merged.iter().any(|s| s.id.as_str().starts_with("embassy")));
}

/// Embassy price confirmation: request carries the projected total, the
/// acknowledged fee becomes pending, and confirmation clears the gate.
#[tokio::test]
async fn test_embassy_price_confirmation_flow() {
    let notifier = Arc::new(MockNotifier::new());
    let dispatcher = EffectDispatcher::new(notifier.clone(), Arc::new(MockInvoicer::new()));

    let mut order = Order::new("SWE000103", "IR");
    order.add_service(ServiceKind::Embassy);
    order.has_unconfirmed_prices = true;
    order.pricing_breakdown = vec![
        PriceLine::with_total("Embassy legalization service", 2400.0),
        PriceLine {
            description: "Embassy official fee".to_string(),
            is_tbc: true,
            ..PriceLine::default()
        },
    ];
    let mut steps = generate_steps(&order);
    assert!(steps.iter().any(|s| s.id == StepId::EmbassyPriceConfirmation));

    let result = transition(
        &order,
        &steps,
        StepId::EmbassyPriceConfirmation,
        StepStatus::Completed,
        None,
        None,
        &ctx(),
    )
    .unwrap();
    let TransitionResult::ConfirmationRequired { confirmation, .. } = result else {
        panic!("price not confirmed yet, gate must hold");
    };
    assert_eq!(confirmation, ConfirmationKind::EmbassyPrice);

    let request = legalis_order::transition::embassy_price_confirmation_request(&order, 1100.0);
    assert_eq!(
        request,
        Effect::EmbassyPriceConfirmationRequest { fee: 1100.0, projected_total: 3500.0 }
    );
    dispatcher.execute(&mut order, &mut steps, &[request]).await;
    assert!(order.embassy_price_confirmation_sent);
    assert_eq!(order.pending_embassy_price, Some(1100.0));

    // Customer accepts; the step completes without further gating
    order.embassy_price_confirmed = true;
    order.confirmed_embassy_price = order.pending_embassy_price.take();
    let outcome = applied(
        transition(
            &order,
            &steps,
            StepId::EmbassyPriceConfirmation,
            StepStatus::Completed,
            None,
            None,
            &ctx(),
        )
        .unwrap(),
    );
    let step = outcome
        .steps
        .iter()
        .find(|s| s.id == StepId::EmbassyPriceConfirmation)
        .unwrap();
    assert!(step.is_completed());
}

/// Admin pricing save persisted through the store collaborator.
#[tokio::test]
async fn test_admin_price_save_round_trip() {
    let store = MockOrderStore::new();

    let mut order = Order::new("SWE000104", "CN");
    order.pricing_breakdown = vec![
        PriceLine::with_total("Chamber of Commerce legalization", 1000.0),
        PriceLine::with_total("Courier", 500.0),
    ];

    let mut overrides = pricing::seed_line_overrides(&order.pricing_breakdown);
    overrides[1].override_amount = Some(400.0);
    let record = pricing::compose_override(
        &order.pricing_breakdown,
        overrides,
        0.0,
        10.0,
        vec![],
        "Maria",
        chrono::Utc::now(),
    );
    assert_eq!(record.computed_total, 1260.0); // 1400 - 140

    order.admin_price = Some(record);
    order.total_price = pricing::effective_total(&order);

    store.insert(order.id, serde_json::to_value(&order).unwrap());
    store
        .patch(
            order.id,
            serde_json::json!({
                "admin_price": order.admin_price,
                "total_price": order.total_price,
            }),
        )
        .await
        .unwrap();

    let loaded = store.load(order.id).await.unwrap().unwrap();
    assert_eq!(loaded["total_price"], 1260.0);
    assert_eq!(loaded["admin_price"]["computed_total"], 1260.0);
}

/// Carrier-booked returns: the operator books with the carrier first and
/// completes the step afterwards; the engine only sees the status change.
#[tokio::test]
async fn test_carrier_booked_return() {
    let carrier = MockCarrierBooking::new("postnord");
    let notifier = Arc::new(MockNotifier::new());
    let dispatcher = EffectDispatcher::new(notifier.clone(), Arc::new(MockInvoicer::new()));

    let mut order = Order::new("SWE000106", "VN");
    order.add_service(ServiceKind::Notarization);
    order.return_service = Some(ReturnService::PostnordRek);
    order.return_address_confirmed = true;
    let steps = generate_steps(&order);

    let booking = carrier.book_return(order.id).await.unwrap();
    assert!(booking.tracking_number.starts_with("TRK-"));

    let outcome = applied(
        transition(&order, &steps, StepId::ReturnShipping, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    let mut steps = outcome.steps;
    dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;
    assert_eq!(notifier.sent_kinds(), vec!["return_shipment_sent"]);
}

/// A failed notification reports the failure but never reverses the step.
#[tokio::test]
async fn test_notification_failure_keeps_step_completed() {
    let notifier = Arc::new(MockNotifier::failing_on("office_pickup_ready"));
    let dispatcher = EffectDispatcher::new(notifier, Arc::new(MockInvoicer::new()));

    let mut order = Order::new("SWE000105", "AE");
    order.add_service(ServiceKind::Apostille);
    order.return_service = Some(ReturnService::OfficePickup);
    let steps = generate_steps(&order);

    let outcome = applied(
        transition(&order, &steps, StepId::ReturnShipping, StepStatus::Completed, None, None, &ctx())
            .unwrap(),
    );
    let mut steps = outcome.steps;
    let failures = dispatcher.execute(&mut order, &mut steps, &outcome.effects).await;

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, "office_pickup_ready");
    let step = steps.iter().find(|s| s.id == StepId::ReturnShipping).unwrap();
    assert!(step.is_completed());
    // Flag untouched, so completing again after reopening proposes a retry
    assert!(!order.office_pickup_ready_email_sent);
}
