use crate::models::ProcessingStep;

/// Reconcile an order's existing steps with a freshly generated template.
///
/// The template dictates membership and ordering; for every template step
/// an existing step with the same id wins wholesale, so progress, notes and
/// dates survive regeneration. Existing steps whose id is absent from the
/// template (service removed) are dropped. Template ids are unique, so the
/// result never contains duplicates.
pub fn merge_steps(
    existing: &[ProcessingStep],
    template: Vec<ProcessingStep>,
) -> Vec<ProcessingStep> {
    template
        .into_iter()
        .map(|fresh| {
            existing
                .iter()
                .find(|e| e.id == fresh.id)
                .cloned()
                .unwrap_or(fresh)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Order, StepStatus};
    use crate::steps::{generate_steps, StepId};
    use legalis_catalog::ServiceKind;

    #[test]
    fn test_merge_preserves_progress() {
        let mut order = Order::new("SWE000020", "CN");
        order.add_service(ServiceKind::Embassy);

        let mut existing = generate_steps(&order);
        let target = existing
            .iter_mut()
            .find(|s| s.id == StepId::QualityControl)
            .unwrap();
        target.set_status(StepStatus::Completed, "Anna", chrono::Utc::now());
        let stamped_at = target.completed_at;

        // Non-structural edit: quantity change, template regenerated
        order.quantity = 4;
        let merged = merge_steps(&existing, generate_steps(&order));

        let kept = merged.iter().find(|s| s.id == StepId::QualityControl).unwrap();
        assert_eq!(kept.status, StepStatus::Completed);
        assert_eq!(kept.completed_at, stamped_at);
        assert_eq!(kept.completed_by.as_deref(), Some("Anna"));
    }

    #[test]
    fn test_merge_drops_removed_service_steps() {
        let mut order = Order::new("SWE000021", "CN");
        order.add_service(ServiceKind::Embassy);
        order.add_service(ServiceKind::Chamber);
        let existing = generate_steps(&order);

        order.remove_service(ServiceKind::Chamber);
        let merged = merge_steps(&existing, generate_steps(&order));

        assert!(!merged.iter().any(|s| s.id.as_str().starts_with("chamber")));
        assert!(merged.iter().any(|s| s.id.as_str() == "embassy_delivery"));
    }

    #[test]
    fn test_merge_adopts_added_service_steps_as_pending() {
        let mut order = Order::new("SWE000022", "CN");
        order.add_service(ServiceKind::Embassy);
        let existing = generate_steps(&order);

        order.add_service(ServiceKind::Notarization);
        let merged = merge_steps(&existing, generate_steps(&order));

        let added = merged
            .iter()
            .find(|s| s.id.as_str() == "notarization_delivery")
            .unwrap();
        assert_eq!(added.status, StepStatus::Pending);
    }

    #[test]
    fn test_merge_has_no_duplicate_ids() {
        let mut order = Order::new("SWE000023", "CN");
        order.add_service(ServiceKind::Embassy);
        let existing = generate_steps(&order);
        let merged = merge_steps(&existing, generate_steps(&order));

        for (i, step) in merged.iter().enumerate() {
            assert!(!merged[i + 1..].iter().any(|other| other.id == step.id));
        }
    }
}
