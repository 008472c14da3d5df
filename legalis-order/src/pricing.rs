use crate::models::{Adjustment, LineOverride, Order, PriceLine, PricingOverride};
use chrono::{DateTime, Utc};

/// Round a SEK amount to whole öre
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Resolve the charged amount of one breakdown line. Orders from different
/// eras of the shop stored it under different fields, checked in fixed
/// preference order; a line carrying none of them contributes nothing.
pub fn line_base_amount(line: &PriceLine) -> f64 {
    if let Some(total) = line.total {
        return total;
    }
    if let Some(fee) = line.fee {
        return fee;
    }
    if let Some(base) = line.base_price {
        return base;
    }
    if let (Some(unit), Some(qty)) = (line.unit_price, line.quantity) {
        return unit * qty as f64;
    }
    if line.official_fee.is_some() || line.service_fee.is_some() {
        return line.official_fee.unwrap_or(0.0) + line.service_fee.unwrap_or(0.0);
    }
    0.0
}

/// Sum of all lines whose amount is settled. TBC lines (embassy fees not
/// yet confirmed) are left out; the confirmation flow adds them on top.
pub fn total_excluding_tbc(lines: &[PriceLine]) -> f64 {
    lines
        .iter()
        .filter(|line| !line.is_tbc)
        .map(line_base_amount)
        .sum()
}

/// Result of one pricing run, kept alongside the total so the admin screen
/// can show how the figure came about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedPrice {
    /// Included lines summed, before adjustments and discount
    pub base: f64,
    pub adjustment_sum: f64,
    pub discount: f64,
    pub total: f64,
}

/// Compute the order total from the immutable breakdown and the admin's
/// override settings. Pure; call it as often as you like.
///
/// Per line: an override with `include == false` drops the line, an
/// `override_amount` replaces its base amount, otherwise the base amount
/// stands. Discount (flat amount plus percent) is taken against the
/// pre-adjustment base, so adjustments and discount modify the same figure
/// independently rather than compounding. VAT rates ride along for invoice
/// export only. The result is clamped to zero and rounded to whole öre.
pub fn compute_total(
    breakdown: &[PriceLine],
    line_overrides: &[LineOverride],
    discount_amount: f64,
    discount_percent: f64,
    adjustments: &[Adjustment],
) -> ComputedPrice {
    let base: f64 = breakdown
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            match line_overrides.iter().find(|o| o.index == index) {
                Some(o) if !o.include => None,
                Some(o) => Some(o.override_amount.unwrap_or(o.base_amount)),
                None => Some(line_base_amount(line)),
            }
        })
        .sum();

    let adjustment_sum: f64 = adjustments.iter().map(|a| a.amount).sum();
    let discount = base * discount_percent / 100.0 + discount_amount;
    let total = round_to_cents((base + adjustment_sum - discount).max(0.0));

    ComputedPrice {
        base,
        adjustment_sum,
        discount,
        total,
    }
}

/// Build the override record an admin save replaces wholesale. Partial
/// merges of an earlier record are deliberately not supported.
pub fn compose_override(
    breakdown: &[PriceLine],
    line_overrides: Vec<LineOverride>,
    discount_amount: f64,
    discount_percent: f64,
    adjustments: Vec<Adjustment>,
    updated_by: &str,
    now: DateTime<Utc>,
) -> PricingOverride {
    let computed = compute_total(
        breakdown,
        &line_overrides,
        discount_amount,
        discount_percent,
        &adjustments,
    );
    PricingOverride {
        discount_amount,
        discount_percent,
        adjustments,
        line_overrides,
        breakdown_base: computed.base,
        computed_total: computed.total,
        updated_at: now,
        updated_by: updated_by.to_string(),
    }
}

/// Seed editable override rows from the breakdown, one per line, all
/// included and un-overridden. What the admin pricing screen opens with.
pub fn seed_line_overrides(breakdown: &[PriceLine]) -> Vec<LineOverride> {
    breakdown
        .iter()
        .enumerate()
        .map(|(index, line)| LineOverride {
            index,
            label: line.description.clone(),
            base_amount: line_base_amount(line),
            override_amount: None,
            vat_percent: line.vat_rate,
            include: true,
        })
        .collect()
}

/// The total currently in force for an order: the admin override when one
/// exists, otherwise the breakdown summed as-is.
pub fn effective_total(order: &Order) -> f64 {
    match &order.admin_price {
        Some(admin) => admin.computed_total,
        None => round_to_cents(total_excluding_tbc(&order.pricing_breakdown).max(0.0)),
    }
}
