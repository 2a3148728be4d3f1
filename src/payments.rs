// Payment-export aggregation: many line items per trip collapse into one
// row of monetary sums.
use crate::types::{PaymentAggregate, RawPaymentRow};
use crate::util::parse_f64_safe;
use std::collections::HashMap;

// Only these line items carry revenue; everything else in the export
// (instant-pay transfers, balance moves, ...) is ignored.
const REVENUE_DESCRIPTIONS: [&str; 4] = [
    "completed order",
    "fare adjust",
    "business order",
    "business adjustment",
];

fn is_revenue_line(description: Option<&str>) -> bool {
    let Some(desc) = description else {
        return false;
    };
    let desc = desc.to_lowercase();
    REVENUE_DESCRIPTIONS.iter().any(|d| desc.contains(d))
}

/// Merge payment tables and sum the six monetary columns per trip UUID.
///
/// Rows without a trip UUID or with a non-revenue description are dropped.
/// A trip with no qualifying rows gets no entry at all; the join in the
/// trip rollup treats that absence as zero.
pub fn aggregate_payments(tables: &[Vec<RawPaymentRow>]) -> HashMap<String, PaymentAggregate> {
    let mut agg: HashMap<String, PaymentAggregate> = HashMap::new();
    for table in tables {
        for row in table {
            if !is_revenue_line(row.description.as_deref()) {
                continue;
            }
            let Some(uuid) = row.trip_uuid.as_deref().map(str::trim) else {
                continue;
            };
            if uuid.is_empty() {
                continue;
            }
            let e = agg.entry(uuid.to_string()).or_default();
            e.total_pay += parse_f64_safe(row.paid_to_you.as_deref()).unwrap_or(0.0);
            e.base_fare += parse_f64_safe(row.fare.as_deref()).unwrap_or(0.0);
            e.tip += parse_f64_safe(row.tip.as_deref()).unwrap_or(0.0);
            e.incentive += parse_f64_safe(row.incentive.as_deref()).unwrap_or(0.0);
            e.quest += parse_f64_safe(row.quest.as_deref()).unwrap_or(0.0);
            e.order_refund += parse_f64_safe(row.order_value_refund.as_deref()).unwrap_or(0.0);
        }
    }
    agg
}
