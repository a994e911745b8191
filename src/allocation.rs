//! Per-trip budget allocation

use rust_decimal::Decimal;

/// Split the remaining budget evenly across the remaining trips.
///
/// The share is truncated to whole cents, never rounded, so the displayed
/// per-trip amounts always sum to at most the remaining budget. With no
/// trips left there is nothing to divide across and the full remaining
/// amount is returned unchanged.
pub fn per_trip(remaining_budget: Decimal, remaining_trips: u32) -> Decimal {
    if remaining_trips == 0 {
        return remaining_budget;
    }
    (remaining_budget / Decimal::from(remaining_trips)).trunc_with_scale(2)
}
