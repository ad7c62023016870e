//! Revenue-share tier resolution.

use crate::domain::RevShareSlab;

/// True when a brand has no pre-partnership baseline at all.
///
/// In this mode the top tier applies to total (not incremental) figures.
pub fn is_auto_mode(base_revenue: f64, base_cost: f64) -> bool {
    base_revenue == 0.0 && base_cost == 0.0
}

/// Ratio of current revenue to baseline revenue; `0` without a positive baseline.
pub fn growth_multiple(total_revenue: f64, base_revenue: f64) -> f64 {
    if base_revenue > 0.0 {
        total_revenue / base_revenue
    } else {
        0.0
    }
}

/// Resolve the share fraction for a growth multiple.
///
/// - auto mode: the last tier's share, whatever the growth
/// - otherwise: the first tier whose threshold is `>= growth_multiple`,
///   falling back to the last tier
///
/// Tiers are scanned in the order given; ascending thresholds are the
/// caller's responsibility (see `domain::validation`). An empty schedule
/// resolves to `0`.
pub fn resolve_share(
    growth_multiple: f64,
    slabs: &[RevShareSlab],
    base_revenue: f64,
    base_cost: f64,
) -> f64 {
    let Some(last) = slabs.last() else {
        return 0.0;
    };
    if is_auto_mode(base_revenue, base_cost) {
        return last.share;
    }
    slabs
        .iter()
        .find(|slab| slab.threshold.admits(growth_multiple))
        .unwrap_or(last)
        .share
}
