//! LH2 allocation: how much of a brand's month belongs to the partner.

use serde::Serialize;

use crate::domain::RevShareSlab;
use crate::domain::lenient::finite_or_zero;
use crate::models::slabs::{growth_multiple, is_auto_mode, resolve_share};

/// Which figures the share was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// No baseline: share of total revenue and cost.
    Auto,
    /// Share of growth above the baseline, floored at zero.
    Incremental,
}

impl AllocationMode {
    pub fn label(self) -> &'static str {
        match self {
            AllocationMode::Auto => "auto",
            AllocationMode::Incremental => "incremental",
        }
    }
}

/// Result of allocating one brand-month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    pub mode: AllocationMode,
    pub growth_multiple: f64,
    pub share: f64,
    pub lh2_revenue: f64,
    pub lh2_cost: f64,
    pub lh2_net: f64,
}

/// Allocate a month's revenue and cost between LH2 and the baseline business.
///
/// Non-finite inputs are treated as `0`. Never fails.
pub fn allocate(
    total_revenue: f64,
    total_cost: f64,
    base_revenue: f64,
    base_cost: f64,
    slabs: &[RevShareSlab],
) -> Allocation {
    let total_revenue = finite_or_zero(total_revenue);
    let total_cost = finite_or_zero(total_cost);
    let base_revenue = finite_or_zero(base_revenue);
    let base_cost = finite_or_zero(base_cost);

    let growth = growth_multiple(total_revenue, base_revenue);
    let share = resolve_share(growth, slabs, base_revenue, base_cost);

    let (mode, lh2_revenue, lh2_cost) = if is_auto_mode(base_revenue, base_cost) {
        (AllocationMode::Auto, total_revenue * share, total_cost * share)
    } else {
        (
            AllocationMode::Incremental,
            (total_revenue - base_revenue).max(0.0) * share,
            (total_cost - base_cost).max(0.0) * share,
        )
    };

    Allocation {
        mode,
        growth_multiple: growth,
        share,
        lh2_revenue,
        lh2_cost,
        lh2_net: lh2_revenue - lh2_cost,
    }
}
