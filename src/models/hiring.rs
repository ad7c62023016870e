//! Cumulative headcount from a monthly hiring plan.

use crate::domain::{HiringPlan, MonthlySeries, Role};

/// Headcount at `month_index`: base plus every delta up to and including that month.
///
/// Negative deltas are applied as given, so the result can drop below zero.
pub fn cumulative_headcount(base_count: f64, deltas: &MonthlySeries, month_index: usize) -> f64 {
    base_count + deltas.sum_through(month_index)
}

/// Headcount per role for one month.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Headcount {
    pub authors: f64,
    pub editors: f64,
    pub video_editors: f64,
}

impl Headcount {
    pub fn get(&self, role: Role) -> f64 {
        match role {
            Role::Author => self.authors,
            Role::Editor => self.editors,
            Role::VideoEditor => self.video_editors,
        }
    }
}

/// Apply a hiring plan to base headcounts for one month.
pub fn headcount_at(base: Headcount, plan: &HiringPlan, month_index: usize) -> Headcount {
    Headcount {
        authors: cumulative_headcount(base.authors, &plan.authors, month_index),
        editors: cumulative_headcount(base.editors, &plan.editors, month_index),
        video_editors: cumulative_headcount(base.video_editors, &plan.video_editors, month_index),
    }
}
