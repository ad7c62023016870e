//! Plan validation at the configuration boundary.
//!
//! The engine never rejects a plan: it projects whatever it is given. This pass
//! reports the inputs that would silently misallocate (an unsorted share
//! schedule) or produce nonsense (negative headcount), so callers can decide.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Brand, BrandModel, Month, PlanConfig, RevShareSlab, Role, Threshold};
use crate::models::hiring::cumulative_headcount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanIssue {
    pub severity: Severity,
    /// Brand the finding belongs to; `None` for plan-wide findings.
    pub brand: Option<String>,
    pub message: String,
}

impl PlanIssue {
    fn error(brand: &Brand, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            brand: Some(brand.name.clone()),
            message: message.into(),
        }
    }

    fn warning(brand: Option<&Brand>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            brand: brand.map(|b| b.name.clone()),
            message: message.into(),
        }
    }
}

/// Validate a whole plan. Findings are ordered plan-wide first, then by brand.
pub fn validate_plan(plan: &PlanConfig) -> Vec<PlanIssue> {
    let mut issues = Vec::new();

    for (month, factor) in plan.seasonality.iter() {
        if factor <= 0.0 {
            issues.push(PlanIssue::warning(
                None,
                format!("seasonality for {month} is {factor}; RPM revenue will be zero or negative"),
            ));
        }
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for brand in &plan.brands {
        *seen.entry(brand.name.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = seen
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name)
        .collect();
    duplicates.sort_unstable();
    for name in duplicates {
        issues.push(PlanIssue::warning(
            None,
            format!("brand name '{name}' is used more than once"),
        ));
    }

    for brand in &plan.brands {
        issues.extend(validate_brand(brand));
    }
    issues
}

/// Validate a single brand.
pub fn validate_brand(brand: &Brand) -> Vec<PlanIssue> {
    let mut issues = validate_slabs(brand, brand.slabs());

    let p = brand.success_probability();
    if !(0.0..=100.0).contains(&p) {
        issues.push(PlanIssue::warning(
            Some(brand),
            format!("success probability {p} is outside 0..=100"),
        ));
    }

    if let BrandModel::Syndication { config, hiring } = &brand.model {
        let bases = [
            (Role::Author, config.staffing.authors),
            (Role::Editor, config.staffing.editors),
            (Role::VideoEditor, config.video.video_editors),
        ];
        for (role, base) in bases {
            let first_negative = Month::ALL
                .into_iter()
                .find(|m| cumulative_headcount(base, hiring.deltas(role), m.index()) < 0.0);
            if let Some(month) = first_negative {
                issues.push(PlanIssue::warning(
                    Some(brand),
                    format!("{} headcount drops below zero in {month}", role.display_name()),
                ));
            }
        }
    }

    issues
}

fn validate_slabs(brand: &Brand, slabs: &[RevShareSlab]) -> Vec<PlanIssue> {
    let mut issues = Vec::new();

    if slabs.len() < 2 {
        issues.push(PlanIssue::error(
            brand,
            format!("revenue-share schedule needs at least 2 tiers, found {}", slabs.len()),
        ));
    }

    if let Some(last) = slabs.last() {
        if last.threshold != Threshold::Unbounded {
            issues.push(PlanIssue::error(brand, "last revenue-share tier must be unbounded"));
        }
    }

    let finite = &slabs[..slabs.len().saturating_sub(1)];
    let mut previous: Option<f64> = None;
    for (idx, slab) in finite.iter().enumerate() {
        match slab.threshold.bound() {
            None => issues.push(PlanIssue::error(
                brand,
                format!("tier {} is unbounded but is not the last tier", idx + 1),
            )),
            Some(bound) => {
                if let Some(prev) = previous {
                    if bound <= prev {
                        issues.push(PlanIssue::error(
                            brand,
                            format!(
                                "tier {} threshold {bound} is not above the previous threshold {prev}",
                                idx + 1
                            ),
                        ));
                    }
                }
                previous = Some(bound);
            }
        }
    }

    for (idx, slab) in slabs.iter().enumerate() {
        if !(0.0..=1.0).contains(&slab.share) {
            issues.push(PlanIssue::error(
                brand,
                format!("tier {} share {} is outside 0..=1", idx + 1, slab.share),
            ));
        }
    }

    issues
}

pub fn has_errors(issues: &[PlanIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}
