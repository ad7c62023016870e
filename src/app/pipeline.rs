//! Shared "projection pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! store load -> plan -> validation -> per-brand projection -> rollup
//!
//! The subcommands then focus on presentation (tables, CSV, issue lists).

use crate::domain::{PlanConfig, PlanIssue, Severity, validate_plan};
use crate::error::AppError;
use crate::io::{StateBlob, StateStore};
use crate::projection::{BrandProjection, project_plan};
use crate::report::{PortfolioRollup, rollup};

/// All computed outputs of a single projection run.
#[derive(Debug, Clone)]
pub struct PlanOutput {
    pub projections: Vec<BrandProjection>,
    pub rollup: PortfolioRollup,
    pub issues: Vec<PlanIssue>,
}

impl PlanOutput {
    pub fn projection(&self, name: &str) -> Option<&BrandProjection> {
        self.projections.iter().find(|p| p.name == name)
    }
}

/// Load the stored state and build the plan it describes.
pub fn load_plan(store: &dyn StateStore) -> Result<PlanConfig, AppError> {
    let plan = store.load()?.into_plan();
    tracing::info!(
        location = %store.location(),
        brands = plan.brands.len(),
        updated_by = plan.updated_by.as_deref().unwrap_or("-"),
        "plan loaded"
    );
    Ok(plan)
}

/// Persist `plan`, recording `updated_by` as the actor.
pub fn save_plan(store: &dyn StateStore, plan: &PlanConfig, updated_by: &str) -> Result<(), AppError> {
    let mut blob = StateBlob::from_plan(plan);
    blob.updated_by = Some(updated_by.to_string());
    let at = store.save(&blob)?;
    tracing::info!(location = %store.location(), at = %at.to_rfc3339(), "plan saved");
    Ok(())
}

/// Validate, project every brand, and roll the results up.
///
/// Validation findings are reported, never enforced: the engine projects the
/// plan exactly as given.
pub fn run_projection(plan: &PlanConfig) -> PlanOutput {
    let issues = validate_plan(plan);
    for issue in &issues {
        let brand = issue.brand.as_deref().unwrap_or("-");
        match issue.severity {
            Severity::Error => tracing::warn!(brand, severity = "error", "{}", issue.message),
            Severity::Warning => tracing::warn!(brand, severity = "warning", "{}", issue.message),
        }
    }

    let projections = project_plan(plan);
    let rollup = rollup(&projections, &plan.overhead);
    tracing::debug!(
        brands = projections.len(),
        total_revenue = rollup.total_revenue.total(),
        "projection complete"
    );

    PlanOutput {
        projections,
        rollup,
        issues,
    }
}
