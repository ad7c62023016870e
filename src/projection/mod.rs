//! Per-brand monthly projections.
//!
//! Responsibilities:
//!
//! - dispatch each brand to its business model (`syndication`, `discover`)
//! - project every brand of a plan (in parallel; brands are independent)
//! - expose per-metric monthly series and 10-month totals

use rayon::prelude::*;
use serde::Serialize;

use crate::domain::{Brand, BrandModel, Category, MonthlySeries, Month, PlanConfig, SeasonalityTable};
use crate::models::{Allocation, AllocationMode};

pub mod discover;
pub mod syndication;

pub use discover::*;
pub use syndication::*;

/// Model-specific driver values for one month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MonthDrivers {
    Syndication(SyndicationMonth),
    Discover(DiscoverMonth),
}

/// One brand-month of the projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyProjection {
    pub month: Month,
    pub seasonality: f64,
    pub drivers: MonthDrivers,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub allocation: Allocation,
}

/// A projected figure that can be summed across months and brands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    Cost,
    Lh2Revenue,
    Lh2Cost,
    Lh2Net,
}

impl MonthlyProjection {
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Revenue => self.total_revenue,
            Metric::Cost => self.total_cost,
            Metric::Lh2Revenue => self.allocation.lh2_revenue,
            Metric::Lh2Cost => self.allocation.lh2_cost,
            Metric::Lh2Net => self.allocation.lh2_net,
        }
    }
}

/// The full horizon for one brand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandProjection {
    pub name: String,
    pub category: Category,
    pub months: Vec<MonthlyProjection>,
}

/// 10-month totals for one brand.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BrandTotals {
    pub revenue: f64,
    pub cost: f64,
    pub lh2_revenue: f64,
    pub lh2_cost: f64,
    pub lh2_net: f64,
    /// Syndication stream totals; zero for discover brands.
    pub programmatic_revenue: f64,
    pub syndication_revenue: f64,
    pub video_revenue: f64,
}

impl BrandProjection {
    pub fn series(&self, metric: Metric) -> MonthlySeries {
        MonthlySeries::from_fn(|i| self.months.get(i).map(|m| m.metric(metric)).unwrap_or(0.0))
    }

    pub fn total(&self, metric: Metric) -> f64 {
        self.months.iter().map(|m| m.metric(metric)).sum()
    }

    pub fn totals(&self) -> BrandTotals {
        let mut totals = BrandTotals::default();
        for m in &self.months {
            totals.revenue += m.total_revenue;
            totals.cost += m.total_cost;
            totals.lh2_revenue += m.allocation.lh2_revenue;
            totals.lh2_cost += m.allocation.lh2_cost;
            totals.lh2_net += m.allocation.lh2_net;
            if let MonthDrivers::Syndication(d) = &m.drivers {
                totals.programmatic_revenue += d.programmatic_revenue;
                totals.syndication_revenue += d.syndication_revenue;
                totals.video_revenue += d.video_revenue;
            }
        }
        totals
    }

    /// True when every month was allocated without a baseline.
    pub fn is_auto_mode(&self) -> bool {
        !self.months.is_empty()
            && self
                .months
                .iter()
                .all(|m| m.allocation.mode == AllocationMode::Auto)
    }
}

/// Project one brand over the plan horizon.
pub fn project_brand(brand: &Brand, seasonality: &SeasonalityTable) -> BrandProjection {
    let months = match &brand.model {
        BrandModel::Syndication { config, hiring } => project_syndication(config, hiring, seasonality),
        BrandModel::Discover(config) => project_discover(config, seasonality),
    };
    tracing::debug!(
        brand = %brand.name,
        category = brand.category().display_name(),
        revenue = months.iter().map(|m| m.total_revenue).sum::<f64>(),
        "projected brand"
    );
    BrandProjection {
        name: brand.name.clone(),
        category: brand.category(),
        months,
    }
}

/// Project every brand of a plan, preserving plan order.
pub fn project_plan(plan: &PlanConfig) -> Vec<BrandProjection> {
    plan.brands
        .par_iter()
        .map(|brand| project_brand(brand, &plan.seasonality))
        .collect()
}
