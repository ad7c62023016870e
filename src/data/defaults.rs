//! The default portfolio and brand creation.
//!
//! The default plan is what a fresh state (or a reset) projects: six
//! syndication brands on the standard newsroom config and eleven discover
//! brands derived from their pre-partnership baselines.

use crate::domain::{
    BaselineRecord, Brand, DiscoverConfig, HiringPlan, Month, MonthlySeries, Overhead, PlanConfig,
    RevShareSlab, SeasonalityTable, SyndicationConfig, default_slabs,
};
use crate::error::AppError;

/// `(name, revenue, cost)` at partnership start.
const SYNDICATION_BASELINES: [(&str, f64, f64); 6] = [
    ("Inquisitr", 81_282.0, 31_429.0),
    ("Cheatsheet", 49_499.0, 5_439.0),
    ("Fadeaway", 17_422.0, 12_186.0),
    ("FPD", 4_100.0, 2_022.0),
    ("Wonderwall", 0.0, 0.0),
    ("OKMagazine", 0.0, 0.0),
];

/// `(name, revenue, cost, traffic, rpm, ad network)` at partnership start.
const DISCOVER_BASELINES: [(&str, f64, f64, f64, f64, &str); 11] = [
    ("Nofilmschool", 28_038.0, 2_854.0, 850_000.0, 3.3, "tier1"),
    ("Vintage Aviation", 6_357.0, 4_045.0, 240_000.0, 2.65, "tier1"),
    ("Best Classic Bands", 3_977.0, 0.0, 180_000.0, 2.2, "tier2"),
    ("Whatnow", 14_395.0, 4_381.0, 520_000.0, 2.77, "tier1"),
    ("Edhat", 8_836.0, 3_394.0, 380_000.0, 2.33, "tier1"),
    ("Cultofmac", 0.0, 0.0, 500_000.0, 3.0, "tier1"),
    ("F4WOnline", 93_623.0, 34_617.0, 2_800_000.0, 3.35, "tier1"),
    ("Ewrestlingnews", 17_371.0, 8_684.0, 620_000.0, 2.8, "tier1"),
    ("Aviationist", 0.0, 0.0, 400_000.0, 2.5, "tier1"),
    ("Shark Tank Blog", 8_953.0, 926.0, 320_000.0, 2.8, "tier1"),
    ("Wordsmyth", 0.0, 0.0, 200_000.0, 2.0, "tier2"),
];

pub fn default_syndication_brands() -> Vec<Brand> {
    SYNDICATION_BASELINES
        .iter()
        .map(|&(name, revenue, cost)| {
            Brand::syndication(name, SyndicationConfig::standard(), HiringPlan::default())
                .with_baseline(BaselineRecord::syndication(revenue, cost))
        })
        .collect()
}

pub fn default_discover_brands() -> Vec<Brand> {
    DISCOVER_BASELINES
        .iter()
        .map(|&(name, revenue, cost, traffic, rpm, network)| {
            let baseline = BaselineRecord::discover(revenue, cost, traffic, rpm, network);
            Brand::discover(name, DiscoverConfig::from_baseline(&baseline)).with_baseline(baseline)
        })
        .collect()
}

/// The plan a fresh or reset state projects.
pub fn default_plan() -> PlanConfig {
    let mut brands = default_syndication_brands();
    brands.extend(default_discover_brands());
    PlanConfig::new(Overhead::default(), SeasonalityTable::standard(), brands)
}

fn brand_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("Brand name must not be empty."));
    }
    Ok(name.to_string())
}

/// Inputs for a new syndication brand.
///
/// Unlike `SyndicationConfig::standard`, a new brand starts without a
/// pre-partnership base, so it is allocated in auto mode until one is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SyndicationDraft {
    pub name: String,
    pub baseline_revenue: f64,
    pub baseline_cost: f64,
    pub config: SyndicationConfig,
}

impl SyndicationDraft {
    pub fn new(name: impl Into<String>) -> Self {
        let mut config = SyndicationConfig::standard();
        config.base_revenue = 0.0;
        config.base_costs = 0.0;
        Self {
            name: name.into(),
            baseline_revenue: 0.0,
            baseline_cost: 0.0,
            config,
        }
    }

    pub fn into_brand(self) -> Result<Brand, AppError> {
        let name = brand_name(&self.name)?;
        Ok(Brand::syndication(name, self.config, HiringPlan::default())
            .with_baseline(BaselineRecord::syndication(self.baseline_revenue, self.baseline_cost)))
    }
}

/// Inputs for a new discover brand.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverDraft {
    pub name: String,
    pub baseline_revenue: f64,
    pub baseline_cost: f64,
    /// Recorded on the baseline; projections use `config.base_traffic`.
    pub current_traffic: f64,
    pub config: DiscoverConfig,
}

impl DiscoverDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            baseline_revenue: 0.0,
            baseline_cost: 0.0,
            current_traffic: 500_000.0,
            config: DiscoverConfig {
                base_traffic: 500_000.0,
                base_rpm: 3.0,
                rpm_uplift: 1.0,
                transition_month: Month::FIRST,
                base_cost: 0.0,
                success_probability: 100.0,
                traffic_growth: MonthlySeries::zeros(),
                direct_costs: MonthlySeries::zeros(),
                base_revenue: 0.0,
                base_costs: 0.0,
                slabs: default_slabs(),
            },
        }
    }

    pub fn into_brand(self) -> Result<Brand, AppError> {
        let name = brand_name(&self.name)?;
        let baseline = BaselineRecord::discover(
            self.baseline_revenue,
            self.baseline_cost,
            self.current_traffic,
            self.config.base_rpm,
            "tier1",
        );
        Ok(Brand::discover(name, self.config).with_baseline(baseline))
    }
}

/// Replace a draft's schedule; an empty list keeps the default tiers.
pub fn custom_slabs(slabs: Vec<RevShareSlab>) -> Vec<RevShareSlab> {
    if slabs.is_empty() { default_slabs() } else { slabs }
}
