//! The plan aggregate: everything a projection run reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::lenient;
use crate::domain::{Brand, Category, SeasonalityTable};

/// Fixed monthly organisation cost, outside any brand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overhead {
    #[serde(deserialize_with = "lenient::number")]
    pub salary: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub tech: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub admin: f64,
}

impl Overhead {
    pub fn monthly_total(&self) -> f64 {
        self.salary + self.tech + self.admin
    }
}

impl Default for Overhead {
    fn default() -> Self {
        Self {
            salary: 47_000.0,
            tech: 4_855.0,
            admin: 12_800.0,
        }
    }
}

/// An immutable snapshot of the operating plan.
///
/// Edits go through the `with_*` methods, which consume the snapshot and return
/// the next revision. Projections never mutate a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    pub revision: u64,
    pub overhead: Overhead,
    pub seasonality: SeasonalityTable,
    /// Syndication and discover brands, in insertion order.
    pub brands: Vec<Brand>,
    pub last_updated: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

impl PlanConfig {
    pub fn new(overhead: Overhead, seasonality: SeasonalityTable, brands: Vec<Brand>) -> Self {
        Self {
            revision: 0,
            overhead,
            seasonality,
            brands,
            last_updated: None,
            updated_by: None,
        }
    }

    pub fn brand(&self, name: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.name == name)
    }

    pub fn brands_in(&self, category: Category) -> impl Iterator<Item = &Brand> {
        self.brands.iter().filter(move |b| b.category() == category)
    }

    /// Insert a brand, replacing any brand with the same name in the same category.
    pub fn with_brand(mut self, brand: Brand) -> Self {
        let existing = self
            .brands
            .iter()
            .position(|b| b.name == brand.name && b.category() == brand.category());
        match existing {
            Some(idx) => self.brands[idx] = brand,
            None => self.brands.push(brand),
        }
        self.bump()
    }

    pub fn with_seasonality(mut self, seasonality: SeasonalityTable) -> Self {
        self.seasonality = seasonality;
        self.bump()
    }

    pub fn with_overhead(mut self, overhead: Overhead) -> Self {
        self.overhead = overhead;
        self.bump()
    }

    fn bump(mut self) -> Self {
        self.revision += 1;
        self
    }
}
