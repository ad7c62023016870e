//! Calendar and schedule primitives shared by every projection.
//!
//! - `Month` / `MonthlySeries`: the fixed 10-month plan horizon
//! - `SeasonalityTable`: per-month RPM multipliers
//! - `Threshold` / `RevShareSlab`: the tiered revenue-share schedule

use std::ops::{Add, AddAssign, Index, IndexMut, Sub};

use clap::ValueEnum;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::lenient;

/// Number of months in the plan horizon.
pub const MONTH_COUNT: usize = 10;

/// Working days per month used to turn daily output into monthly output.
pub const WORKING_DAYS: f64 = 22.0;

/// A month of the operating plan (March through December).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Month {
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; MONTH_COUNT] = [
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub const FIRST: Month = Month::Mar;

    /// Position in the plan horizon (0-based).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Case-insensitive lookup by three-letter label.
    pub fn from_label(label: &str) -> Option<Month> {
        let label = label.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One value per plan month.
///
/// Persisted arrays of the wrong length are normalized on read: short or
/// missing arrays are zero-padded, extra entries are dropped, and non-numeric
/// entries read as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries([f64; MONTH_COUNT]);

impl MonthlySeries {
    pub fn zeros() -> Self {
        Self([0.0; MONTH_COUNT])
    }

    pub fn filled(value: f64) -> Self {
        Self([value; MONTH_COUNT])
    }

    pub fn from_fn(f: impl FnMut(usize) -> f64) -> Self {
        Self(std::array::from_fn(f))
    }

    /// Build from a slice, zero-padding or truncating to the horizon length.
    pub fn from_slice(values: &[f64]) -> Self {
        Self::from_fn(|i| values.get(i).copied().map(lenient::finite_or_zero).unwrap_or(0.0))
    }

    pub fn as_array(&self) -> &[f64; MONTH_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Sum over the whole horizon.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Sum of entries `0..=index` (clamped to the horizon).
    pub fn sum_through(&self, index: usize) -> f64 {
        let end = index.min(MONTH_COUNT - 1);
        self.0[..=end].iter().sum()
    }
}

impl From<[f64; MONTH_COUNT]> for MonthlySeries {
    fn from(values: [f64; MONTH_COUNT]) -> Self {
        Self(values)
    }
}

impl Index<usize> for MonthlySeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for MonthlySeries {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl Index<Month> for MonthlySeries {
    type Output = f64;

    fn index(&self, month: Month) -> &f64 {
        &self.0[month.index()]
    }
}

impl Add for MonthlySeries {
    type Output = MonthlySeries;

    fn add(self, rhs: MonthlySeries) -> MonthlySeries {
        MonthlySeries::from_fn(|i| self.0[i] + rhs.0[i])
    }
}

impl Sub for MonthlySeries {
    type Output = MonthlySeries;

    fn sub(self, rhs: MonthlySeries) -> MonthlySeries {
        MonthlySeries::from_fn(|i| self.0[i] - rhs.0[i])
    }
}

impl AddAssign for MonthlySeries {
    fn add_assign(&mut self, rhs: MonthlySeries) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<'de> Deserialize<'de> for MonthlySeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let series = match value {
            Value::Array(items) => {
                MonthlySeries::from_fn(|i| items.get(i).map(lenient::coerce).unwrap_or(0.0))
            }
            _ => MonthlySeries::zeros(),
        };
        Ok(series)
    }
}

/// Per-month RPM multipliers.
///
/// Months that are absent, zero, or non-numeric use a multiplier of `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalityTable {
    factors: [f64; MONTH_COUNT],
}

impl SeasonalityTable {
    /// A table with every month at `1.0`.
    pub fn flat() -> Self {
        Self {
            factors: [1.0; MONTH_COUNT],
        }
    }

    /// The default calendar: soft spring, strong Q4.
    pub fn standard() -> Self {
        Self {
            factors: [0.75, 0.85, 0.90, 0.88, 0.85, 0.88, 0.95, 1.05, 1.25, 1.35],
        }
    }

    pub fn factor(&self, month: Month) -> f64 {
        self.factors[month.index()]
    }

    /// Return a copy with one month's multiplier replaced.
    pub fn with_factor(mut self, month: Month, factor: f64) -> Self {
        self.factors[month.index()] = normalize_factor(factor);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        Month::ALL.into_iter().map(|m| (m, self.factors[m.index()]))
    }
}

impl Default for SeasonalityTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn normalize_factor(factor: f64) -> f64 {
    if factor.is_finite() && factor != 0.0 { factor } else { 1.0 }
}

impl Serialize for SeasonalityTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(MONTH_COUNT))?;
        for (month, factor) in self.iter() {
            map.serialize_entry(month.label(), &factor)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SeasonalityTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let mut table = SeasonalityTable::flat();
        if let Value::Object(entries) = value {
            for (label, raw) in &entries {
                if let Some(month) = Month::from_label(label) {
                    table = table.with_factor(month, lenient::coerce(raw));
                }
            }
        }
        Ok(table)
    }
}

/// Upper bound of a revenue-share tier, as a growth multiple.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Threshold {
    /// Applies while `growth_multiple <= bound`.
    UpTo(f64),
    /// Catch-all final tier.
    #[default]
    Unbounded,
}

impl Threshold {
    pub fn admits(self, growth_multiple: f64) -> bool {
        match self {
            Threshold::UpTo(bound) => bound >= growth_multiple,
            Threshold::Unbounded => true,
        }
    }

    pub fn bound(self) -> Option<f64> {
        match self {
            Threshold::UpTo(bound) => Some(bound),
            Threshold::Unbounded => None,
        }
    }
}

// The dashboard writes the last tier as `Infinity`, which JSON stores as `null`.
impl Serialize for Threshold {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Threshold::UpTo(bound) => serializer.serialize_f64(*bound),
            Threshold::Unbounded => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let raw = match &value {
            Value::Null => return Ok(Threshold::Unbounded),
            Value::Number(n) => n.as_f64().unwrap_or(f64::INFINITY),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        };
        Ok(if raw == f64::INFINITY {
            Threshold::Unbounded
        } else if raw.is_finite() {
            Threshold::UpTo(raw)
        } else {
            Threshold::UpTo(0.0)
        })
    }
}

/// One tier of the revenue-share schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevShareSlab {
    #[serde(default)]
    pub threshold: Threshold,
    /// Fraction of growth (or of the total, in auto mode) attributed to LH2.
    #[serde(rename = "lh2Share", alias = "share", default, deserialize_with = "lenient::number")]
    pub share: f64,
}

impl RevShareSlab {
    pub fn up_to(bound: f64, share: f64) -> Self {
        Self {
            threshold: Threshold::UpTo(bound),
            share,
        }
    }

    pub fn unbounded(share: f64) -> Self {
        Self {
            threshold: Threshold::Unbounded,
            share,
        }
    }
}

/// Standard schedule: ≤1.3× → 0%, ≤2× → 20%, ≤3× → 30%, above → 50%.
pub fn default_slabs() -> Vec<RevShareSlab> {
    vec![
        RevShareSlab::up_to(1.3, 0.0),
        RevShareSlab::up_to(2.0, 0.20),
        RevShareSlab::up_to(3.0, 0.30),
        RevShareSlab::unbounded(0.50),
    ]
}
