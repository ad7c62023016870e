//! The persisted plan state, in the dashboard server's JSON layout.
//!
//! Brand sections are JSON objects keyed by brand name. Object order is the
//! brand order, so these maps keep insertion order. A `null` section means
//! "use the default portfolio's section".

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::data::default_plan;
use crate::domain::lenient;
use crate::domain::{
    BaselineRecord, Brand, BrandModel, DiscoverConfig, HiringPlan, Overhead, PlanConfig,
    SeasonalityTable, SyndicationConfig,
};
use crate::error::AppError;

/// A string-keyed map that keeps insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMap<T>(Vec<(String, T)>);

impl<T> Default for NamedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> NamedMap<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Insert or replace; a replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(String, T)> for NamedMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut map = NamedMap::default();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<T: Serialize> Serialize for NamedMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct NamedMapVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for NamedMapVisitor<T>
where
    T: DeserializeOwned + Default,
{
    type Value = NamedMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by brand name")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = NamedMap::default();
        // A `null` or malformed entry reads as the zero-valued record.
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            out.insert(name, T::deserialize(value).unwrap_or_default());
        }
        Ok(out)
    }
}

impl<'de, T> Deserialize<'de> for NamedMap<T>
where
    T: DeserializeOwned + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NamedMapVisitor(PhantomData))
    }
}

/// Pre-partnership figures per category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineData {
    #[serde(deserialize_with = "lenient::or_default")]
    pub syndication: NamedMap<BaselineRecord>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub discover: NamedMap<BaselineRecord>,
}

/// The full persisted state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateBlob {
    #[serde(deserialize_with = "lenient::optional")]
    pub overhead: Option<Overhead>,
    #[serde(deserialize_with = "lenient::optional")]
    pub rpm_seasonality: Option<SeasonalityTable>,
    #[serde(deserialize_with = "lenient::optional")]
    pub baseline_data: Option<BaselineData>,
    #[serde(deserialize_with = "lenient::optional")]
    pub synd_configs: Option<NamedMap<SyndicationConfig>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub hiring_plans: Option<NamedMap<HiringPlan>>,
    #[serde(deserialize_with = "lenient::optional")]
    pub disc_configs: Option<NamedMap<DiscoverConfig>>,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "optional_text")]
    pub updated_by: Option<String>,
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient::text(deserializer)?;
    Ok(if text.is_empty() { None } else { Some(text) })
}

impl StateBlob {
    /// The state a reset writes: every section filled from the default plan.
    pub fn defaults(updated_by: &str) -> Self {
        let mut blob = Self::from_plan(&default_plan());
        blob.updated_by = Some(updated_by.to_string());
        blob
    }

    pub fn parse(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::invalid_input(format!("Invalid state JSON: {e}")))
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::runtime(format!("Failed to serialize state: {e}")))
    }

    /// Snapshot a plan in the persisted layout.
    ///
    /// Brands without a baseline get a zero record so the dashboard lists them.
    pub fn from_plan(plan: &PlanConfig) -> Self {
        let mut baselines = BaselineData::default();
        let mut synd = NamedMap::default();
        let mut hiring = NamedMap::default();
        let mut disc = NamedMap::default();

        for brand in &plan.brands {
            let baseline = brand.baseline.clone().unwrap_or_default();
            match &brand.model {
                BrandModel::Syndication { config, hiring: deltas } => {
                    baselines.syndication.insert(brand.name.clone(), baseline);
                    synd.insert(brand.name.clone(), config.clone());
                    hiring.insert(brand.name.clone(), *deltas);
                }
                BrandModel::Discover(config) => {
                    baselines.discover.insert(brand.name.clone(), baseline);
                    disc.insert(brand.name.clone(), config.clone());
                }
            }
        }

        Self {
            overhead: Some(plan.overhead),
            rpm_seasonality: Some(plan.seasonality),
            baseline_data: Some(baselines),
            synd_configs: Some(synd),
            hiring_plans: Some(hiring),
            disc_configs: Some(disc),
            last_updated: plan.last_updated,
            updated_by: plan.updated_by.clone(),
        }
    }

    /// Build the plan this state describes.
    ///
    /// Each `null` section is replaced by the default portfolio's section on
    /// its own, so saved syndication configs can pair with default hiring
    /// plans and vice versa. Syndication brands come first, then discover
    /// brands, each in stored order.
    pub fn into_plan(self) -> PlanConfig {
        let defaults = StateBlob::from_plan(&default_plan());

        let baselines = self.baseline_data.or(defaults.baseline_data).unwrap_or_default();
        let synd = self.synd_configs.or(defaults.synd_configs).unwrap_or_default();
        let hiring = self.hiring_plans.or(defaults.hiring_plans).unwrap_or_default();
        let disc = self.disc_configs.or(defaults.disc_configs).unwrap_or_default();

        let mut brands = Vec::with_capacity(synd.len() + disc.len());
        for (name, config) in synd.iter() {
            let deltas = hiring.get(name).copied().unwrap_or_default();
            let mut brand = Brand::syndication(name, config.clone(), deltas);
            brand.baseline = baselines.syndication.get(name).cloned();
            brands.push(brand);
        }
        for (name, config) in disc.iter() {
            let mut brand = Brand::discover(name, config.clone());
            brand.baseline = baselines.discover.get(name).cloned();
            brands.push(brand);
        }

        let mut plan = PlanConfig::new(
            self.overhead.unwrap_or_default(),
            self.rpm_seasonality.unwrap_or_default(),
            brands,
        );
        plan.last_updated = self.last_updated;
        plan.updated_by = self.updated_by;
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Month, Threshold};
    use serde_json::json;

    #[test]
    fn null_sections_fall_back_to_defaults() {
        let blob: StateBlob = serde_json::from_value(json!({
            "overhead": { "salary": 50000, "tech": 5000, "admin": 10000 },
            "rpmSeasonality": { "Mar": 0.8 },
            "baselineData": null,
            "syndConfigs": null,
            "hiringPlans": null,
            "discConfigs": null,
            "lastUpdated": "2026-03-01T10:00:00.000Z",
            "updatedBy": "system"
        }))
        .unwrap();
        let plan = blob.into_plan();
        assert_eq!(plan.overhead.monthly_total(), 65_000.0);
        assert_eq!(plan.seasonality.factor(Month::Mar), 0.8);
        assert_eq!(plan.seasonality.factor(Month::Apr), 1.0);
        assert_eq!(plan.brands.len(), 17);
        assert_eq!(plan.updated_by.as_deref(), Some("system"));
        assert!(plan.last_updated.is_some());
        assert!(plan.brand("Inquisitr").unwrap().baseline.is_some());
    }

    #[test]
    fn brands_keep_stored_order_and_pair_hiring_plans() {
        let blob: StateBlob = serde_json::from_value(json!({
            "syndConfigs": {
                "Zeta": { "shared": { "authors": 1 } },
                "Alpha": { "shared": { "authors": 4 } }
            },
            "hiringPlans": {
                "Alpha": { "authors": [1, 1] }
            },
            "discConfigs": {
                "Mid": { "baseTraffic": "1000", "baseRpm": 2, "transitionMonth": "Jun" }
            },
            "baselineData": { "syndication": {}, "discover": {} }
        }))
        .unwrap();
        let plan = blob.into_plan();
        let names: Vec<&str> = plan.brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);

        match &plan.brands[1].model {
            BrandModel::Syndication { hiring, .. } => assert_eq!(hiring.authors.total(), 2.0),
            _ => panic!("expected syndication brand"),
        }
        match &plan.brands[0].model {
            BrandModel::Syndication { hiring, .. } => assert_eq!(*hiring, HiringPlan::default()),
            _ => panic!("expected syndication brand"),
        }
        match &plan.brands[2].model {
            BrandModel::Discover(cfg) => {
                assert_eq!(cfg.base_traffic, 1000.0);
                assert_eq!(cfg.transition_month, Month::Jun);
            }
            _ => panic!("expected discover brand"),
        }
        assert!(plan.brands[2].baseline.is_none());
    }

    #[test]
    fn saved_plan_reads_back_as_the_same_plan() {
        let plan = default_plan();
        let raw = StateBlob::from_plan(&plan).to_json_pretty().unwrap();
        assert!(raw.contains("\"lh2Share\""));
        assert!(raw.contains("\"threshold\": null"));
        let back = StateBlob::parse(&raw).unwrap().into_plan();
        assert_eq!(back.brands, plan.brands);
        assert_eq!(back.seasonality, plan.seasonality);
    }

    #[test]
    fn unbounded_tier_reads_from_null() {
        let blob: StateBlob = serde_json::from_value(json!({
            "discConfigs": {
                "D": { "revShareSlabs": [ { "threshold": 1.3, "lh2Share": 0 }, { "threshold": null, "lh2Share": 0.5 } ] }
            }
        }))
        .unwrap();
        let plan = blob.into_plan();
        let slabs = plan.brand("D").unwrap().slabs();
        assert_eq!(slabs[1].threshold, Threshold::Unbounded);
    }

    #[test]
    fn malformed_fields_read_as_defaults() {
        let raw = r#"{
            "lastUpdated": "3/1/2026, 10:00:00 AM",
            "overhead": "lots",
            "syndConfigs": {
                "S": { "shared": null, "salaries": 12, "msnVideos": null, "revShareSlabs": null },
                "T": 5
            },
            "hiringPlans": null,
            "discConfigs": {
                "D": { "baseTraffic": 1000, "baseRpm": 2, "revShareSlabs": { "threshold": 2 } }
            },
            "baselineData": { "syndication": [], "discover": null }
        }"#;
        let plan = StateBlob::parse(raw).unwrap().into_plan();
        assert_eq!(plan.last_updated, None);
        assert_eq!(plan.overhead, Overhead::default());
        let names: Vec<&str> = plan.brands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["S", "T", "D"]);
        match &plan.brands[0].model {
            BrandModel::Syndication { config, .. } => {
                assert_eq!(config.staffing.authors, 0.0);
                assert_eq!(config.salaries.author_salary, 0.0);
                assert_eq!(config.video.rpm, 0.0);
                assert!(config.slabs.is_empty());
            }
            _ => panic!("expected syndication brand"),
        }
        assert!(plan.brand("D").unwrap().slabs().is_empty());
        assert!(plan.brands.iter().all(|b| b.baseline.is_none()));
    }

    #[test]
    fn invalid_json_is_an_input_error() {
        let err = StateBlob::parse("{ not json").unwrap_err();
        assert_eq!(err.exit_code(), AppError::INVALID_INPUT);
    }

    #[test]
    fn named_map_replaces_in_place() {
        let mut m: NamedMap<u8> = [("a".to_string(), 1), ("b".to_string(), 2)].into_iter().collect();
        m.insert("a", 3);
        let entries: Vec<(&str, &u8)> = m.iter().collect();
        assert_eq!(entries, [("a", &3), ("b", &2)]);
    }
}
