//! Brand configuration: the two business models and their inputs.
//!
//! Field names follow the dashboard's persisted JSON (camelCase, with a few
//! historical names such as `msnVideos` and `baseCostsLH2`). Missing or
//! non-numeric numbers read as `0`; missing monthly arrays read as all-zero.

use serde::{Deserialize, Serialize};

use crate::domain::lenient;
use crate::domain::{Month, MonthlySeries, RevShareSlab, default_slabs};

/// Business model of a brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Content syndication: staffed newsroom, three RPM streams.
    Syndication,
    /// Audience discovery: existing traffic, RPM uplift.
    Discover,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Syndication, Category::Discover];

    pub fn display_name(self) -> &'static str {
        match self {
            Category::Syndication => "Syndication",
            Category::Discover => "Discover",
        }
    }
}

/// Staffing role tracked by the hiring plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Author,
    Editor,
    VideoEditor,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Author, Role::Editor, Role::VideoEditor];

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Author => "authors",
            Role::Editor => "editors",
            Role::VideoEditor => "video editors",
        }
    }
}

/// Headcount added (or removed, if negative) per month, per role.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HiringPlan {
    pub authors: MonthlySeries,
    pub editors: MonthlySeries,
    pub video_editors: MonthlySeries,
}

impl HiringPlan {
    pub fn deltas(&self, role: Role) -> &MonthlySeries {
        match role {
            Role::Author => &self.authors,
            Role::Editor => &self.editors,
            Role::VideoEditor => &self.video_editors,
        }
    }

    /// Net hires over the whole horizon for one role.
    pub fn role_total(&self, role: Role) -> f64 {
        self.deltas(role).total()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Staffing {
    #[serde(deserialize_with = "lenient::number")]
    pub authors: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub editors: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub articles_per_author_per_day: f64,
}

/// Monthly salaries per head.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Salaries {
    #[serde(deserialize_with = "lenient::number")]
    pub author_salary: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub editor_salary: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub video_editor_salary: f64,
}

/// On-site programmatic ads driven by article sessions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgrammaticStream {
    #[serde(deserialize_with = "lenient::number")]
    pub sessions_per_article: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub rpm: f64,
}

/// Partner syndication views on published articles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyndicationStream {
    #[serde(deserialize_with = "lenient::number")]
    pub views_per_article: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub blended_rpm: f64,
    /// Extra views per month on top of the article-driven volume.
    #[serde(rename = "momExtraViews")]
    pub extra_views: MonthlySeries,
}

/// Short-form video on a partner network.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoStream {
    #[serde(deserialize_with = "lenient::number")]
    pub video_editors: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub videos_per_editor_per_day: f64,
    #[serde(rename = "engagedViewsPerVideo", deserialize_with = "lenient::number")]
    pub views_per_video: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub rpm: f64,
    #[serde(rename = "momExtraEngagedViews")]
    pub extra_engaged_views: MonthlySeries,
}

/// Inputs for a content-syndication brand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyndicationConfig {
    #[serde(rename = "shared", deserialize_with = "lenient::or_default")]
    pub staffing: Staffing,
    #[serde(deserialize_with = "lenient::or_default")]
    pub salaries: Salaries,
    /// Overhead on direct salary cost, in percent.
    #[serde(deserialize_with = "lenient::number")]
    pub indirect_costs_pct: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    pub programmatic: ProgrammaticStream,
    #[serde(deserialize_with = "lenient::or_default")]
    pub syndication: SyndicationStream,
    #[serde(rename = "msnVideos", deserialize_with = "lenient::or_default")]
    pub video: VideoStream,
    /// Pre-partnership monthly revenue.
    #[serde(deserialize_with = "lenient::number")]
    pub base_revenue: f64,
    /// Pre-partnership monthly cost.
    #[serde(deserialize_with = "lenient::number")]
    pub base_costs: f64,
    #[serde(rename = "revShareSlabs", deserialize_with = "lenient::list")]
    pub slabs: Vec<RevShareSlab>,
    /// Percent in `[0, 100]`.
    #[serde(deserialize_with = "lenient::number")]
    pub success_probability: f64,
}

impl SyndicationConfig {
    /// Starting point for a syndication brand on the default plan.
    pub fn standard() -> Self {
        Self {
            staffing: Staffing {
                authors: 2.0,
                editors: 1.0,
                articles_per_author_per_day: 5.0,
            },
            salaries: Salaries {
                author_salary: 800.0,
                editor_salary: 1200.0,
                video_editor_salary: 1000.0,
            },
            indirect_costs_pct: 10.0,
            programmatic: ProgrammaticStream {
                sessions_per_article: 400.0,
                rpm: 4.0,
            },
            syndication: SyndicationStream {
                views_per_article: 1100.0,
                blended_rpm: 3.25,
                extra_views: MonthlySeries::zeros(),
            },
            video: VideoStream {
                video_editors: 1.0,
                videos_per_editor_per_day: 3.0,
                views_per_video: 5000.0,
                rpm: 2.5,
                extra_engaged_views: MonthlySeries::zeros(),
            },
            base_revenue: 2000.0,
            base_costs: 1000.0,
            slabs: default_slabs(),
            success_probability: 100.0,
        }
    }
}

/// Inputs for an audience-discovery brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoverConfig {
    #[serde(deserialize_with = "lenient::number")]
    pub base_traffic: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub base_rpm: f64,
    /// RPM multiplier applied from `transition_month` onwards.
    #[serde(deserialize_with = "lenient::number")]
    pub rpm_uplift: f64,
    #[serde(deserialize_with = "lenient::month")]
    pub transition_month: Month,
    /// Monthly operating cost before any direct additions.
    #[serde(deserialize_with = "lenient::number")]
    pub base_cost: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub success_probability: f64,
    /// Traffic growth vs. base, in percent, per month.
    pub traffic_growth: MonthlySeries,
    pub direct_costs: MonthlySeries,
    #[serde(deserialize_with = "lenient::number")]
    pub base_revenue: f64,
    #[serde(rename = "baseCostsLH2", deserialize_with = "lenient::number")]
    pub base_costs: f64,
    #[serde(rename = "revShareSlabs", deserialize_with = "lenient::list")]
    pub slabs: Vec<RevShareSlab>,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        Self {
            base_traffic: 0.0,
            base_rpm: 0.0,
            rpm_uplift: 0.0,
            transition_month: Month::FIRST,
            base_cost: 0.0,
            success_probability: 0.0,
            traffic_growth: MonthlySeries::zeros(),
            direct_costs: MonthlySeries::zeros(),
            base_revenue: 0.0,
            base_costs: 0.0,
            slabs: Vec::new(),
        }
    }
}

impl DiscoverConfig {
    /// Derive a starting config from a brand's baseline record.
    ///
    /// Base revenue and cost start at zero, so new discover brands begin in
    /// auto mode.
    pub fn from_baseline(baseline: &BaselineRecord) -> Self {
        Self {
            base_traffic: baseline.current_traffic.unwrap_or(0.0),
            base_rpm: baseline.rpm.unwrap_or(0.0),
            rpm_uplift: 1.0,
            transition_month: Month::FIRST,
            base_cost: baseline.cost.round(),
            success_probability: 100.0,
            traffic_growth: MonthlySeries::zeros(),
            direct_costs: MonthlySeries::zeros(),
            base_revenue: 0.0,
            base_costs: 0.0,
            slabs: default_slabs(),
        }
    }
}

/// A brand's exit figures before the partnership (informational).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BaselineRecord {
    #[serde(deserialize_with = "lenient::number")]
    pub revenue: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_number")]
    pub current_traffic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::optional_number")]
    pub rpm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_network: Option<String>,
}

impl BaselineRecord {
    pub fn syndication(revenue: f64, cost: f64) -> Self {
        Self {
            revenue,
            cost,
            ..Self::default()
        }
    }

    pub fn discover(revenue: f64, cost: f64, current_traffic: f64, rpm: f64, ad_network: &str) -> Self {
        Self {
            revenue,
            cost,
            current_traffic: Some(current_traffic),
            rpm: Some(rpm),
            ad_network: Some(ad_network.to_string()),
        }
    }
}

/// Model-specific inputs of a brand.
#[derive(Debug, Clone, PartialEq)]
pub enum BrandModel {
    Syndication {
        config: SyndicationConfig,
        hiring: HiringPlan,
    },
    Discover(DiscoverConfig),
}

/// A brand in the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub name: String,
    pub baseline: Option<BaselineRecord>,
    pub model: BrandModel,
}

impl Brand {
    pub fn syndication(name: impl Into<String>, config: SyndicationConfig, hiring: HiringPlan) -> Self {
        Self {
            name: name.into(),
            baseline: None,
            model: BrandModel::Syndication { config, hiring },
        }
    }

    pub fn discover(name: impl Into<String>, config: DiscoverConfig) -> Self {
        Self {
            name: name.into(),
            baseline: None,
            model: BrandModel::Discover(config),
        }
    }

    pub fn with_baseline(mut self, baseline: BaselineRecord) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn category(&self) -> Category {
        match self.model {
            BrandModel::Syndication { .. } => Category::Syndication,
            BrandModel::Discover(_) => Category::Discover,
        }
    }

    pub fn slabs(&self) -> &[RevShareSlab] {
        match &self.model {
            BrandModel::Syndication { config, .. } => &config.slabs,
            BrandModel::Discover(config) => &config.slabs,
        }
    }

    pub fn success_probability(&self) -> f64 {
        match &self.model {
            BrandModel::Syndication { config, .. } => config.success_probability,
            BrandModel::Discover(config) => config.success_probability,
        }
    }
}
