//! Monthly model for content-syndication brands.
//!
//! Revenue comes from three RPM streams driven by newsroom output:
//! programmatic sessions, syndicated article views, and partner video views.
//! Cost is salaried headcount plus an indirect-cost uplift.

use serde::Serialize;

use crate::domain::{HiringPlan, Month, SeasonalityTable, SyndicationConfig, WORKING_DAYS};
use crate::models::{Headcount, allocate, headcount_at};
use crate::projection::{MonthDrivers, MonthlyProjection};

/// Driver values behind one syndication month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyndicationMonth {
    pub authors: f64,
    pub editors: f64,
    pub video_editors: f64,
    pub articles: f64,
    pub syndication_views: f64,
    pub engaged_views: f64,
    /// Stream revenue after the success-probability factor.
    pub programmatic_revenue: f64,
    pub syndication_revenue: f64,
    pub video_revenue: f64,
    /// Sum of the three streams before the success-probability factor.
    pub gross_revenue: f64,
    /// Salaries before the indirect-cost uplift.
    pub direct_cost: f64,
}

impl SyndicationMonth {
    pub fn stream_revenue(&self) -> f64 {
        self.programmatic_revenue + self.syndication_revenue + self.video_revenue
    }
}

/// Project every month of the horizon.
pub fn project_syndication(
    config: &SyndicationConfig,
    hiring: &HiringPlan,
    seasonality: &SeasonalityTable,
) -> Vec<MonthlyProjection> {
    Month::ALL
        .into_iter()
        .map(|month| project_syndication_month(config, hiring, seasonality, month))
        .collect()
}

pub fn project_syndication_month(
    config: &SyndicationConfig,
    hiring: &HiringPlan,
    seasonality: &SeasonalityTable,
    month: Month,
) -> MonthlyProjection {
    let i = month.index();
    let season = seasonality.factor(month);

    let base = Headcount {
        authors: config.staffing.authors,
        editors: config.staffing.editors,
        video_editors: config.video.video_editors,
    };
    let staff = headcount_at(base, hiring, i);

    let articles = staff.authors * config.staffing.articles_per_author_per_day * WORKING_DAYS;

    let programmatic = &config.programmatic;
    let programmatic_revenue =
        (articles * programmatic.sessions_per_article / 1000.0) * programmatic.rpm * season;

    let synd = &config.syndication;
    let syndication_views = articles * synd.views_per_article + synd.extra_views[i];
    let syndication_revenue = (syndication_views / 1000.0) * synd.blended_rpm * season;

    let video = &config.video;
    let engaged_views = staff.video_editors
        * video.videos_per_editor_per_day
        * WORKING_DAYS
        * video.views_per_video
        + video.extra_engaged_views[i];
    let video_revenue = (engaged_views / 1000.0) * video.rpm * season;

    let success = config.success_probability / 100.0;
    let drivers = SyndicationMonth {
        authors: staff.authors,
        editors: staff.editors,
        video_editors: staff.video_editors,
        articles,
        syndication_views,
        engaged_views,
        programmatic_revenue: programmatic_revenue * success,
        syndication_revenue: syndication_revenue * success,
        video_revenue: video_revenue * success,
        gross_revenue: programmatic_revenue + syndication_revenue + video_revenue,
        direct_cost: staff.authors * config.salaries.author_salary
            + staff.editors * config.salaries.editor_salary
            + staff.video_editors * config.salaries.video_editor_salary,
    };

    let total_revenue = drivers.stream_revenue();
    let total_cost = drivers.direct_cost * (1.0 + config.indirect_costs_pct / 100.0);

    MonthlyProjection {
        month,
        seasonality: season,
        drivers: MonthDrivers::Syndication(drivers),
        total_revenue,
        total_cost,
        allocation: allocate(
            total_revenue,
            total_cost,
            config.base_revenue,
            config.base_costs,
            &config.slabs,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MonthlySeries, RevShareSlab};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn drivers(p: &MonthlyProjection) -> SyndicationMonth {
        match p.drivers {
            MonthDrivers::Syndication(d) => d,
            MonthDrivers::Discover(_) => panic!("expected syndication drivers"),
        }
    }

    #[test]
    fn programmatic_scenario() {
        let cfg = SyndicationConfig::standard();
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &SeasonalityTable::flat(), Month::Mar);
        let d = drivers(&p);
        assert!(close(d.articles, 220.0));
        assert!(close(d.programmatic_revenue, 352.0));
    }

    #[test]
    fn full_month_with_standard_config() {
        let cfg = SyndicationConfig::standard();
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &SeasonalityTable::flat(), Month::Mar);
        let d = drivers(&p);
        // 220 articles * 1100 views = 242000 views @ 3.25
        assert!(close(d.syndication_revenue, 786.5));
        // 1 editor * 3 videos * 22 days * 5000 views = 330000 @ 2.5
        assert!(close(d.engaged_views, 330_000.0));
        assert!(close(d.video_revenue, 825.0));
        assert!(close(p.total_revenue, 352.0 + 786.5 + 825.0));
        // 2*800 + 1*1200 + 1*1000 = 3800, +10%
        assert!(close(d.direct_cost, 3800.0));
        assert!(close(p.total_cost, 4180.0));
        // growth 1963.5 / 2000 < 1.3 -> 0% share
        assert_eq!(p.allocation.share, 0.0);
        assert_eq!(p.allocation.lh2_net, 0.0);
    }

    #[test]
    fn seasonality_and_success_scale_revenue_not_cost() {
        let mut cfg = SyndicationConfig::standard();
        cfg.success_probability = 50.0;
        let season = SeasonalityTable::flat().with_factor(Month::Dec, 2.0);
        let flat = project_syndication_month(&SyndicationConfig::standard(), &HiringPlan::default(), &SeasonalityTable::flat(), Month::Dec);
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &season, Month::Dec);
        assert!(close(p.total_revenue, flat.total_revenue));
        assert!(close(p.total_cost, flat.total_cost));
        assert_eq!(p.seasonality, 2.0);
    }

    #[test]
    fn streams_carry_the_success_factor() {
        let mut cfg = SyndicationConfig::standard();
        cfg.success_probability = 50.0;
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &SeasonalityTable::flat(), Month::Mar);
        let d = drivers(&p);
        assert!(close(d.programmatic_revenue, 176.0));
        assert!(close(d.syndication_revenue, 393.25));
        assert!(close(d.video_revenue, 412.5));
        assert!(close(d.programmatic_revenue + d.syndication_revenue + d.video_revenue, p.total_revenue));
        assert!(close(p.total_revenue, 981.75));
        assert!(close(d.gross_revenue, 1963.5));
    }

    #[test]
    fn hiring_and_overrides_apply_per_month() {
        let cfg = {
            let mut c = SyndicationConfig::standard();
            c.syndication.extra_views = MonthlySeries::from([0.0, 1000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
            c
        };
        let hiring = HiringPlan {
            authors: MonthlySeries::from([0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]),
            ..HiringPlan::default()
        };
        let months = project_syndication(&cfg, &hiring, &SeasonalityTable::flat());
        assert_eq!(months.len(), 10);
        let mar = drivers(&months[0]);
        let apr = drivers(&months[1]);
        let may = drivers(&months[2]);
        assert_eq!(mar.authors, 2.0);
        assert_eq!(apr.authors, 3.0);
        assert_eq!(may.authors, 3.0);
        assert!(close(apr.syndication_views, 330.0 * 1100.0 + 1000.0));
        assert!(close(may.syndication_views, 330.0 * 1100.0));
        assert!(months[1].total_cost > months[0].total_cost);
    }

    #[test]
    fn auto_mode_brand_gets_top_share_of_totals() {
        let mut cfg = SyndicationConfig::standard();
        cfg.base_revenue = 0.0;
        cfg.base_costs = 0.0;
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &SeasonalityTable::flat(), Month::Apr);
        assert!(close(p.allocation.lh2_revenue, p.total_revenue * 0.5));
        assert!(close(p.allocation.lh2_cost, p.total_cost * 0.5));
    }

    #[test]
    fn revenue_is_monotone_in_drivers() {
        let season = SeasonalityTable::standard();
        let base = SyndicationConfig::standard();
        let bumps: [fn(&mut SyndicationConfig); 4] = [
            |c| c.programmatic.sessions_per_article += 50.0,
            |c| c.programmatic.rpm += 0.5,
            |c| c.syndication.blended_rpm += 0.25,
            |c| c.video.rpm += 0.25,
        ];
        for bump in bumps {
            let mut cfg = base.clone();
            bump(&mut cfg);
            for month in Month::ALL {
                let lo = project_syndication_month(&base, &HiringPlan::default(), &season, month);
                let hi = project_syndication_month(&cfg, &HiringPlan::default(), &season, month);
                assert!(hi.total_revenue >= lo.total_revenue);
            }
        }
    }

    #[test]
    fn growth_past_thresholds_picks_higher_tier() {
        let mut cfg = SyndicationConfig::standard();
        cfg.base_revenue = 500.0;
        cfg.base_costs = 1000.0;
        cfg.slabs = vec![RevShareSlab::up_to(2.0, 0.1), RevShareSlab::unbounded(0.4)];
        let p = project_syndication_month(&cfg, &HiringPlan::default(), &SeasonalityTable::flat(), Month::Mar);
        assert!(p.allocation.growth_multiple > 2.0);
        assert_eq!(p.allocation.share, 0.4);
        assert!(close(p.allocation.lh2_revenue, (p.total_revenue - 500.0) * 0.4));
        assert!(close(p.allocation.lh2_cost, (p.total_cost - 1000.0) * 0.4));
    }
}
