//! Monthly model for audience-discovery brands.

use serde::Serialize;

use crate::domain::{DiscoverConfig, Month, SeasonalityTable};
use crate::models::allocate;
use crate::projection::{MonthDrivers, MonthlyProjection};

/// Driver values behind one discover month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscoverMonth {
    pub traffic: f64,
    /// RPM after uplift and seasonality.
    pub effective_rpm: f64,
    pub uplift_active: bool,
}

pub fn project_discover(config: &DiscoverConfig, seasonality: &SeasonalityTable) -> Vec<MonthlyProjection> {
    Month::ALL
        .into_iter()
        .map(|month| project_discover_month(config, seasonality, month))
        .collect()
}

pub fn project_discover_month(
    config: &DiscoverConfig,
    seasonality: &SeasonalityTable,
    month: Month,
) -> MonthlyProjection {
    let i = month.index();
    let season = seasonality.factor(month);

    let traffic = config.base_traffic * (1.0 + config.traffic_growth[i] / 100.0);
    let uplift_active = month >= config.transition_month;
    let rpm = if uplift_active {
        config.base_rpm * config.rpm_uplift
    } else {
        config.base_rpm
    };
    let effective_rpm = rpm * season;

    let total_revenue = (traffic / 1000.0) * effective_rpm * (config.success_probability / 100.0);
    let total_cost = config.base_cost + config.direct_costs[i];

    MonthlyProjection {
        month,
        seasonality: season,
        drivers: MonthDrivers::Discover(DiscoverMonth {
            traffic,
            effective_rpm,
            uplift_active,
        }),
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
    use crate::domain::{BaselineRecord, MonthlySeries, default_slabs};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn config() -> DiscoverConfig {
        DiscoverConfig::from_baseline(&BaselineRecord::discover(0.0, 0.0, 500_000.0, 3.0, "tier1"))
    }

    #[test]
    fn flat_scenario() {
        let p = project_discover_month(&config(), &SeasonalityTable::flat(), Month::Mar);
        assert!(close(p.total_revenue, 1500.0));
        assert_eq!(p.total_cost, 0.0);
        // No baseline: auto mode at 50%.
        assert!(close(p.allocation.lh2_revenue, 750.0));
    }

    #[test]
    fn uplift_applies_from_transition_month() {
        let mut cfg = config();
        cfg.rpm_uplift = 1.5;
        cfg.transition_month = Month::Jun;
        let months = project_discover(&cfg, &SeasonalityTable::flat());
        assert!(close(months[Month::May.index()].total_revenue, 1500.0));
        assert!(close(months[Month::Jun.index()].total_revenue, 2250.0));
        assert!(close(months[Month::Dec.index()].total_revenue, 2250.0));
        match months[Month::Jun.index()].drivers {
            MonthDrivers::Discover(d) => {
                assert!(d.uplift_active);
                assert!(close(d.effective_rpm, 4.5));
            }
            MonthDrivers::Syndication(_) => panic!("expected discover drivers"),
        }
    }

    #[test]
    fn growth_costs_and_seasonality() {
        let mut cfg = config();
        cfg.traffic_growth = MonthlySeries::from([0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -50.0]);
        cfg.base_cost = 400.0;
        cfg.direct_costs = MonthlySeries::from([0.0, 250.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        cfg.success_probability = 80.0;
        let months = project_discover(&cfg, &SeasonalityTable::standard());
        // Apr: 550k traffic, 3.0 * 0.85 RPM, 80%
        assert!(close(months[1].total_revenue, 550.0 * 2.55 * 0.8));
        assert!(close(months[1].total_cost, 650.0));
        assert!(close(months[0].total_cost, 400.0));
        // Dec: 250k traffic, 3.0 * 1.35 RPM, 80%
        assert!(close(months[9].total_revenue, 250.0 * 4.05 * 0.8));
    }

    #[test]
    fn incremental_allocation_uses_lh2_baseline() {
        let mut cfg = config();
        cfg.base_revenue = 1000.0;
        cfg.base_costs = 100.0;
        cfg.base_cost = 300.0;
        cfg.slabs = default_slabs();
        let p = project_discover_month(&cfg, &SeasonalityTable::flat(), Month::Mar);
        // growth 1.5x -> 20%
        assert!(close(p.allocation.share, 0.20));
        assert!(close(p.allocation.lh2_revenue, 100.0));
        assert!(close(p.allocation.lh2_cost, 40.0));
        assert!(close(p.allocation.lh2_net, 60.0));
    }

    #[test]
    fn revenue_is_monotone_in_traffic_and_rpm() {
        let season = SeasonalityTable::standard();
        let base = config();
        let bumps: [fn(&mut DiscoverConfig); 3] = [
            |c| c.base_traffic += 10_000.0,
            |c| c.base_rpm += 0.1,
            |c| c.traffic_growth = MonthlySeries::filled(5.0),
        ];
        for bump in bumps {
            let mut cfg = base.clone();
            bump(&mut cfg);
            for month in Month::ALL {
                let lo = project_discover_month(&base, &season, month);
                let hi = project_discover_month(&cfg, &season, month);
                assert!(hi.total_revenue >= lo.total_revenue);
            }
        }
    }
}
