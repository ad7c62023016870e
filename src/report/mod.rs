//! Portfolio rollups: brand → category → portfolio.
//!
//! Purely additive. Nothing is rounded here; `format` owns presentation.

use serde::Serialize;

use crate::domain::{Category, MonthlySeries, Overhead};
use crate::projection::{BrandProjection, Metric};

pub mod format;

pub use format::*;

/// The unsummed series of one brand, kept for drill-down.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandSeries {
    pub name: String,
    pub category: Category,
    pub revenue: MonthlySeries,
    pub cost: MonthlySeries,
    pub lh2_revenue: MonthlySeries,
    pub lh2_cost: MonthlySeries,
    pub lh2_net: MonthlySeries,
}

impl BrandSeries {
    pub fn from_projection(p: &BrandProjection) -> Self {
        Self {
            name: p.name.clone(),
            category: p.category,
            revenue: p.series(Metric::Revenue),
            cost: p.series(Metric::Cost),
            lh2_revenue: p.series(Metric::Lh2Revenue),
            lh2_cost: p.series(Metric::Lh2Cost),
            lh2_net: p.series(Metric::Lh2Net),
        }
    }

    pub fn metric(&self, metric: Metric) -> &MonthlySeries {
        match metric {
            Metric::Revenue => &self.revenue,
            Metric::Cost => &self.cost,
            Metric::Lh2Revenue => &self.lh2_revenue,
            Metric::Lh2Cost => &self.lh2_cost,
            Metric::Lh2Net => &self.lh2_net,
        }
    }
}

/// Per-month sums over the brands of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRollup {
    pub category: Category,
    pub revenue: MonthlySeries,
    pub lh2_net: MonthlySeries,
    pub brands: Vec<BrandSeries>,
}

impl CategoryRollup {
    fn empty(category: Category) -> Self {
        Self {
            category,
            revenue: MonthlySeries::zeros(),
            lh2_net: MonthlySeries::zeros(),
            brands: Vec::new(),
        }
    }

    fn push(&mut self, series: BrandSeries) {
        self.revenue += series.revenue;
        self.lh2_net += series.lh2_net;
        self.brands.push(series);
    }

    /// Per-brand series for one metric, in plan order.
    pub fn drill_down(&self, metric: Metric) -> Vec<(&str, &MonthlySeries)> {
        self.brands
            .iter()
            .map(|b| (b.name.as_str(), b.metric(metric)))
            .collect()
    }
}

/// Both categories, their sum, and the portfolio P&L under fixed overhead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRollup {
    pub syndication: CategoryRollup,
    pub discover: CategoryRollup,
    pub total_revenue: MonthlySeries,
    pub total_lh2_net: MonthlySeries,
    pub overhead: MonthlySeries,
    pub net_profit: MonthlySeries,
    /// Net profit as a percentage of total revenue; 0 for months without revenue.
    pub margin_pct: MonthlySeries,
}

/// 10-month totals of a rollup.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PortfolioTotals {
    pub syndication_revenue: f64,
    pub syndication_lh2_net: f64,
    pub discover_revenue: f64,
    pub discover_lh2_net: f64,
    pub total_revenue: f64,
    pub total_lh2_net: f64,
    pub overhead: f64,
    pub net_profit: f64,
    pub margin_pct: f64,
}

impl PortfolioRollup {
    pub fn category(&self, category: Category) -> &CategoryRollup {
        match category {
            Category::Syndication => &self.syndication,
            Category::Discover => &self.discover,
        }
    }

    pub fn drill_down(&self, category: Category, metric: Metric) -> Vec<(&str, &MonthlySeries)> {
        self.category(category).drill_down(metric)
    }

    pub fn totals(&self) -> PortfolioTotals {
        let total_revenue = self.total_revenue.total();
        let net_profit = self.net_profit.total();
        PortfolioTotals {
            syndication_revenue: self.syndication.revenue.total(),
            syndication_lh2_net: self.syndication.lh2_net.total(),
            discover_revenue: self.discover.revenue.total(),
            discover_lh2_net: self.discover.lh2_net.total(),
            total_revenue,
            total_lh2_net: self.total_lh2_net.total(),
            overhead: self.overhead.total(),
            net_profit,
            margin_pct: margin_pct(net_profit, total_revenue),
        }
    }
}

fn margin_pct(net_profit: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        net_profit / revenue * 100.0
    } else {
        0.0
    }
}

/// Aggregate brand projections into category and portfolio series.
pub fn rollup(projections: &[BrandProjection], overhead: &Overhead) -> PortfolioRollup {
    let mut syndication = CategoryRollup::empty(Category::Syndication);
    let mut discover = CategoryRollup::empty(Category::Discover);

    for p in projections {
        let series = BrandSeries::from_projection(p);
        match p.category {
            Category::Syndication => syndication.push(series),
            Category::Discover => discover.push(series),
        }
    }

    let total_revenue = syndication.revenue + discover.revenue;
    let total_lh2_net = syndication.lh2_net + discover.lh2_net;
    let overhead = MonthlySeries::filled(overhead.monthly_total());
    let net_profit = total_lh2_net - overhead;
    let margin_pct = MonthlySeries::from_fn(|i| margin_pct(net_profit[i], total_revenue[i]));

    PortfolioRollup {
        syndication,
        discover,
        total_revenue,
        total_lh2_net,
        overhead,
        net_profit,
        margin_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Brand, DiscoverConfig, HiringPlan, SeasonalityTable, SyndicationConfig, default_slabs};
    use crate::projection::project_brand;

    fn discover(traffic: f64) -> Brand {
        let mut cfg = DiscoverConfig::default();
        cfg.base_traffic = traffic;
        cfg.base_rpm = 2.0;
        cfg.rpm_uplift = 1.0;
        cfg.success_probability = 100.0;
        cfg.slabs = default_slabs();
        Brand::discover(format!("D{traffic}"), cfg)
    }

    fn projections() -> Vec<BrandProjection> {
        let s = SeasonalityTable::flat();
        vec![
            project_brand(&discover(100_000.0), &s),
            project_brand(&Brand::syndication("S", SyndicationConfig::standard(), HiringPlan::default()), &s),
            project_brand(&discover(200_000.0), &s),
        ]
    }

    #[test]
    fn categories_sum_their_brands() {
        let ps = projections();
        let r = rollup(&ps, &Overhead::default());
        assert_eq!(r.discover.brands.len(), 2);
        assert_eq!(r.syndication.brands.len(), 1);
        // 100k and 200k visits at $2 RPM.
        assert!((r.discover.revenue[0] - 600.0).abs() < 1e-9);
        for i in 0..10 {
            let sum: f64 = ps.iter().map(|p| p.months[i].total_revenue).sum();
            assert!((r.total_revenue[i] - sum).abs() < 1e-6);
            let net: f64 = ps.iter().map(|p| p.months[i].allocation.lh2_net).sum();
            assert!((r.total_lh2_net[i] - net).abs() < 1e-6);
        }
        let names: Vec<&str> = r
            .drill_down(Category::Discover, Metric::Revenue)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, ["D100000", "D200000"]);
    }

    #[test]
    fn net_profit_and_margin() {
        let r = rollup(&projections(), &Overhead::default());
        for i in 0..10 {
            assert!((r.net_profit[i] - (r.total_lh2_net[i] - 64_655.0)).abs() < 1e-6);
            let expected = r.net_profit[i] / r.total_revenue[i] * 100.0;
            assert!((r.margin_pct[i] - expected).abs() < 1e-9);
        }
        let t = r.totals();
        assert!((t.overhead - 646_550.0).abs() < 1e-6);
        assert!((t.net_profit - (t.total_lh2_net - t.overhead)).abs() < 1e-6);
    }

    #[test]
    fn empty_portfolio_has_zero_margin() {
        let r = rollup(&[], &Overhead::default());
        assert_eq!(r.total_revenue.total(), 0.0);
        assert_eq!(r.margin_pct.total(), 0.0);
        assert_eq!(r.totals().margin_pct, 0.0);
        assert!((r.net_profit[0] + 64_655.0).abs() < 1e-9);
    }
}
