//! Terminal formatting for projections and rollups.
//!
//! All rounding happens here; the engine and rollups carry full precision.

use crate::domain::{Category, HiringPlan, MONTH_COUNT, Month, MonthlySeries, PlanIssue, Role, Severity};
use crate::projection::{BrandProjection, MonthDrivers, Metric};
use crate::report::PortfolioRollup;

const LABEL_WIDTH: usize = 22;
const CELL_WIDTH: usize = 9;

/// Compact currency: `$1.23M`, `$45.6K`, `$789`.
pub fn fmt_money(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{sign}${:.2}M", a / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{sign}${:.1}K", a / 1_000.0)
    } else {
        format!("{sign}${}", a.round())
    }
}

/// Compact count: `1.2M`, `45K`, `789`.
pub fn fmt_count(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{sign}{:.1}M", a / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{sign}{:.0}K", a / 1_000.0)
    } else {
        format!("{sign}{}", a.round())
    }
}

fn fmt_pct(v: f64) -> String {
    format!("{v:.1}%")
}

fn header_row(label: &str) -> String {
    let mut line = format!("{label:<LABEL_WIDTH$}");
    for m in Month::ALL {
        line.push_str(&format!(" {:>CELL_WIDTH$}", m.label()));
    }
    line.push_str(&format!(" {:>CELL_WIDTH$}", "Total"));
    line
}

fn rule_row() -> String {
    let mut line = "-".repeat(LABEL_WIDTH);
    for _ in 0..=MONTH_COUNT {
        line.push(' ');
        line.push_str(&"-".repeat(CELL_WIDTH));
    }
    line
}

fn series_row(label: &str, series: &MonthlySeries, total: f64, fmt: fn(f64) -> String) -> String {
    let mut line = format!("{:<LABEL_WIDTH$}", truncate(label, LABEL_WIDTH));
    for v in series.iter() {
        line.push_str(&format!(" {:>CELL_WIDTH$}", fmt(v)));
    }
    line.push_str(&format!(" {:>CELL_WIDTH$}", fmt(total)));
    line
}

/// Format the portfolio P&L. With `drill`, each category row is followed by
/// its brands.
pub fn format_summary(rollup: &PortfolioRollup, drill: bool) -> String {
    let totals = rollup.totals();
    let mut rows: Vec<String> = vec![header_row("Portfolio"), rule_row()];

    for category in Category::ALL {
        let c = rollup.category(category);
        let name = category.display_name();
        rows.push(series_row(&format!("{name} revenue"), &c.revenue, c.revenue.total(), fmt_money));
        if drill {
            for (brand, series) in c.drill_down(Metric::Revenue) {
                rows.push(series_row(&format!("  {brand}"), series, series.total(), fmt_money));
            }
        }
        rows.push(series_row(&format!("{name} LH2 net"), &c.lh2_net, c.lh2_net.total(), fmt_money));
        if drill {
            for (brand, series) in c.drill_down(Metric::Lh2Net) {
                rows.push(series_row(&format!("  {brand}"), series, series.total(), fmt_money));
            }
        }
    }

    rows.push(rule_row());
    rows.push(series_row("Total revenue", &rollup.total_revenue, totals.total_revenue, fmt_money));
    rows.push(series_row("Total LH2 net", &rollup.total_lh2_net, totals.total_lh2_net, fmt_money));
    rows.push(series_row("Overhead", &rollup.overhead, totals.overhead, fmt_money));
    rows.push(series_row("Net profit", &rollup.net_profit, totals.net_profit, fmt_money));
    rows.push(series_row("Margin", &rollup.margin_pct, totals.margin_pct, fmt_pct));

    let mut out = String::new();
    out.push_str("=== AOP projection (Mar-Dec) ===\n");
    out.push_str(&format!(
        "Syndication brands: {} | Discover brands: {}\n\n",
        rollup.syndication.brands.len(),
        rollup.discover.brands.len()
    ));
    for row in rows {
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

/// Format one brand's monthly table with totals.
pub fn format_brand(projection: &BrandProjection) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== {} ({}) ===\n",
        projection.name,
        projection.category.display_name()
    ));
    if projection.is_auto_mode() {
        out.push_str("Auto mode: no baseline, top-tier share applied to totals.\n");
    }
    out.push('\n');

    let mut rows = Vec::new();
    match projection.category {
        Category::Syndication => {
            rows.push(format!(
                "{:<5} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                "month", "articles", "prog", "synd", "video", "revenue", "cost", "growth", "share",
                "lh2_rev", "lh2_cost", "lh2_net"
            ));
            for m in &projection.months {
                let MonthDrivers::Syndication(d) = &m.drivers else { continue };
                rows.push(format!(
                    "{:<5} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                    m.month.label(),
                    fmt_count(d.articles),
                    fmt_money(d.programmatic_revenue),
                    fmt_money(d.syndication_revenue),
                    fmt_money(d.video_revenue),
                    fmt_money(m.total_revenue),
                    fmt_money(m.total_cost),
                    format!("{:.2}x", m.allocation.growth_multiple),
                    format!("{:.0}%", m.allocation.share * 100.0),
                    fmt_money(m.allocation.lh2_revenue),
                    fmt_money(m.allocation.lh2_cost),
                    fmt_money(m.allocation.lh2_net),
                ));
            }
            let t = projection.totals();
            rows.push(format!(
                "{:<5} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                "Total",
                "",
                fmt_money(t.programmatic_revenue),
                fmt_money(t.syndication_revenue),
                fmt_money(t.video_revenue),
                fmt_money(t.revenue),
                fmt_money(t.cost),
                "",
                "",
                fmt_money(t.lh2_revenue),
                fmt_money(t.lh2_cost),
                fmt_money(t.lh2_net),
            ));
        }
        Category::Discover => {
            rows.push(format!(
                "{:<5} {:>8} {:>6} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                "month", "traffic", "rpm", "revenue", "cost", "growth", "share", "lh2_rev", "lh2_cost",
                "lh2_net"
            ));
            for m in &projection.months {
                let MonthDrivers::Discover(d) = &m.drivers else { continue };
                rows.push(format!(
                    "{:<5} {:>8} {:>6} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                    m.month.label(),
                    fmt_count(d.traffic),
                    format!("{:.2}", d.effective_rpm),
                    fmt_money(m.total_revenue),
                    fmt_money(m.total_cost),
                    format!("{:.2}x", m.allocation.growth_multiple),
                    format!("{:.0}%", m.allocation.share * 100.0),
                    fmt_money(m.allocation.lh2_revenue),
                    fmt_money(m.allocation.lh2_cost),
                    fmt_money(m.allocation.lh2_net),
                ));
            }
            let t = projection.totals();
            rows.push(format!(
                "{:<5} {:>8} {:>6} {:>9} {:>9} {:>6} {:>5} {:>9} {:>9} {:>9}",
                "Total",
                "",
                "",
                fmt_money(t.revenue),
                fmt_money(t.cost),
                "",
                "",
                fmt_money(t.lh2_revenue),
                fmt_money(t.lh2_cost),
                fmt_money(t.lh2_net),
            ));
        }
    }

    for row in rows {
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

/// Monthly hiring deltas per role, with net hires over the horizon.
pub fn format_hiring(plan: &HiringPlan) -> String {
    let mut rows = vec![header_row("Hiring plan"), rule_row()];
    for role in Role::ALL {
        rows.push(series_row(role.display_name(), plan.deltas(role), plan.role_total(role), fmt_delta));
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn fmt_delta(v: f64) -> String {
    if v == 0.0 {
        "-".to_string()
    } else {
        format!("{v:+}")
    }
}

/// One line per finding, errors first.
pub fn format_issues(issues: &[PlanIssue]) -> String {
    if issues.is_empty() {
        return "No issues found.\n".to_string();
    }
    let mut sorted: Vec<&PlanIssue> = issues.iter().collect();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut out = String::new();
    for issue in sorted {
        let tag = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &issue.brand {
            Some(brand) => out.push_str(&format!("[{tag}] {brand}: {}\n", issue.message)),
            None => out.push_str(&format!("[{tag}] {}\n", issue.message)),
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
