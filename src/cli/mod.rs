//! Command-line parsing for the AOP projection tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! projection engine and from command dispatch (`app`).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{DiscoverDraft, SyndicationDraft, custom_slabs};
use crate::domain::{Month, Overhead, RevShareSlab};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "aop", version, about = "LH2 annual operating plan projections")]
pub struct Cli {
    /// Local state file (overrides AOP_STATE_FILE).
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Dashboard server base URL (overrides AOP_REMOTE_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the portfolio P&L for the plan horizon.
    Summary {
        /// Expand category rows into per-brand rows.
        #[arg(long)]
        drill: bool,
    },
    /// Print one brand's monthly projection.
    Brand {
        /// Brand name, as stored.
        name: String,
    },
    /// Export every brand-month to CSV.
    Export {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Check the plan for misconfigured schedules, headcount, or seasonality.
    Validate,
    /// Restore the default portfolio.
    Reset,
    /// Add (or replace) a syndication brand, then save.
    AddSyndication(SyndicationArgs),
    /// Add (or replace) a discover brand, then save.
    AddDiscover(DiscoverArgs),
    /// Change the fixed monthly overhead, then save.
    SetOverhead(OverheadArgs),
    /// Set one month's RPM seasonality multiplier, then save.
    SetSeasonality {
        #[arg(value_enum)]
        month: Month,
        /// Multiplier on RPM-driven revenue; 0 resets the month to 1.
        factor: f64,
    },
}

/// Overhead lines to change; omitted lines keep their stored value.
#[derive(Debug, Args, Clone)]
pub struct OverheadArgs {
    #[arg(long)]
    pub salary: Option<f64>,
    #[arg(long)]
    pub tech: Option<f64>,
    #[arg(long)]
    pub admin: Option<f64>,
}

impl OverheadArgs {
    pub fn apply(&self, mut overhead: Overhead) -> Overhead {
        set(&mut overhead.salary, self.salary);
        set(&mut overhead.tech, self.tech);
        set(&mut overhead.admin, self.admin);
        overhead
    }
}

/// Revenue-share options shared by both brand kinds.
#[derive(Debug, Args, Clone)]
pub struct ShareArgs {
    /// Pre-partnership monthly revenue (0 with base costs 0 selects auto mode).
    #[arg(long)]
    pub base_revenue: Option<f64>,

    /// Pre-partnership monthly cost.
    #[arg(long)]
    pub base_costs: Option<f64>,

    /// Revenue-share tier as THRESHOLD:SHARE, in ascending order; use `inf` for
    /// the last tier. Repeat for each tier. Defaults to the standard schedule.
    #[arg(long = "slab", value_name = "THRESHOLD:SHARE", value_parser = parse_slab)]
    pub slabs: Vec<RevShareSlab>,

    /// Success probability in percent.
    #[arg(long)]
    pub success_probability: Option<f64>,

    /// Baseline revenue recorded for reference.
    #[arg(long)]
    pub baseline_revenue: Option<f64>,

    /// Baseline cost recorded for reference.
    #[arg(long)]
    pub baseline_cost: Option<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct SyndicationArgs {
    pub name: String,

    #[arg(long)]
    pub authors: Option<f64>,
    #[arg(long)]
    pub editors: Option<f64>,
    #[arg(long)]
    pub articles_per_author_per_day: Option<f64>,

    #[arg(long)]
    pub author_salary: Option<f64>,
    #[arg(long)]
    pub editor_salary: Option<f64>,
    #[arg(long)]
    pub video_editor_salary: Option<f64>,
    /// Indirect cost uplift on salaries, in percent.
    #[arg(long)]
    pub indirect_costs_pct: Option<f64>,

    #[arg(long)]
    pub sessions_per_article: Option<f64>,
    #[arg(long)]
    pub programmatic_rpm: Option<f64>,
    #[arg(long)]
    pub views_per_article: Option<f64>,
    #[arg(long)]
    pub blended_rpm: Option<f64>,

    #[arg(long)]
    pub video_editors: Option<f64>,
    #[arg(long)]
    pub videos_per_editor_per_day: Option<f64>,
    #[arg(long)]
    pub views_per_video: Option<f64>,
    #[arg(long)]
    pub video_rpm: Option<f64>,

    #[command(flatten)]
    pub share: ShareArgs,
}

#[derive(Debug, Args, Clone)]
pub struct DiscoverArgs {
    pub name: String,

    /// Monthly visits before growth.
    #[arg(long)]
    pub base_traffic: Option<f64>,
    /// Traffic recorded on the baseline (defaults to base traffic).
    #[arg(long)]
    pub current_traffic: Option<f64>,
    #[arg(long)]
    pub base_rpm: Option<f64>,
    /// RPM multiplier once the transition month is reached.
    #[arg(long)]
    pub rpm_uplift: Option<f64>,
    #[arg(long, value_enum)]
    pub transition_month: Option<Month>,
    /// Monthly operating cost.
    #[arg(long)]
    pub base_cost: Option<f64>,

    #[command(flatten)]
    pub share: ShareArgs,
}

/// Parse `THRESHOLD:SHARE`, e.g. `1.3:0`, `2:0.2`, `inf:0.5`.
pub fn parse_slab(raw: &str) -> Result<RevShareSlab, String> {
    let (threshold, share) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected THRESHOLD:SHARE, got '{raw}'"))?;
    let share: f64 = share
        .trim()
        .parse()
        .map_err(|_| format!("invalid share '{share}'"))?;
    match threshold.trim().to_ascii_lowercase().as_str() {
        "inf" | "infinity" | "max" => Ok(RevShareSlab::unbounded(share)),
        t => {
            let bound: f64 = t.parse().map_err(|_| format!("invalid threshold '{threshold}'"))?;
            if !bound.is_finite() {
                return Err(format!("invalid threshold '{threshold}'"));
            }
            Ok(RevShareSlab::up_to(bound, share))
        }
    }
}

fn set(target: &mut f64, value: Option<f64>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl SyndicationArgs {
    pub fn into_draft(self) -> SyndicationDraft {
        let mut d = SyndicationDraft::new(self.name);
        let c = &mut d.config;
        set(&mut c.staffing.authors, self.authors);
        set(&mut c.staffing.editors, self.editors);
        set(&mut c.staffing.articles_per_author_per_day, self.articles_per_author_per_day);
        set(&mut c.salaries.author_salary, self.author_salary);
        set(&mut c.salaries.editor_salary, self.editor_salary);
        set(&mut c.salaries.video_editor_salary, self.video_editor_salary);
        set(&mut c.indirect_costs_pct, self.indirect_costs_pct);
        set(&mut c.programmatic.sessions_per_article, self.sessions_per_article);
        set(&mut c.programmatic.rpm, self.programmatic_rpm);
        set(&mut c.syndication.views_per_article, self.views_per_article);
        set(&mut c.syndication.blended_rpm, self.blended_rpm);
        set(&mut c.video.video_editors, self.video_editors);
        set(&mut c.video.videos_per_editor_per_day, self.videos_per_editor_per_day);
        set(&mut c.video.views_per_video, self.views_per_video);
        set(&mut c.video.rpm, self.video_rpm);
        set(&mut c.base_revenue, self.share.base_revenue);
        set(&mut c.base_costs, self.share.base_costs);
        set(&mut c.success_probability, self.share.success_probability);
        c.slabs = custom_slabs(self.share.slabs);
        set(&mut d.baseline_revenue, self.share.baseline_revenue);
        set(&mut d.baseline_cost, self.share.baseline_cost);
        d
    }
}

impl DiscoverArgs {
    pub fn into_draft(self) -> DiscoverDraft {
        let mut d = DiscoverDraft::new(self.name);
        let c = &mut d.config;
        set(&mut c.base_traffic, self.base_traffic);
        set(&mut c.base_rpm, self.base_rpm);
        set(&mut c.rpm_uplift, self.rpm_uplift);
        if let Some(month) = self.transition_month {
            c.transition_month = month;
        }
        set(&mut c.base_cost, self.base_cost);
        set(&mut c.base_revenue, self.share.base_revenue);
        set(&mut c.base_costs, self.share.base_costs);
        set(&mut c.success_probability, self.share.success_probability);
        c.slabs = custom_slabs(self.share.slabs);
        d.current_traffic = self.current_traffic.unwrap_or(d.config.base_traffic);
        set(&mut d.baseline_revenue, self.share.baseline_revenue);
        set(&mut d.baseline_cost, self.share.baseline_cost);
        d
    }
}
