//! Export per-brand monthly projections to CSV.
//!
//! One row per brand-month, so the file pivots cleanly in a spreadsheet.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AppError;
use crate::projection::{BrandProjection, MonthDrivers};

const HEADER: &str = "brand,category,month,seasonality,traffic,articles,programmatic_revenue,syndication_revenue,video_revenue,total_revenue,total_cost,mode,growth_multiple,lh2_share,lh2_revenue,lh2_cost,lh2_net";

/// Write every brand-month of `projections` to `path`.
pub fn write_projection_csv(path: &Path, projections: &[BrandProjection]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    write_projection_rows(&mut out, projections)
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV '{}': {e}", path.display())))
}

pub fn write_projection_rows<W: Write>(out: &mut W, projections: &[BrandProjection]) -> std::io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for p in projections {
        let name = csv_field(&p.name);
        let category = p.category.display_name().to_lowercase();
        for m in &p.months {
            let (traffic, articles, prog, synd, video) = match &m.drivers {
                MonthDrivers::Syndication(d) => (
                    String::new(),
                    format!("{:.4}", d.articles),
                    format!("{:.4}", d.programmatic_revenue),
                    format!("{:.4}", d.syndication_revenue),
                    format!("{:.4}", d.video_revenue),
                ),
                MonthDrivers::Discover(d) => (
                    format!("{:.4}", d.traffic),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ),
            };
            let a = &m.allocation;
            writeln!(
                out,
                "{name},{category},{},{:.4},{traffic},{articles},{prog},{synd},{video},{:.4},{:.4},{},{:.6},{:.4},{:.4},{:.4},{:.4}",
                m.month.label(),
                m.seasonality,
                m.total_revenue,
                m.total_cost,
                a.mode.label(),
                a.growth_multiple,
                a.share,
                a.lh2_revenue,
                a.lh2_cost,
                a.lh2_net,
            )?;
        }
    }
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
