//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and settings
//! - opens the state store
//! - runs projections and prints reports
//! - applies plan edits and saves them

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, OverheadArgs};
use crate::config::{Settings, parse_remote_url};
use crate::domain::{Brand, BrandModel, Category, Month, has_errors};
use crate::error::AppError;
use crate::io::{StateStore, open_store};

pub mod pipeline;

/// Entry point for the `aop` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = settings_with_overrides(Settings::from_env()?, &cli)?;
    init_tracing(&settings.log_filter);

    let store = open_store(&settings)?;

    match cli.command {
        Command::Summary { drill } => handle_summary(store.as_ref(), drill),
        Command::Brand { name } => handle_brand(store.as_ref(), &name),
        Command::Export { path } => handle_export(store.as_ref(), &path),
        Command::Validate => handle_validate(store.as_ref()),
        Command::Reset => handle_reset(store.as_ref()),
        Command::AddSyndication(args) => {
            let brand = args.into_draft().into_brand()?;
            handle_add(store.as_ref(), &settings, brand)
        }
        Command::AddDiscover(args) => {
            let brand = args.into_draft().into_brand()?;
            handle_add(store.as_ref(), &settings, brand)
        }
        Command::SetOverhead(args) => handle_set_overhead(store.as_ref(), &settings, &args),
        Command::SetSeasonality { month, factor } => {
            handle_set_seasonality(store.as_ref(), &settings, month, factor)
        }
    }
}

/// CLI flags win over the environment.
pub fn settings_with_overrides(mut settings: Settings, cli: &Cli) -> Result<Settings, AppError> {
    if let Some(path) = &cli.state {
        settings.state_file = path.clone();
        // An explicit file means the local store, even if a remote is configured.
        settings.remote_url = None;
    }
    if let Some(url) = &cli.remote {
        settings.remote_url = Some(parse_remote_url(url)?);
    }
    Ok(settings)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    // Keep the first subscriber if one is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_summary(store: &dyn StateStore, drill: bool) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let out = pipeline::run_projection(&plan);
    print!("{}", crate::report::format_summary(&out.rollup, drill));
    if !out.issues.is_empty() {
        eprintln!(
            "\n{} plan issue(s); run `aop validate` for details.",
            out.issues.len()
        );
    }
    Ok(())
}

fn handle_brand(store: &dyn StateStore, name: &str) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let brand = plan
        .brand(name)
        .ok_or_else(|| AppError::invalid_input(format!("Unknown brand '{name}'.")))?;
    let projection = crate::projection::project_brand(brand, &plan.seasonality);
    print!("{}", crate::report::format_brand(&projection));
    if let BrandModel::Syndication { hiring, .. } = &brand.model {
        println!();
        print!("{}", crate::report::format_hiring(hiring));
    }
    Ok(())
}

fn handle_export(store: &dyn StateStore, path: &std::path::Path) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let out = pipeline::run_projection(&plan);
    crate::io::write_projection_csv(path, &out.projections)?;
    println!(
        "Wrote {} brand-months to {}",
        out.projections.iter().map(|p| p.months.len()).sum::<usize>(),
        path.display()
    );
    Ok(())
}

fn handle_validate(store: &dyn StateStore) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let issues = crate::domain::validate_plan(&plan);
    print!("{}", crate::report::format_issues(&issues));
    if has_errors(&issues) {
        return Err(AppError::new(
            AppError::VALIDATION,
            "Plan validation failed.",
        ));
    }
    Ok(())
}

fn handle_reset(store: &dyn StateStore) -> Result<(), AppError> {
    let plan = store.reset()?.into_plan();
    println!(
        "Reset {} to the default portfolio ({} syndication, {} discover brands).",
        store.location(),
        plan.brands_in(Category::Syndication).count(),
        plan.brands_in(Category::Discover).count()
    );
    Ok(())
}

fn handle_add(store: &dyn StateStore, settings: &Settings, brand: Brand) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let name = brand.name.clone();
    let category = brand.category();
    let replacing = plan
        .brands_in(category)
        .any(|b| b.name == name);

    let issues = crate::domain::validate_brand(&brand);
    if has_errors(&issues) {
        eprint!("{}", crate::report::format_issues(&issues));
        return Err(AppError::invalid_input(format!(
            "Brand '{name}' has an invalid revenue-share schedule."
        )));
    }

    let plan = plan.with_brand(brand);
    pipeline::save_plan(store, &plan, &settings.updated_by)?;
    let verb = if replacing { "Replaced" } else { "Added" };
    println!(
        "{verb} {} brand '{name}' ({} brands in plan).",
        category.display_name().to_lowercase(),
        plan.brands.len()
    );
    Ok(())
}

fn handle_set_overhead(store: &dyn StateStore, settings: &Settings, args: &OverheadArgs) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let overhead = args.apply(plan.overhead);
    let plan = plan.with_overhead(overhead);
    pipeline::save_plan(store, &plan, &settings.updated_by)?;
    println!(
        "Overhead set to {} per month.",
        crate::report::fmt_money(overhead.monthly_total())
    );
    Ok(())
}

fn handle_set_seasonality(
    store: &dyn StateStore,
    settings: &Settings,
    month: Month,
    factor: f64,
) -> Result<(), AppError> {
    let plan = pipeline::load_plan(store)?;
    let seasonality = plan.seasonality.with_factor(month, factor);
    let plan = plan.with_seasonality(seasonality);
    pipeline::save_plan(store, &plan, &settings.updated_by)?;
    println!(
        "{} seasonality set to {:.2}.",
        month.label(),
        plan.seasonality.factor(month)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn state_flag_forces_local_store() {
        let mut settings = Settings::default();
        settings.remote_url = Some("http://h:3001".to_string());
        let cli = Cli::parse_from(["aop", "--state", "plan.json", "validate"]);
        let s = settings_with_overrides(settings, &cli).unwrap();
        assert_eq!(s.state_file, PathBuf::from("plan.json"));
        assert_eq!(s.remote_url, None);
    }

    #[test]
    fn remote_flag_is_validated() {
        let cli = Cli::parse_from(["aop", "--remote", "ftp://h", "summary"]);
        let err = settings_with_overrides(Settings::default(), &cli).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INVALID_INPUT);
    }

    #[test]
    fn add_then_replace_brand_in_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::io::FileStore::new(dir.path().join("state.json"));
        let settings = Settings::default();

        let brand = crate::data::DiscoverDraft::new("Fresh").into_brand().unwrap();
        handle_add(&store, &settings, brand.clone()).unwrap();
        handle_add(&store, &settings, brand).unwrap();

        let plan = pipeline::load_plan(&store).unwrap();
        assert_eq!(plan.brands.len(), 18);
        assert_eq!(plan.brands.last().map(|b| b.name.as_str()), Some("Fresh"));
        assert_eq!(plan.updated_by.as_deref(), Some("cli"));
    }

    #[test]
    fn overhead_and_seasonality_edits_are_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::io::FileStore::new(dir.path().join("state.json"));
        let settings = Settings::default();

        let args = OverheadArgs {
            salary: Some(50_000.0),
            tech: None,
            admin: Some(0.0),
        };
        handle_set_overhead(&store, &settings, &args).unwrap();
        handle_set_seasonality(&store, &settings, Month::Dec, 1.4).unwrap();
        handle_set_seasonality(&store, &settings, Month::Nov, 0.0).unwrap();

        let plan = pipeline::load_plan(&store).unwrap();
        assert_eq!(plan.overhead.monthly_total(), 54_855.0);
        assert_eq!(plan.seasonality.factor(Month::Dec), 1.4);
        assert_eq!(plan.seasonality.factor(Month::Nov), 1.0);
        assert_eq!(plan.brands.len(), 17);
    }

    #[test]
    fn invalid_schedule_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = crate::io::FileStore::new(&path);
        let mut draft = crate::data::SyndicationDraft::new("Bad");
        draft.config.slabs = vec![crate::domain::RevShareSlab::up_to(2.0, 0.2)];
        let err = handle_add(&store, &Settings::default(), draft.into_brand().unwrap()).unwrap_err();
        assert_eq!(err.exit_code(), AppError::INVALID_INPUT);
        assert!(!path.exists());
    }

    #[test]
    fn validate_reports_errors_with_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"syndConfigs":{},"discConfigs":{"D":{"revShareSlabs":[{"threshold":2,"lh2Share":0.2}]}}}"#,
        )
        .unwrap();
        let err = handle_validate(&crate::io::FileStore::new(&path)).unwrap_err();
        assert_eq!(err.exit_code(), AppError::VALIDATION);
        assert!(handle_validate(&crate::io::FileStore::new(dir.path().join("none.json"))).is_ok());
    }
}
