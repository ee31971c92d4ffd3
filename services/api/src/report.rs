use chrono::{Local, NaiveDate};
use clap::Args;
use fleet_upkeep::config::AppConfig;
use fleet_upkeep::error::AppError;
use fleet_upkeep::maintenance::{
    evaluate_fleet, FactKind, FleetCsvImporter, FleetUrgencySummary, VehicleUrgencyView,
};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct FleetRankArgs {
    /// Vehicle CSV export (defaults to FLEET_CSV)
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Fact to rank by: inspection, tires, insurance or service (defaults to FLEET_DEFAULT_SORT)
    #[arg(long, value_parser = crate::infra::parse_sort_key)]
    pub(crate) sort: Option<FactKind>,
    /// Evaluation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print per-level counts and the vehicles that need attention
    #[arg(long)]
    pub(crate) summary: bool,
}

pub(crate) fn run_fleet_rank(args: FleetRankArgs) -> Result<(), AppError> {
    let FleetRankArgs {
        csv,
        sort,
        today,
        summary,
    } = args;

    let config = AppConfig::load()?;
    let path = csv
        .or(config.fleet.csv_path)
        .ok_or(AppError::FleetSourceMissing)?;
    let sort = sort.unwrap_or(config.fleet.default_sort);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let vehicles = FleetCsvImporter::from_path(&path)?;
    let ranked = evaluate_fleet(&vehicles, today, sort)?;
    let views = VehicleUrgencyView::from_ranked(&ranked, sort);
    let fleet_summary = summary.then(|| FleetUrgencySummary::from_bundles(&ranked, sort));

    print!(
        "{}",
        render_fleet_ranking(&views, fleet_summary.as_ref(), sort, today)
    );
    Ok(())
}

pub(crate) fn render_fleet_ranking(
    views: &[VehicleUrgencyView],
    summary: Option<&FleetUrgencySummary>,
    sort: FactKind,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Fleet maintenance urgency");
    let _ = writeln!(out, "Ranked by {} (evaluated {})", sort.label(), today);

    if views.is_empty() {
        let _ = writeln!(out, "\nNo vehicles in export");
    } else {
        let _ = writeln!(out);
        for view in views {
            let _ = writeln!(
                out,
                "{:>3}. {} [{}] {}: {} | most urgent: {} {} ({})",
                view.rank,
                view.title,
                view.ranked_by.level_label,
                view.ranked_by.kind_label,
                view.ranked_by.label,
                view.most_urgent.kind_label,
                view.most_urgent.level_label,
                view.most_urgent.label
            );
        }
    }

    if let Some(summary) = summary {
        let _ = writeln!(out, "\nVehicles per level ({})", sort.label());
        for entry in &summary.by_level {
            let _ = writeln!(out, "- {}: {}", entry.level_label, entry.vehicles);
        }
        let _ = writeln!(out, "Untracked facts: {}", summary.untracked_facts);

        if summary.attention.is_empty() {
            let _ = writeln!(out, "\nNeeds attention: none");
        } else {
            let _ = writeln!(out, "\nNeeds attention");
            for entry in &summary.attention {
                let _ = writeln!(
                    out,
                    "- {}: {} {}",
                    entry.title, entry.kind_label, entry.label
                );
            }
        }
    }

    out
}
