//! Maintenance urgency: classify per-vehicle facts, pick the most urgent one,
//! and rank the fleet by a chosen fact.

mod classifier;
pub mod domain;
pub mod import;
mod ranking;
pub mod summary;

pub use classifier::{classify_by_date, classify_by_datetime, classify_by_mileage};
pub use domain::{
    FactKind, SeverityToken, UrgencyError, UrgencyLevel, UrgencyResult, VehicleRecord,
};
pub use import::{FleetCsvImporter, FleetImportError};
pub use ranking::{
    evaluate_fleet, most_urgent_kind, rank_vehicles, select_most_urgent, VehicleUrgencyBundle,
};
pub use summary::{FleetUrgencySummary, UrgencyResultView, VehicleUrgencyView};
