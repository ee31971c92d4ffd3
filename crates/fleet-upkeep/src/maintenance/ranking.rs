use super::classifier::{classify_by_date, classify_by_mileage};
use super::domain::{FactKind, UrgencyError, UrgencyResult, VehicleRecord};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, instrument};

/// The four classified facts of one vehicle plus the one that matters most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleUrgencyBundle {
    pub vehicle: VehicleRecord,
    pub inspection: UrgencyResult,
    pub tires: UrgencyResult,
    pub insurance: UrgencyResult,
    pub service: UrgencyResult,
    pub most_urgent_kind: FactKind,
    pub most_urgent: UrgencyResult,
}

impl VehicleUrgencyBundle {
    /// Classifies every fact of `vehicle` against `today`.
    pub fn evaluate(vehicle: &VehicleRecord, today: NaiveDate) -> Result<Self, UrgencyError> {
        let results = [
            classify_by_date(vehicle.inspection_expiry, today),
            classify_by_date(vehicle.tires_change_date, today),
            classify_by_date(vehicle.insurance_expiry, today),
            classify_by_mileage(vehicle.current_mileage, vehicle.service_due_mileage)?,
        ];

        let most_urgent_kind = most_urgent_kind(&results);
        let most_urgent = results[most_urgent_kind.index()].clone();
        let [inspection, tires, insurance, service] = results;

        Ok(Self {
            vehicle: vehicle.clone(),
            inspection,
            tires,
            insurance,
            service,
            most_urgent_kind,
            most_urgent,
        })
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle.vehicle_id
    }

    pub fn result_for(&self, kind: FactKind) -> &UrgencyResult {
        match kind {
            FactKind::Inspection => &self.inspection,
            FactKind::Tires => &self.tires,
            FactKind::Insurance => &self.insurance,
            FactKind::Service => &self.service,
        }
    }

    /// Facts paired with their kind, in evaluation order.
    pub fn results(&self) -> [(FactKind, &UrgencyResult); 4] {
        FactKind::ordered().map(|kind| (kind, self.result_for(kind)))
    }
}

/// Picks the most urgent of the four results, given in `FactKind::ordered()` order.
///
/// A later result only replaces the current best when it has a strictly lower
/// priority, or the same priority and strictly fewer remaining units, so exact
/// ties resolve to the earliest fact.
pub fn select_most_urgent(results: &[UrgencyResult; 4]) -> &UrgencyResult {
    &results[most_urgent_kind(results).index()]
}

/// Kind of the result [`select_most_urgent`] would return.
pub fn most_urgent_kind(results: &[UrgencyResult; 4]) -> FactKind {
    let kinds = FactKind::ordered();
    let mut best = kinds[0];

    for kind in kinds.into_iter().skip(1) {
        if results[kind.index()].is_more_urgent_than(&results[best.index()]) {
            best = kind;
        }
    }

    best
}

/// Orders bundles by the fact named in `sort_key`: level first, then remaining.
///
/// Uses a stable sort, so vehicles that tie on both keys keep their input order.
pub fn rank_vehicles(
    bundles: &[VehicleUrgencyBundle],
    sort_key: FactKind,
) -> Vec<VehicleUrgencyBundle> {
    let mut ranked = bundles.to_vec();
    ranked.sort_by(|a, b| {
        let (a, b) = (a.result_for(sort_key), b.result_for(sort_key));
        a.level
            .priority()
            .cmp(&b.level.priority())
            .then(a.remaining.cmp(&b.remaining))
    });
    ranked
}

/// Classify, select and rank a whole fleet in one pass.
#[instrument(skip(vehicles), fields(fleet_size = vehicles.len()))]
pub fn evaluate_fleet(
    vehicles: &[VehicleRecord],
    today: NaiveDate,
    sort_key: FactKind,
) -> Result<Vec<VehicleUrgencyBundle>, UrgencyError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    if today < epoch {
        return Err(UrgencyError::TodayBeforeEpoch { today });
    }

    let bundles = vehicles
        .iter()
        .map(|vehicle| VehicleUrgencyBundle::evaluate(vehicle, today))
        .collect::<Result<Vec<_>, _>>()?;

    let ranked = rank_vehicles(&bundles, sort_key);
    debug!(
        attention = ranked
            .iter()
            .filter(|bundle| bundle.most_urgent.level.needs_attention())
            .count(),
        "fleet urgency evaluated"
    );

    Ok(ranked)
}
