use chrono::{Duration, NaiveDate};
use fleet_upkeep::maintenance::{
    classify_by_date, classify_by_mileage, evaluate_fleet, rank_vehicles, select_most_urgent,
    FactKind, FleetCsvImporter, FleetUrgencySummary, UrgencyLevel, UrgencyResult, VehicleRecord,
    VehicleUrgencyBundle,
};
use std::io::Cursor;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid evaluation date")
}

fn vehicle_with_inspection(id: &str, days_out: i64) -> VehicleRecord {
    let mut vehicle = VehicleRecord::new(id);
    vehicle.inspection_expiry = Some(today() + Duration::days(days_out));
    vehicle
}

#[test]
fn date_scenarios_match_expected_levels() {
    let expired = classify_by_date(Some(today() - Duration::days(5)), today());
    assert_eq!((expired.level, expired.remaining), (UrgencyLevel::Expired, -5));

    let critical = classify_by_date(Some(today() + Duration::days(3)), today());
    assert_eq!((critical.level, critical.remaining), (UrgencyLevel::Critical, 3));

    let soon = classify_by_date(Some(today() + Duration::days(45)), today());
    assert_eq!((soon.level, soon.remaining), (UrgencyLevel::Soon, 45));
}

#[test]
fn missing_dates_are_ok_for_any_evaluation_day() {
    for offset in [-3650, -1, 0, 1, 3650] {
        let day = today() + Duration::days(offset);
        let result = classify_by_date(None, day);
        assert_eq!(result.level, UrgencyLevel::Ok);
        assert_eq!(result.remaining, UrgencyResult::NOT_TRACKED_REMAINING);
    }
}

#[test]
fn same_day_is_expired_for_dates_but_mileage_has_no_today_case() {
    let date = classify_by_date(Some(today()), today());
    assert_eq!(date.level, UrgencyLevel::Expired);
    assert!(date.label.contains("today"));

    let mileage = classify_by_mileage(100, Some(100)).expect("valid mileage");
    assert_eq!(mileage.level, UrgencyLevel::Expired);
    assert_eq!(mileage.remaining, 0);
    assert!(!mileage.label.contains("today"));

    let warning = classify_by_mileage(49_000, Some(50_000)).expect("valid mileage");
    assert_eq!((warning.level, warning.remaining), (UrgencyLevel::Warning, 1_000));
}

#[test]
fn expired_inspection_is_most_urgent_in_bundle() {
    let mut vehicle = VehicleRecord::new("van-12");
    vehicle.inspection_expiry = Some(today() - Duration::days(2));
    vehicle.insurance_expiry = Some(today() + Duration::days(10));
    vehicle.current_mileage = 20_000;

    let bundle = VehicleUrgencyBundle::evaluate(&vehicle, today()).expect("bundle evaluates");

    assert_eq!(bundle.inspection.level, UrgencyLevel::Expired);
    assert_eq!(bundle.tires.level, UrgencyLevel::Ok);
    assert_eq!(bundle.insurance.level, UrgencyLevel::Warning);
    assert_eq!(bundle.service.level, UrgencyLevel::Ok);
    assert_eq!(bundle.most_urgent_kind, FactKind::Inspection);
    assert_eq!(bundle.most_urgent, bundle.inspection);

    let results = [
        bundle.inspection.clone(),
        bundle.tires.clone(),
        bundle.insurance.clone(),
        bundle.service.clone(),
    ];
    assert_eq!(select_most_urgent(&results), &bundle.inspection);
}

#[test]
fn fewer_remaining_days_rank_first_within_a_level() {
    let vehicles = vec![
        vehicle_with_inspection("five-days", 5),
        vehicle_with_inspection("two-days", 2),
    ];

    let ranked = evaluate_fleet(&vehicles, today(), FactKind::Inspection).expect("fleet ranks");

    let ids: Vec<_> = ranked.iter().map(|bundle| bundle.vehicle_id()).collect();
    assert_eq!(ids, vec!["two-days", "five-days"]);
    assert!(ranked
        .iter()
        .all(|bundle| bundle.inspection.level == UrgencyLevel::Critical));
}

#[test]
fn ranking_preserves_length_order_and_input() {
    let vehicles = vec![
        vehicle_with_inspection("ok", 120),
        vehicle_with_inspection("tie-a", 14),
        VehicleRecord::new("untracked"),
        vehicle_with_inspection("expired", -9),
        vehicle_with_inspection("tie-b", 14),
        vehicle_with_inspection("today", 0),
    ];
    let bundles: Vec<_> = vehicles
        .iter()
        .map(|vehicle| VehicleUrgencyBundle::evaluate(vehicle, today()).expect("evaluates"))
        .collect();

    let ranked = rank_vehicles(&bundles, FactKind::Inspection);
    let ids: Vec<_> = ranked.iter().map(|bundle| bundle.vehicle_id()).collect();
    assert_eq!(
        ids,
        vec!["expired", "today", "tie-a", "tie-b", "ok", "untracked"]
    );

    assert_eq!(ranked.len(), bundles.len());
    assert_eq!(bundles[0].vehicle_id(), "ok");
    assert_eq!(rank_vehicles(&bundles, FactKind::Inspection), ranked);
    assert!(rank_vehicles(&[], FactKind::Service).is_empty());
}

#[test]
fn csv_export_flows_through_ranking_and_summary() {
    let csv = "Vehicle ID,Plate,Name,Inspection Expiry,Tires Change Date,Insurance Expiry,Current Mileage,Service Due Mileage\n\
veh-1,B-FL 101,Transit,2026-03-01,2025-10-20,2026-01-01,61200,60000\n\
veh-2,B-FL 102,Vito,2025-09-30,,2025-12-01,15000,30000\n\
veh-3,B-FL 103,Caddy,,,,8000,\n";

    let vehicles = FleetCsvImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
    let ranked = evaluate_fleet(&vehicles, today(), FactKind::Service).expect("fleet ranks");

    let ids: Vec<_> = ranked.iter().map(|bundle| bundle.vehicle_id()).collect();
    assert_eq!(ids, vec!["veh-1", "veh-2", "veh-3"]);
    assert_eq!(ranked[0].service.remaining, -1_200);

    let summary = FleetUrgencySummary::from_bundles(&ranked, FactKind::Service);
    assert_eq!(summary.total_vehicles, 3);
    let attention: Vec<_> = summary
        .attention
        .iter()
        .map(|entry| (entry.vehicle_id.as_str(), entry.kind))
        .collect();
    assert_eq!(
        attention,
        vec![("veh-1", FactKind::Service), ("veh-2", FactKind::Inspection)]
    );
}
