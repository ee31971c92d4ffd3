use super::domain::{FactKind, SeverityToken, UrgencyLevel, UrgencyResult};
use super::ranking::VehicleUrgencyBundle;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
pub struct UrgencyResultView {
    pub kind: FactKind,
    pub kind_label: &'static str,
    pub level: UrgencyLevel,
    pub level_label: &'static str,
    /// `None` when the fact is not tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    pub label: String,
    pub severity: SeverityToken,
}

impl UrgencyResultView {
    pub fn new(kind: FactKind, result: &UrgencyResult) -> Self {
        Self {
            kind,
            kind_label: kind.label(),
            level: result.level,
            level_label: result.level.label(),
            remaining: result.is_tracked().then_some(result.remaining),
            label: result.label.clone(),
            severity: result.severity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleUrgencyView {
    pub rank: usize,
    pub vehicle_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    pub ranked_by: UrgencyResultView,
    pub most_urgent: UrgencyResultView,
    pub facts: Vec<UrgencyResultView>,
}

impl VehicleUrgencyView {
    /// `rank` is 1-based.
    pub fn new(rank: usize, bundle: &VehicleUrgencyBundle, sort_key: FactKind) -> Self {
        Self {
            rank,
            vehicle_id: bundle.vehicle.vehicle_id.clone(),
            title: bundle.vehicle.title().to_string(),
            plate: bundle.vehicle.plate.clone(),
            ranked_by: UrgencyResultView::new(sort_key, bundle.result_for(sort_key)),
            most_urgent: UrgencyResultView::new(bundle.most_urgent_kind, &bundle.most_urgent),
            facts: bundle
                .results()
                .into_iter()
                .map(|(kind, result)| UrgencyResultView::new(kind, result))
                .collect(),
        }
    }

    pub fn from_ranked(bundles: &[VehicleUrgencyBundle], sort_key: FactKind) -> Vec<Self> {
        bundles
            .iter()
            .enumerate()
            .map(|(index, bundle)| Self::new(index + 1, bundle, sort_key))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LevelCountEntry {
    pub level: UrgencyLevel,
    pub level_label: &'static str,
    pub vehicles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttentionEntry {
    pub vehicle_id: String,
    pub title: String,
    pub kind: FactKind,
    pub kind_label: &'static str,
    pub level: UrgencyLevel,
    pub label: String,
}

/// Fleet-wide counts and the list of vehicles that need action.
#[derive(Debug, Clone, Serialize)]
pub struct FleetUrgencySummary {
    pub sort_key: FactKind,
    pub total_vehicles: usize,
    /// Per-level vehicle counts for the ranked fact, expired first.
    pub by_level: Vec<LevelCountEntry>,
    /// Per-level vehicle counts for each vehicle's most urgent fact.
    pub most_urgent_by_level: Vec<LevelCountEntry>,
    pub untracked_facts: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attention: Vec<AttentionEntry>,
}

impl FleetUrgencySummary {
    pub fn from_bundles(bundles: &[VehicleUrgencyBundle], sort_key: FactKind) -> Self {
        let mut by_level: HashMap<UrgencyLevel, usize> = HashMap::new();
        let mut most_urgent_by_level: HashMap<UrgencyLevel, usize> = HashMap::new();
        let mut untracked_facts = 0;
        let mut attention = Vec::new();

        for bundle in bundles {
            *by_level
                .entry(bundle.result_for(sort_key).level)
                .or_default() += 1;
            *most_urgent_by_level
                .entry(bundle.most_urgent.level)
                .or_default() += 1;

            untracked_facts += bundle
                .results()
                .iter()
                .filter(|(_, result)| !result.is_tracked())
                .count();

            if bundle.most_urgent.level.needs_attention() {
                attention.push(AttentionEntry {
                    vehicle_id: bundle.vehicle.vehicle_id.clone(),
                    title: bundle.vehicle.title().to_string(),
                    kind: bundle.most_urgent_kind,
                    kind_label: bundle.most_urgent_kind.label(),
                    level: bundle.most_urgent.level,
                    label: bundle.most_urgent.label.clone(),
                });
            }
        }

        attention.sort_by_key(|entry| entry.level);

        Self {
            sort_key,
            total_vehicles: bundles.len(),
            by_level: level_entries(&by_level),
            most_urgent_by_level: level_entries(&most_urgent_by_level),
            untracked_facts,
            attention,
        }
    }
}

fn level_entries(counts: &HashMap<UrgencyLevel, usize>) -> Vec<LevelCountEntry> {
    UrgencyLevel::ordered()
        .into_iter()
        .map(|level| LevelCountEntry {
            level,
            level_label: level.label(),
            vehicles: counts.get(&level).copied().unwrap_or_default(),
        })
        .collect()
}
