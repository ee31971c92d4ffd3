use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity scale for a single maintenance fact, most urgent first.
///
/// Declaration order is the severity order: `Expired < Critical < Warning < Soon < Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Expired,
    Critical,
    Warning,
    Soon,
    Ok,
}

impl UrgencyLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Expired,
            Self::Critical,
            Self::Warning,
            Self::Soon,
            Self::Ok,
        ]
    }

    /// Integer rank used by every comparison: `Expired` is 0, `Ok` is 4.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Expired => 0,
            Self::Critical => 1,
            Self::Warning => 2,
            Self::Soon => 3,
            Self::Ok => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Soon => "Soon",
            Self::Ok => "OK",
        }
    }

    /// True for levels a fleet manager should act on now.
    pub const fn needs_attention(self) -> bool {
        self.priority() <= Self::Warning.priority()
    }
}

/// Color token handed to the display layer. Carries no logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityToken {
    Ok,
    Soon,
    Warning,
    Critical,
    Expired,
}

impl SeverityToken {
    pub const fn for_level(level: UrgencyLevel) -> Self {
        match level {
            UrgencyLevel::Expired => Self::Expired,
            UrgencyLevel::Critical => Self::Critical,
            UrgencyLevel::Warning => Self::Warning,
            UrgencyLevel::Soon => Self::Soon,
            UrgencyLevel::Ok => Self::Ok,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrgencyResult {
    pub level: UrgencyLevel,
    /// Days or kilometers left; negative when overdue.
    pub remaining: i64,
    pub label: String,
    pub severity: SeverityToken,
}

impl UrgencyResult {
    /// Sentinel `remaining` for facts that are not tracked.
    pub const NOT_TRACKED_REMAINING: i64 = i64::MAX;

    pub(crate) fn new(level: UrgencyLevel, remaining: i64, label: String) -> Self {
        Self {
            level,
            remaining,
            label,
            severity: SeverityToken::for_level(level),
        }
    }

    pub(crate) fn not_tracked() -> Self {
        Self::new(
            UrgencyLevel::Ok,
            Self::NOT_TRACKED_REMAINING,
            "not set".to_string(),
        )
    }

    pub fn is_tracked(&self) -> bool {
        self.remaining != Self::NOT_TRACKED_REMAINING
    }

    /// Returns true when `self` should replace `other` as the more urgent result.
    pub fn is_more_urgent_than(&self, other: &UrgencyResult) -> bool {
        let (mine, theirs) = (self.level.priority(), other.level.priority());
        mine < theirs || (mine == theirs && self.remaining < other.remaining)
    }
}

/// The four maintenance facts tracked per vehicle. Also used as the fleet sort key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    #[default]
    Inspection,
    Tires,
    Insurance,
    Service,
}

impl FactKind {
    /// Fixed evaluation order; exact ties in most-urgent selection go to the earliest entry.
    pub const fn ordered() -> [Self; 4] {
        [Self::Inspection, Self::Tires, Self::Insurance, Self::Service]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Inspection => "Inspection",
            Self::Tires => "Tire Change",
            Self::Insurance => "Insurance",
            Self::Service => "Service",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Inspection => "inspection",
            Self::Tires => "tires",
            Self::Insurance => "insurance",
            Self::Service => "service",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Inspection => 0,
            Self::Tires => 1,
            Self::Insurance => 2,
            Self::Service => 3,
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FactKind {
    type Err = UrgencyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inspection" => Ok(Self::Inspection),
            "tires" | "tyres" => Ok(Self::Tires),
            "insurance" => Ok(Self::Insurance),
            "service" | "mileage" => Ok(Self::Service),
            _ => Err(UrgencyError::UnknownSortKey(value.to_string())),
        }
    }
}

/// Vehicle row as delivered by the vehicle store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_id: String,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub inspection_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub tires_change_date: Option<NaiveDate>,
    #[serde(default)]
    pub insurance_expiry: Option<NaiveDate>,
    #[serde(default)]
    pub current_mileage: i64,
    #[serde(default)]
    pub service_due_mileage: Option<i64>,
}

impl VehicleRecord {
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            plate: None,
            display_name: None,
            inspection_expiry: None,
            tires_change_date: None,
            insurance_expiry: None,
            current_mileage: 0,
            service_due_mileage: None,
        }
    }

    /// Best human-facing name: display name, then plate, then id.
    pub fn title(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.plate.as_deref())
            .unwrap_or(&self.vehicle_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrgencyError {
    #[error("current mileage must not be negative (got {current})")]
    NegativeMileage { current: i64 },
    #[error("evaluation date {today} is before 1970-01-01")]
    TodayBeforeEpoch { today: NaiveDate },
    #[error("unknown sort key '{0}' (expected inspection, tires, insurance or service)")]
    UnknownSortKey(String),
}
