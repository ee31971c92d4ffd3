use super::FleetImportError;
use crate::maintenance::domain::VehicleRecord;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

pub(crate) fn parse_vehicles<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, FleetImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut vehicles = Vec::new();

    for (index, record) in csv_reader.deserialize::<FleetRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = record?;
        vehicles.push(row.into_record(line)?);
    }

    Ok(vehicles)
}

#[derive(Debug, Deserialize)]
struct FleetRow {
    #[serde(rename = "Vehicle ID", alias = "ID")]
    vehicle_id: String,
    #[serde(rename = "Plate", default, deserialize_with = "empty_string_as_none")]
    plate: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(
        rename = "Inspection Expiry",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    inspection_expiry: Option<String>,
    #[serde(
        rename = "Tires Change Date",
        alias = "Tyres Change Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    tires_change_date: Option<String>,
    #[serde(
        rename = "Insurance Expiry",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    insurance_expiry: Option<String>,
    #[serde(
        rename = "Current Mileage",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    current_mileage: Option<String>,
    #[serde(
        rename = "Service Due Mileage",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    service_due_mileage: Option<String>,
}

impl FleetRow {
    fn into_record(self, line: usize) -> Result<VehicleRecord, FleetImportError> {
        if self.vehicle_id.trim().is_empty() {
            return Err(FleetImportError::MissingVehicleId { line });
        }

        let inspection_expiry = date_column(line, "Inspection Expiry", self.inspection_expiry)?;
        let tires_change_date = date_column(line, "Tires Change Date", self.tires_change_date)?;
        let insurance_expiry = date_column(line, "Insurance Expiry", self.insurance_expiry)?;
        let current_mileage =
            mileage_column(line, "Current Mileage", self.current_mileage)?.unwrap_or_default();
        let service_due_mileage =
            mileage_column(line, "Service Due Mileage", self.service_due_mileage)?;

        Ok(VehicleRecord {
            vehicle_id: self.vehicle_id,
            plate: self.plate,
            display_name: self.name,
            inspection_expiry,
            tires_change_date,
            insurance_expiry,
            current_mileage,
            service_due_mileage,
        })
    }
}

fn date_column(
    line: usize,
    column: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, FleetImportError> {
    value
        .map(|raw| {
            parse_date(&raw).ok_or(FleetImportError::InvalidDate {
                line,
                column,
                value: raw,
            })
        })
        .transpose()
}

fn mileage_column(
    line: usize,
    column: &'static str,
    value: Option<String>,
) -> Result<Option<i64>, FleetImportError> {
    value
        .map(|raw| {
            parse_mileage(&raw).ok_or(FleetImportError::InvalidMileage {
                line,
                column,
                value: raw,
            })
        })
        .transpose()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Accepts digit group separators (`48 500`, `48,500`, `48_500`) and a trailing `km`.
fn parse_mileage(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let trimmed = trimmed
        .strip_suffix("km")
        .or_else(|| trimmed.strip_suffix("KM"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | ',' | '_' | '\''))
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}

#[cfg(test)]
pub(crate) fn parse_mileage_for_tests(value: &str) -> Option<i64> {
    parse_mileage(value)
}
