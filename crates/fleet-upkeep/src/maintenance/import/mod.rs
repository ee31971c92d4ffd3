//! Vehicle store adapter: reads fleet exports into [`VehicleRecord`]s.

mod parser;

use crate::maintenance::domain::VehicleRecord;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FleetImportError {
    #[error("failed to read fleet export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid fleet CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: '{value}' in column '{column}' is not a recognized date")]
    InvalidDate {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: '{value}' in column '{column}' is not a whole number of kilometers")]
    InvalidMileage {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: 'Vehicle ID' is empty")]
    MissingVehicleId { line: usize },
    #[error("vehicle '{0}' appears more than once in the export")]
    DuplicateVehicle(String),
}

pub struct FleetCsvImporter;

impl FleetCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleRecord>, FleetImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, FleetImportError> {
        let vehicles = parser::parse_vehicles(reader)?;
        let mut seen: HashSet<&str> = HashSet::new();

        for vehicle in &vehicles {
            if !seen.insert(vehicle.vehicle_id.as_str()) {
                return Err(FleetImportError::DuplicateVehicle(
                    vehicle.vehicle_id.clone(),
                ));
            }
        }

        debug!(vehicles = vehicles.len(), "fleet export imported");
        Ok(vehicles)
    }
}
