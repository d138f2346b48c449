use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{TrajectoryName, VehicleType};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub longitude: f64,
    pub latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// One row of a simulator's position log, after missing values have been filled in
#[derive(Clone, Debug, PartialEq)]
pub struct PositionRecord {
    pub trajectory: TrajectoryName,
    pub vehicle_type: VehicleType,
    /// Seconds since the start of the simulation
    pub time: f64,
    pub pos: LonLat,
}

/// Reads a position log. Empty fields take the value from the previous row. That has to happen
/// here, before anything groups or measures rows.
pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<PositionRecord>> {
    let mut records = Vec::new();
    let mut last = LastSeen::default();
    let mut filled = 0;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    for (idx, rec) in reader.deserialize().enumerate() {
        // The header is line 1
        let row = idx + 2;
        let rec: Record = rec.with_context(|| format!("Bad input on line {row}"))?;

        records.push(PositionRecord {
            trajectory: fill(
                rec.trajectory.map(TrajectoryName),
                &mut last.trajectory,
                "Trajectory ID",
                row,
                &mut filled,
            )?,
            vehicle_type: fill(
                rec.vehicle_type.map(VehicleType),
                &mut last.vehicle_type,
                "Vehicle Type",
                row,
                &mut filled,
            )?,
            time: fill(rec.time, &mut last.time, "Time Stamp", row, &mut filled)?,
            pos: LonLat::new(
                fill(
                    rec.longitude,
                    &mut last.longitude,
                    "Longitude",
                    row,
                    &mut filled,
                )?,
                fill(
                    rec.latitude,
                    &mut last.latitude,
                    "Latitude",
                    row,
                    &mut filled,
                )?,
            ),
        });
    }

    info!(
        "Read {} position records, forward-filling {} missing values",
        records.len(),
        filled
    );
    Ok(records)
}

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<PositionRecord>> {
    let path = path.as_ref();
    let file = fs_err::File::open(path)?;
    load(file).with_context(|| format!("Couldn't load position log {}", path.display()))
}

fn fill<T: Clone>(
    value: Option<T>,
    last: &mut Option<T>,
    column: &str,
    row: usize,
    filled: &mut usize,
) -> Result<T> {
    if let Some(x) = value {
        *last = Some(x.clone());
        return Ok(x);
    }
    match last {
        Some(x) => {
            *filled += 1;
            Ok(x.clone())
        }
        None => bail!(
            "Line {row} is missing {column}, and there's no earlier value to fill it with"
        ),
    }
}

#[derive(Default)]
struct LastSeen {
    trajectory: Option<TrajectoryName>,
    vehicle_type: Option<VehicleType>,
    time: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Deserialize)]
struct Record {
    #[serde(rename = "Trajectory ID")]
    trajectory: Option<String>,
    #[serde(rename = "Vehicle Type")]
    vehicle_type: Option<String>,
    #[serde(rename = "Time Stamp")]
    time: Option<f64>,
    #[serde(rename = "Latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    longitude: Option<f64>,
}
