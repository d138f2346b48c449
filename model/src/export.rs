use std::io::{Read, Write};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use telemetry::{TrajectoryName, VehicleType};

use crate::{to_deciseconds, BoxplotStats, SpeedBins, TimeAlignedCount, TrajectorySpeedSummary};

pub fn write_speed_summaries<W: Write>(
    writer: W,
    summaries: &[TrajectorySpeedSummary],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for s in summaries {
        writer.serialize(SpeedSummaryRow {
            trajectory: s.trajectory.clone(),
            vehicle_type: s.vehicle_type.clone(),
            samples: s.sample_count,
            time: s.total_time_hours,
            distance: s.total_distance_km,
            average_speed: s.average_speed_kmh,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_speed_summaries<R: Read>(reader: R) -> Result<Vec<TrajectorySpeedSummary>> {
    let mut summaries = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: SpeedSummaryRow = rec?;
        ensure!(
            rec.samples >= 1,
            "Trajectory {} has no samples",
            rec.trajectory
        );
        summaries.push(TrajectorySpeedSummary {
            trajectory: rec.trajectory,
            vehicle_type: rec.vehicle_type,
            sample_count: rec.samples,
            total_distance_km: rec.distance,
            total_time_hours: rec.time,
            average_speed_kmh: rec.average_speed,
        });
    }
    Ok(summaries)
}

/// Just the speed column, for one class of vehicles. Undefined speeds are written as empty
/// fields.
pub fn write_average_speeds<W: Write>(
    writer: W,
    summaries: &[TrajectorySpeedSummary],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for s in summaries {
        writer.serialize(AverageSpeedRow {
            average_speed: s.average_speed_kmh,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_average_speeds<R: Read>(reader: R) -> Result<Vec<Option<f64>>> {
    let mut speeds = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: AverageSpeedRow = rec?;
        speeds.push(rec.average_speed);
    }
    Ok(speeds)
}

pub fn write_occupancy<W: Write>(writer: W, counts: &[TimeAlignedCount]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for x in counts {
        writer.serialize(x)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_occupancy<R: Read>(reader: R) -> Result<Vec<TimeAlignedCount>> {
    let mut counts: Vec<TimeAlignedCount> = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: TimeAlignedCount = rec?;
        if let Some(prev) = counts.last() {
            ensure!(
                rec.time > prev.time,
                "Occupancy isn't in increasing time order: {} then {}",
                prev.time,
                rec.time
            );
        }
        counts.push(rec);
    }
    Ok(counts)
}

/// One row per bin, one column per series
pub fn write_histograms<W: Write>(
    writer: W,
    bins: &SpeedBins,
    series: &[(&str, Vec<usize>)],
) -> Result<()> {
    for (name, counts) in series {
        ensure!(
            counts.len() == bins.num_bins(),
            "{} has {} counts, but there are {} bins",
            name,
            counts.len(),
            bins.num_bins()
        );
    }

    let mut writer = csv::Writer::from_writer(writer);
    let mut header = vec!["Bin".to_string()];
    header.extend(series.iter().map(|(name, _)| name.to_string()));
    writer.write_record(&header)?;
    for (idx, label) in bins.labels().into_iter().enumerate() {
        let mut row = vec![label];
        row.extend(series.iter().map(|(_, counts)| counts[idx].to_string()));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_boxplots<W: Write>(writer: W, series: &[(&str, Option<BoxplotStats>)]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for (name, stats) in series {
        writer.serialize(BoxplotRow {
            series: name.to_string(),
            count: stats.as_ref().map(|s| s.count).unwrap_or(0),
            mean: stats.as_ref().map(|s| s.mean),
            whisker_low: stats.as_ref().map(|s| s.whisker_low),
            q1: stats.as_ref().map(|s| s.q1),
            median: stats.as_ref().map(|s| s.median),
            q3: stats.as_ref().map(|s| s.q3),
            whisker_high: stats.as_ref().map(|s| s.whisker_high),
            outliers: stats.as_ref().map(|s| s.outliers).unwrap_or(0),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Lines up two occupancy series. They have to cover exactly the same ticks.
pub fn write_occupancy_comparison<W: Write>(
    writer: W,
    (name1, counts1): (&str, &[TimeAlignedCount]),
    (name2, counts2): (&str, &[TimeAlignedCount]),
) -> Result<()> {
    ensure!(
        counts1.len() == counts2.len(),
        "{} has {} ticks, but {} has {}",
        name1,
        counts1.len(),
        name2,
        counts2.len()
    );

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["Time Stamp", name1, name2])?;
    for (x1, x2) in counts1.iter().zip(counts2) {
        if to_deciseconds(x1.time) != to_deciseconds(x2.time) {
            bail!(
                "The time grids of {} and {} disagree: {} vs {}",
                name1,
                name2,
                x1.time,
                x2.time
            );
        }
        writer.write_record(&[
            format!("{:.1}", x1.time),
            x1.count.to_string(),
            x2.count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize, Deserialize)]
struct SpeedSummaryRow {
    #[serde(rename = "Trajectory ID")]
    trajectory: TrajectoryName,
    #[serde(rename = "Vehicle Type")]
    vehicle_type: VehicleType,
    #[serde(rename = "Samples")]
    samples: usize,
    /// Hours
    #[serde(rename = "Time")]
    time: f64,
    /// Kilometers
    #[serde(rename = "Distance")]
    distance: f64,
    #[serde(rename = "Average Speed")]
    average_speed: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct AverageSpeedRow {
    #[serde(rename = "Average Speed")]
    average_speed: Option<f64>,
}

#[derive(Serialize)]
struct BoxplotRow {
    #[serde(rename = "Series")]
    series: String,
    #[serde(rename = "Count")]
    count: usize,
    #[serde(rename = "Mean")]
    mean: Option<f64>,
    #[serde(rename = "Whisker Low")]
    whisker_low: Option<f64>,
    #[serde(rename = "Q1")]
    q1: Option<f64>,
    #[serde(rename = "Median")]
    median: Option<f64>,
    #[serde(rename = "Q3")]
    q3: Option<f64>,
    #[serde(rename = "Whisker High")]
    whisker_high: Option<f64>,
    #[serde(rename = "Outliers")]
    outliers: usize,
}
