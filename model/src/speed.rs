use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use telemetry::{PositionRecord, TrajectoryName, VehicleType};

use crate::{group_trajectories, Trajectory};

#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySpeedSummary {
    pub trajectory: TrajectoryName,
    pub vehicle_type: VehicleType,
    pub sample_count: usize,
    pub total_distance_km: f64,
    pub total_time_hours: f64,
    /// None when the trajectory has a single sample, so no time elapses. These must be left out
    /// of any aggregate.
    pub average_speed_kmh: Option<f64>,
}

impl TrajectorySpeedSummary {
    pub fn new(trajectory: &Trajectory, sampling_interval: f64) -> Self {
        let total_distance_km = trajectory.distance_km();
        let total_time_hours = trajectory.elapsed_hours(sampling_interval);
        let average_speed_kmh = if total_time_hours > 0.0 {
            Some(total_distance_km / total_time_hours)
        } else {
            None
        };
        Self {
            trajectory: trajectory.name.clone(),
            vehicle_type: trajectory.vehicle_type.clone(),
            sample_count: trajectory.num_samples(),
            total_distance_km,
            total_time_hours,
            average_speed_kmh,
        }
    }
}

/// One summary per trajectory, in the same order
pub fn summarize(
    trajectories: &[Trajectory],
    sampling_interval: f64,
) -> Vec<TrajectorySpeedSummary> {
    let summaries: Vec<TrajectorySpeedSummary> = trajectories
        .iter()
        .map(|t| TrajectorySpeedSummary::new(t, sampling_interval))
        .collect();
    let undefined = summaries
        .iter()
        .filter(|s| s.average_speed_kmh.is_none())
        .count();
    if undefined > 0 {
        info!(
            "{} of {} trajectories only have one sample, so they have no average speed",
            undefined,
            summaries.len()
        );
    }
    summaries
}

pub fn calculate_average_speed_by_trajectory(
    records: &[PositionRecord],
    sampling_interval: f64,
) -> Vec<TrajectorySpeedSummary> {
    summarize(&group_trajectories(records), sampling_interval)
}

/// Total distance over total time. Every trajectory is weighted by how long it lasted, so short
/// trajectories don't skew the result. None if no time elapsed at all.
pub fn overall_average_speed(summaries: &[TrajectorySpeedSummary]) -> Option<f64> {
    let distance: f64 = summaries.iter().map(|s| s.total_distance_km).sum();
    let time: f64 = summaries.iter().map(|s| s.total_time_hours).sum();
    if time > 0.0 {
        Some(distance / time)
    } else {
        None
    }
}

/// The plain mean of each trajectory's average speed, skipping undefined ones
pub fn mean_of_average_speeds(summaries: &[TrajectorySpeedSummary]) -> Option<f64> {
    let speeds: Vec<f64> = summaries
        .iter()
        .filter_map(|s| s.average_speed_kmh)
        .collect();
    if speeds.is_empty() {
        return None;
    }
    Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
}

/// A named group of vehicle types that get compared together
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleClass {
    pub name: String,
    pub vehicle_types: BTreeSet<VehicleType>,
}

impl VehicleClass {
    pub fn new(name: &str, vehicle_types: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            vehicle_types: vehicle_types.iter().map(|x| VehicleType::new(*x)).collect(),
        }
    }

    pub fn cars() -> Self {
        Self::new("cars", &["CAR", "TRUCK"])
    }

    pub fn bikes() -> Self {
        Self::new("bikes", &["BIKE"])
    }

    pub fn contains(&self, vehicle_type: &VehicleType) -> bool {
        self.vehicle_types.contains(vehicle_type)
    }

    pub fn filter(&self, summaries: &[TrajectorySpeedSummary]) -> Vec<TrajectorySpeedSummary> {
        summaries
            .iter()
            .filter(|s| self.contains(&s.vehicle_type))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemetry::LonLat;

    fn rec(id: &str, vehicle_type: &str, time: f64, lat: f64, lon: f64) -> PositionRecord {
        PositionRecord {
            trajectory: TrajectoryName(id.to_string()),
            vehicle_type: VehicleType::new(vehicle_type),
            time,
            pos: LonLat::new(lon, lat),
        }
    }

    fn summary(vehicle_type: &str, distance: f64, time: f64) -> TrajectorySpeedSummary {
        TrajectorySpeedSummary {
            trajectory: TrajectoryName(format!("{vehicle_type}-{distance}")),
            vehicle_type: VehicleType::new(vehicle_type),
            sample_count: (time * 3600.0 / 0.2).round() as usize + 1,
            total_distance_km: distance,
            total_time_hours: time,
            average_speed_kmh: if time > 0.0 {
                Some(distance / time)
            } else {
                None
            },
        }
    }

    #[test]
    fn stationary_car() {
        let records = vec![
            rec("T1", "CAR", 0.0, 50.0, 19.0),
            rec("T1", "CAR", 0.2, 50.0, 19.0),
        ];
        let summaries = calculate_average_speed_by_trajectory(&records, 0.2);
        assert_eq!(
            vec![TrajectorySpeedSummary {
                trajectory: TrajectoryName("T1".to_string()),
                vehicle_type: VehicleType::new("CAR"),
                sample_count: 2,
                total_distance_km: 0.0,
                total_time_hours: 0.2 / 3600.0,
                average_speed_kmh: Some(0.0),
            }],
            summaries
        );
    }

    #[test]
    fn single_sample_has_no_speed() {
        let summaries =
            calculate_average_speed_by_trajectory(&[rec("T2", "BIKE", 0.0, 50.0, 19.0)], 0.2);
        assert_eq!(1, summaries.len());
        assert_eq!(1, summaries[0].sample_count);
        assert_eq!(0.0, summaries[0].total_time_hours);
        assert_eq!(None, summaries[0].average_speed_kmh);
    }

    #[test]
    fn moving_car() {
        // 0.001 degrees of latitude, about 111m, in 10 seconds is about 40 km/h
        let records: Vec<PositionRecord> = (0..51)
            .map(|i| rec("T1", "CAR", i as f64 * 0.2, 50.0 + i as f64 * 0.00002, 19.0))
            .collect();
        let summaries = calculate_average_speed_by_trajectory(&records, 0.2);
        assert_eq!(51, summaries[0].sample_count);
        assert_eq!(50.0 * 0.2 / 3600.0, summaries[0].total_time_hours);
        let speed = summaries[0].average_speed_kmh.unwrap();
        assert!(speed > 39.0 && speed < 41.0, "got {}", speed);
    }

    #[test]
    fn weighted_average_differs_from_mean() {
        let summaries = vec![summary("CAR", 1.0, 0.1), summary("TRUCK", 10.0, 0.2)];
        let weighted = overall_average_speed(&summaries).unwrap();
        assert!((weighted - 11.0 / 0.3).abs() < 1e-9);
        let mean = mean_of_average_speeds(&summaries).unwrap();
        assert!((mean - 30.0).abs() < 1e-9);
        assert!((weighted - mean).abs() > 1.0);
    }

    #[test]
    fn undefined_speeds_are_left_out() {
        let summaries = vec![summary("BIKE", 2.0, 0.1), summary("BIKE", 0.0, 0.0)];
        assert_eq!(Some(20.0), mean_of_average_speeds(&summaries));
        assert_eq!(Some(20.0), overall_average_speed(&summaries));

        let only_undefined = vec![summary("BIKE", 0.0, 0.0)];
        assert_eq!(None, overall_average_speed(&only_undefined));
        assert_eq!(None, mean_of_average_speeds(&only_undefined));
        assert_eq!(None, overall_average_speed(&[]));
    }

    #[test]
    fn classes_split_by_vehicle_type() {
        let summaries = vec![
            summary("CAR", 1.0, 0.1),
            summary("BIKE", 1.0, 0.2),
            summary("TRUCK", 3.0, 0.1),
            summary("BUS", 3.0, 0.1),
        ];
        let cars = VehicleClass::cars().filter(&summaries);
        assert_eq!(
            vec!["CAR", "TRUCK"],
            cars.iter()
                .map(|s| s.vehicle_type.0.as_str())
                .collect::<Vec<_>>()
        );
        let bikes = VehicleClass::bikes().filter(&summaries);
        assert_eq!(1, bikes.len());
        assert_eq!(Some(5.0), overall_average_speed(&bikes));
    }
}
