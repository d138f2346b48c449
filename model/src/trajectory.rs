use telemetry::{IDMapping, LonLat, PositionRecord, TrajectoryID, TrajectoryName, VehicleType};

use crate::geodesic_km;

/// All of the samples for one vehicle, in the order they appeared in the log
#[derive(Clone, Debug)]
pub struct Trajectory {
    pub id: TrajectoryID,
    pub name: TrajectoryName,
    pub vehicle_type: VehicleType,
    // Never empty
    samples: Vec<(LonLat, f64)>,
}

impl Trajectory {
    pub fn samples(&self) -> &[(LonLat, f64)] {
        &self.samples
    }

    pub fn num_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn start_time(&self) -> f64 {
        self.samples[0].1
    }

    pub fn end_time(&self) -> f64 {
        self.samples[self.samples.len() - 1].1
    }

    /// Sums the geodesic distance between each pair of adjacent samples. The last sample has
    /// nothing after it, so it adds nothing.
    pub fn distance_km(&self) -> f64 {
        self.samples
            .windows(2)
            .map(|pair| geodesic_km(pair[0].0, pair[1].0))
            .sum()
    }

    /// Samples are taken at a fixed rate, so the elapsed time only depends on how many there are.
    pub fn elapsed_hours(&self, sampling_interval: f64) -> f64 {
        (self.samples.len() - 1) as f64 * sampling_interval / 3600.0
    }
}

/// Groups records by trajectory in one pass. Trajectories are ordered by their first
/// appearance; samples inside each keep the log's order.
pub fn group_trajectories(records: &[PositionRecord]) -> Vec<Trajectory> {
    let mut ids: IDMapping<TrajectoryName, TrajectoryID> = IDMapping::new();
    let mut trajectories: Vec<Trajectory> = Vec::new();
    let mut type_changes = 0;
    let mut backwards = 0;

    for rec in records {
        let (id, is_new) = ids.insert_idempotent(&rec.trajectory);
        if is_new {
            trajectories.push(Trajectory {
                id,
                name: rec.trajectory.clone(),
                vehicle_type: rec.vehicle_type.clone(),
                samples: Vec::new(),
            });
        }

        let trajectory = &mut trajectories[id.0];
        if trajectory.vehicle_type != rec.vehicle_type {
            type_changes += 1;
        }
        if let Some((_, last_time)) = trajectory.samples.last() {
            if rec.time < *last_time {
                backwards += 1;
            }
        }
        trajectory.samples.push((rec.pos, rec.time));
    }

    if type_changes > 0 {
        warn!(
            "{} samples have a different vehicle type than the start of their trajectory; the \
             first type is kept",
            type_changes
        );
    }
    if backwards > 0 {
        warn!(
            "{} samples go back in time within their trajectory; they're kept in log order",
            backwards
        );
    }
    debug!(
        "Grouped {} records into {} trajectories",
        records.len(),
        trajectories.len()
    );

    trajectories
}
