use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use telemetry::{LonLat, PositionRecord};

/// A rectangle in lat/lon degrees. All four edges count as inside.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaBounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl AreaBounds {
    pub fn new(
        min_latitude: f64,
        max_latitude: f64,
        min_longitude: f64,
        max_longitude: f64,
    ) -> Result<Self> {
        let bounds = Self {
            min_latitude,
            max_latitude,
            min_longitude,
            max_longitude,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        for x in [
            self.min_latitude,
            self.max_latitude,
            self.min_longitude,
            self.max_longitude,
        ] {
            ensure!(x.is_finite(), "{:?} has a non-finite edge", self);
        }
        ensure!(
            self.min_latitude <= self.max_latitude && self.min_longitude <= self.max_longitude,
            "{:?} has a minimum bigger than its maximum",
            self
        );
        Ok(())
    }

    pub fn contains(&self, pos: LonLat) -> bool {
        pos.latitude >= self.min_latitude
            && pos.latitude <= self.max_latitude
            && pos.longitude >= self.min_longitude
            && pos.longitude <= self.max_longitude
    }
}

/// Rounds a timestamp to one decimal place, expressed as a whole number of tenths of a second.
/// Summing 0.2 over and over drifts; this makes timestamps usable as exact keys.
pub fn to_deciseconds(time: f64) -> i64 {
    (time * 10.0).round() as i64
}

/// Every tick from 0 to the horizon, inclusive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeGrid {
    horizon: i64,
    step: i64,
}

impl TimeGrid {
    pub fn new(horizon: f64, step: f64) -> Result<Self> {
        ensure!(
            step.is_finite() && step > 0.0,
            "The time step must be positive, not {}",
            step
        );
        ensure!(
            horizon.is_finite() && horizon >= 0.0,
            "The time horizon can't be negative, not {}",
            horizon
        );
        let step_ds = to_deciseconds(step);
        ensure!(
            step_ds >= 1 && ((step * 10.0) - step_ds as f64).abs() < 1e-6,
            "The time step {} must be a whole number of tenths of a second",
            step
        );
        let horizon_ds = to_deciseconds(horizon);
        ensure!(
            ((horizon * 10.0) - horizon_ds as f64).abs() < 1e-6 && horizon_ds % step_ds == 0,
            "The time horizon {} must be a whole number of {}s steps",
            horizon,
            step
        );
        Ok(Self {
            horizon: horizon_ds,
            step: step_ds,
        })
    }

    pub fn horizon(&self) -> f64 {
        self.horizon as f64 / 10.0
    }

    pub fn step(&self) -> f64 {
        self.step as f64 / 10.0
    }

    // Never empty; the tick at 0 is always there
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        (self.horizon / self.step) as usize + 1
    }

    /// In deciseconds, ascending
    pub fn ticks(&self) -> impl Iterator<Item = i64> {
        let step = self.step;
        (0..self.len() as i64).map(move |i| i * step)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeAlignedCount {
    #[serde(rename = "Time Stamp")]
    pub time: f64,
    #[serde(rename = "Count")]
    pub count: usize,
}

/// Counts the records inside the bounds at every tick of the grid. A tick with no record gets
/// 0. Counts are only ever matched to the exact tick they were observed at, never carried forward
/// to later ticks.
pub fn count_vehicles_in_area(
    records: &[PositionRecord],
    bounds: &AreaBounds,
    grid: &TimeGrid,
) -> Vec<TimeAlignedCount> {
    let mut observed: BTreeMap<i64, usize> = BTreeMap::new();
    for rec in records {
        if rec.time.is_finite() && bounds.contains(rec.pos) {
            *observed.entry(to_deciseconds(rec.time)).or_insert(0) += 1;
        }
    }
    let total: usize = observed.values().sum();

    let mut matched = 0;
    let mut results = Vec::with_capacity(grid.len());
    for tick in grid.ticks() {
        let count = observed.get(&tick).cloned().unwrap_or(0);
        matched += count;
        results.push(TimeAlignedCount {
            time: tick as f64 / 10.0,
            count,
        });
    }

    if matched != total {
        warn!(
            "{} observations inside {:?} aren't on the time grid, so they aren't counted",
            total - matched,
            bounds
        );
    }
    info!(
        "{} observations inside {:?}, spread over {} of {} ticks",
        matched,
        bounds,
        results.iter().filter(|x| x.count > 0).count(),
        results.len()
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use telemetry::{TrajectoryName, VehicleType};

    fn rec(id: &str, time: f64, lat: f64, lon: f64) -> PositionRecord {
        PositionRecord {
            trajectory: TrajectoryName(id.to_string()),
            vehicle_type: VehicleType::new("CAR"),
            time,
            pos: LonLat::new(lon, lat),
        }
    }

    fn krakow() -> AreaBounds {
        AreaBounds::new(50.06870, 50.071445, 19.900597, 19.90811).unwrap()
    }

    #[test]
    fn full_hour_grid() {
        let grid = TimeGrid::new(3600.0, 0.2).unwrap();
        assert_eq!(18001, grid.len());
        let ticks: Vec<i64> = grid.ticks().collect();
        assert_eq!(18001, ticks.len());
        assert_eq!(0, ticks[0]);
        assert_eq!(36000, ticks[18000]);
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(3600.0, grid.horizon());
        assert_eq!(0.2, grid.step());
    }

    #[test]
    fn bad_grids() {
        assert!(TimeGrid::new(3600.0, 0.0).is_err());
        assert!(TimeGrid::new(3600.0, -0.2).is_err());
        assert!(TimeGrid::new(-1.0, 0.2).is_err());
        assert!(TimeGrid::new(3600.0, 0.05).is_err());
        assert!(TimeGrid::new(3600.1, 0.2).is_err());
        assert!(TimeGrid::new(f64::NAN, 0.2).is_err());
        assert_eq!(1, TimeGrid::new(0.0, 0.2).unwrap().len());
    }

    #[test]
    fn counts_inside_the_box() {
        let records = vec![
            rec("A", 0.0, 50.07, 19.901),
            rec("B", 0.0, 50.07, 19.905),
            // Outside on latitude, then longitude
            rec("C", 0.0, 50.08, 19.905),
            rec("D", 0.0, 50.07, 19.95),
            rec("A", 0.2, 50.07, 19.901),
            // Accumulated drift from repeated addition
            rec("A", 0.1 + 0.2 + 0.3, 50.07, 19.901),
        ];
        assert_eq!(4, records.iter().filter(|r| krakow().contains(r.pos)).count());
        let grid = TimeGrid::new(1.0, 0.2).unwrap();
        let counts = count_vehicles_in_area(&records, &krakow(), &grid);
        assert_eq!(
            vec![(0.0, 2), (0.2, 1), (0.4, 0), (0.6, 1), (0.8, 0), (1.0, 0)],
            counts
                .iter()
                .map(|x| (x.time, x.count))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn edges_are_inclusive() {
        let bounds = krakow();
        assert!(bounds.contains(LonLat::new(19.900597, 50.06870)));
        assert!(bounds.contains(LonLat::new(19.90811, 50.071445)));
        assert!(!bounds.contains(LonLat::new(19.90812, 50.07)));
    }

    #[test]
    fn empty_filter_is_all_zeroes() {
        let records = vec![rec("A", 0.0, 10.0, 10.0), rec("A", 0.2, 10.0, 10.0)];
        let grid = TimeGrid::new(3600.0, 0.2).unwrap();
        let counts = count_vehicles_in_area(&records, &krakow(), &grid);
        assert_eq!(18001, counts.len());
        assert!(counts.iter().all(|x| x.count == 0));
        assert_eq!(3600.0, counts[18000].time);

        let nothing = count_vehicles_in_area(&[], &krakow(), &grid);
        assert_eq!(counts, nothing);
    }

    #[test]
    fn off_grid_counts_are_not_carried_forward() {
        // 0.3 isn't a tick of a 0.2s grid. A backwards as-of join would put it on 0.2 or 0.4;
        // here it's dropped, and both neighbors stay 0.
        let records = vec![
            rec("A", 0.0, 50.07, 19.901),
            rec("B", 0.3, 50.07, 19.901),
            rec("C", 5.0, 50.07, 19.901),
        ];
        assert!(records.iter().all(|r| krakow().contains(r.pos)));
        let grid = TimeGrid::new(1.0, 0.2).unwrap();
        let counts = count_vehicles_in_area(&records, &krakow(), &grid);
        assert_eq!(6, counts.len());
        assert_eq!(1, counts[0].count);
        assert_eq!(0, counts[1].count);
        assert_eq!(0, counts[2].count);
        assert_eq!(0, counts[3].count);
        assert_eq!(1, counts.iter().map(|x| x.count).sum::<usize>());
    }

    #[test]
    fn bad_bounds() {
        assert!(AreaBounds::new(50.1, 50.0, 19.0, 19.1).is_err());
        assert!(AreaBounds::new(50.0, 50.1, 19.0, f64::NAN).is_err());
    }
}
