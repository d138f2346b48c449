use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use model::{AreaBounds, SpeedBins, TimeGrid, VehicleClass};

/// Anything missing from the JSON file keeps its default
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Seconds between position samples
    pub sampling_interval: f64,
    /// Seconds covered by the occupancy series
    pub horizon: f64,
    pub areas: Vec<AreaBounds>,
    pub cars: VehicleClass,
    pub bikes: VehicleClass,
    pub speed_bins: BinsConfig,
}

/// Histogram edges in km/h, from `start` up to but not including `end`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinsConfig {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling_interval: model::SAMPLING_INTERVAL,
            horizon: model::HORIZON,
            // Around Rondo Mogilskie in Krakow
            areas: vec![AreaBounds {
                min_latitude: 50.06870,
                max_latitude: 50.071445,
                min_longitude: 19.900597,
                max_longitude: 19.90811,
            }],
            cars: VehicleClass::cars(),
            bikes: VehicleClass::bikes(),
            speed_bins: BinsConfig {
                start: 0.0,
                end: 70.0,
                step: 5.0,
            },
        }
    }
}

impl Config {
    /// Uses the defaults if there's no path
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs_err::read_to_string(path)?;
                let config: Config = serde_json::from_str(&raw)
                    .with_context(|| format!("Couldn't parse config {}", path.display()))?;
                info!("Loaded settings from {}", path.display());
                config
            }
            None => Config::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.time_grid()?;
        self.speed_bins()?;
        ensure!(!self.areas.is_empty(), "At least one area is needed");
        for area in &self.areas {
            area.validate()?;
        }
        for class in [&self.cars, &self.bikes] {
            ensure!(
                !class.vehicle_types.is_empty(),
                "The {} class has no vehicle types",
                class.name
            );
        }
        ensure!(
            self.cars.name != self.bikes.name,
            "Both classes are called {}",
            self.cars.name
        );
        Ok(())
    }

    /// The occupancy grid is stepped by the sampling interval
    pub fn time_grid(&self) -> Result<TimeGrid> {
        TimeGrid::new(self.horizon, self.sampling_interval)
    }

    pub fn speed_bins(&self) -> Result<SpeedBins> {
        SpeedBins::new(
            self.speed_bins.start,
            self.speed_bins.end,
            self.speed_bins.step,
        )
    }

    pub fn classes(&self) -> [&VehicleClass; 2] {
        [&self.cars, &self.bikes]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(18001, config.time_grid().unwrap().len());
        assert_eq!(13, config.speed_bins().unwrap().num_bins());
        assert_eq!(1, config.areas.len());
        assert!(config
            .cars
            .contains(&telemetry::VehicleType::new("TRUCK")));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "horizon": 60.0,
                "speed_bins": { "start": 0.0, "end": 60.0, "step": 5.0 }
            }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(301, config.time_grid().unwrap().len());
        assert_eq!(11, config.speed_bins().unwrap().num_bins());
        assert_eq!(Config::default().areas, config.areas);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "horizn": 60.0 }"#).is_err());
    }

    #[test]
    fn invalid_settings() {
        let mut config = Config::default();
        config.sampling_interval = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.areas.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.bikes.vehicle_types.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.json"))).is_err());
    }
}
