#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod area;
mod export;
mod geodesic;
mod speed;
mod stats;
mod trajectory;

pub use self::area::{
    count_vehicles_in_area, to_deciseconds, AreaBounds, TimeAlignedCount, TimeGrid,
};
pub use self::export::{
    read_average_speeds, read_occupancy, read_speed_summaries, write_average_speeds,
    write_boxplots, write_histograms, write_occupancy, write_occupancy_comparison,
    write_speed_summaries,
};
pub use self::geodesic::geodesic_km;
pub use self::speed::{
    calculate_average_speed_by_trajectory, mean_of_average_speeds, overall_average_speed,
    summarize, TrajectorySpeedSummary, VehicleClass,
};
pub use self::stats::{BoxplotStats, SpeedBins};
pub use self::trajectory::{group_trajectories, Trajectory};

/// Both simulators record every vehicle's position this often, in seconds
pub const SAMPLING_INTERVAL: f64 = 0.2;
/// Length of one simulation run, in seconds
pub const HORIZON: f64 = 3600.0;
