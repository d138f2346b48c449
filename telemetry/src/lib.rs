#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod ids;
mod record;

pub use ids::{CheapID, IDMapping, TrajectoryID, TrajectoryName, VehicleType};
pub use record::{load, load_path, LonLat, PositionRecord};
