use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use model::{BoxplotStats, TrajectorySpeedSummary};

use crate::config::Config;
use crate::paths;

/// Turns one simulator's position log into the speed and occupancy tables that `compare` reads
pub fn run(
    source: &Path,
    vehicle_count: usize,
    input: &Path,
    reuse_speed_data: bool,
    config: &Config,
) -> Result<()> {
    fs_err::create_dir_all(source)?;
    let records = telemetry::load_path(input)?;

    let speed_path = paths::speed_data(source, vehicle_count);
    let summaries = if reuse_speed_data {
        info!("Reusing {}", speed_path.display());
        model::read_speed_summaries(open(&speed_path)?)
            .with_context(|| format!("Couldn't read {}", speed_path.display()))?
    } else {
        let summaries =
            model::calculate_average_speed_by_trajectory(&records, config.sampling_interval);
        model::write_speed_summaries(create(&speed_path)?, &summaries)?;
        info!(
            "Wrote {} trajectory summaries to {}",
            summaries.len(),
            speed_path.display()
        );
        summaries
    };

    let mut boxplots = Vec::new();
    for class in config.classes() {
        let subset = class.filter(&summaries);
        let path = paths::class_speeds(source, &class.name, vehicle_count);
        model::write_average_speeds(create(&path)?, &subset)?;
        describe_class(&class.name, &subset);
        boxplots.push((
            class.name.as_str(),
            BoxplotStats::new(subset.iter().map(|s| s.average_speed_kmh)),
        ));
    }
    model::write_boxplots(create(&paths::boxplot(source, vehicle_count))?, &boxplots)?;

    let grid = config.time_grid()?;
    for (idx, bounds) in config.areas.iter().enumerate() {
        let counts = model::count_vehicles_in_area(&records, bounds, &grid);
        let path = paths::area(source, vehicle_count, idx);
        model::write_occupancy(create(&path)?, &counts)?;
        info!("Wrote occupancy of {:?} to {}", bounds, path.display());
    }

    Ok(())
}

fn describe_class(name: &str, summaries: &[TrajectorySpeedSummary]) {
    let fmt = |x: Option<f64>| match x {
        Some(x) => format!("{:.2} km/h", x),
        None => "undefined".to_string(),
    };
    info!(
        "Overall {} average speed: {} over {} trajectories (unweighted mean {})",
        name,
        fmt(model::overall_average_speed(summaries)),
        summaries.len(),
        fmt(model::mean_of_average_speeds(summaries)),
    );
}

pub fn open(path: &Path) -> Result<BufReader<fs_err::File>> {
    Ok(BufReader::new(fs_err::File::open(path)?))
}

pub fn create(path: &Path) -> Result<BufWriter<fs_err::File>> {
    Ok(BufWriter::new(fs_err::File::create(path)?))
}
