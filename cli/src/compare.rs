use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::paths;
use crate::process::{create, open};

const SMARTS: &str = "SMARTS";
const SUMO: &str = "SUMO";

/// Reads what `process` wrote for both simulators and writes tables with one column per
/// simulator, ready to chart
pub fn run(
    smarts: &Path,
    sumo: &Path,
    vehicle_count: usize,
    output: &Path,
    config: &Config,
) -> Result<()> {
    fs_err::create_dir_all(output)?;
    let bins = config.speed_bins()?;

    for class in config.classes() {
        let mut series = Vec::new();
        for (name, dir) in [(SMARTS, smarts), (SUMO, sumo)] {
            let path = paths::class_speeds(dir, &class.name, vehicle_count);
            let speeds = model::read_average_speeds(open(&path)?)
                .with_context(|| format!("Couldn't read {}", path.display()))?;
            let undefined = speeds.iter().filter(|x| x.is_none()).count();
            if undefined > 0 {
                info!(
                    "{}: leaving {} of {} {} with no average speed out of the histogram",
                    name,
                    undefined,
                    speeds.len(),
                    class.name
                );
            }
            series.push((name, bins.histogram(speeds)));
        }

        let path = paths::histogram(output, &class.name, vehicle_count);
        model::write_histograms(create(&path)?, &bins, &series)?;
        info!("Wrote {} speed histogram to {}", class.name, path.display());
    }

    for (name, dir) in [(SMARTS, smarts), (SUMO, sumo)] {
        describe_overall_speeds(name, dir, vehicle_count, config)?;
    }

    for idx in 0..config.areas.len() {
        let counts1 = read_occupancy(&paths::area(smarts, vehicle_count, idx))?;
        let counts2 = read_occupancy(&paths::area(sumo, vehicle_count, idx))?;
        let path = paths::area_comparison(output, vehicle_count, idx);
        model::write_occupancy_comparison(
            create(&path)?,
            (SMARTS, &counts1[..]),
            (SUMO, &counts2[..]),
        )?;
        info!("Wrote occupancy comparison to {}", path.display());
    }

    Ok(())
}

// The per-class tables only have the speed column, so the distance-weighted average needs the
// full summary table. Skipped if a source doesn't have one.
fn describe_overall_speeds(
    name: &str,
    dir: &Path,
    vehicle_count: usize,
    config: &Config,
) -> Result<()> {
    let path = paths::speed_data(dir, vehicle_count);
    if !path.exists() {
        warn!(
            "{} has no {}, so its overall average speeds are unknown",
            name,
            path.display()
        );
        return Ok(());
    }
    let summaries = model::read_speed_summaries(open(&path)?)
        .with_context(|| format!("Couldn't read {}", path.display()))?;
    for class in config.classes() {
        match model::overall_average_speed(&class.filter(&summaries)) {
            Some(speed) => info!(
                "{}: overall {} average speed is {:.2} km/h",
                name,
                class.name,
                speed
            ),
            None => info!(
                "{}: overall {} average speed is undefined",
                name,
                class.name
            ),
        }
    }
    Ok(())
}

fn read_occupancy(path: &Path) -> Result<Vec<model::TimeAlignedCount>> {
    model::read_occupancy(open(path)?).with_context(|| format!("Couldn't read {}", path.display()))
}
