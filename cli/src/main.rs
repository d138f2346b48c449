#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod compare;
mod config;
mod paths;
mod process;

use std::path::PathBuf;

use anyhow::Result;
use structopt::StructOpt;

use self::config::Config;

#[derive(StructOpt)]
#[structopt(
    name = "telemetry_compare",
    about = "Compare vehicle speeds and area occupancy between two traffic simulators"
)]
enum Command {
    /// Summarize one simulator's position log
    Process {
        /// The directory holding this simulator's data. Outputs are written here too.
        #[structopt(long, parse(from_os_str))]
        source: PathBuf,
        /// How many vehicles the run simulated. Picks the input and names every output.
        #[structopt(long)]
        vehicle_count: usize,
        /// Read this position log instead of data_{vehicle_count}.txt in the source directory
        #[structopt(long, parse(from_os_str))]
        input: Option<PathBuf>,
        /// Reload speed_data_{vehicle_count}.csv from a previous run instead of recalculating it
        #[structopt(long)]
        reuse_speed_data: bool,
        /// A JSON file overriding the default settings
        #[structopt(long, parse(from_os_str))]
        config: Option<PathBuf>,
    },
    /// Line up the outputs of `process` from SMARTS and SUMO
    Compare {
        /// The directory `process` wrote SMARTS results to
        #[structopt(long, parse(from_os_str))]
        smarts: PathBuf,
        /// The directory `process` wrote SUMO results to
        #[structopt(long, parse(from_os_str))]
        sumo: PathBuf,
        #[structopt(long)]
        vehicle_count: usize,
        /// Where to write the comparison tables
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
        /// A JSON file overriding the default settings
        #[structopt(long, parse(from_os_str))]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    setup_logger();

    match Command::from_args() {
        Command::Process {
            source,
            vehicle_count,
            input,
            reuse_speed_data,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            let input = input.unwrap_or_else(|| paths::raw_data(&source, vehicle_count));
            process::run(&source, vehicle_count, &input, reuse_speed_data, &config)
        }
        Command::Compare {
            smarts,
            sumo,
            vehicle_count,
            output,
            config,
        } => {
            let config = Config::load(config.as_deref())?;
            compare::run(&smarts, &sumo, vehicle_count, &output, &config)
        }
    }
}

/// Log to STDERR, at info unless RUST_LOG says otherwise
fn setup_logger() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
