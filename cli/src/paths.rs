//! Every file name is keyed only by the vehicle count, so `compare` can find the outputs of two
//! simulators that never talked to each other.

use std::path::{Path, PathBuf};

pub fn raw_data(dir: &Path, vehicle_count: usize) -> PathBuf {
    dir.join(format!("data_{vehicle_count}.txt"))
}

pub fn speed_data(dir: &Path, vehicle_count: usize) -> PathBuf {
    dir.join(format!("speed_data_{vehicle_count}.csv"))
}

pub fn class_speeds(dir: &Path, class: &str, vehicle_count: usize) -> PathBuf {
    dir.join(format!("{class}_speed_{vehicle_count}.csv"))
}

pub fn boxplot(dir: &Path, vehicle_count: usize) -> PathBuf {
    dir.join(format!("speed_boxplot_{vehicle_count}.csv"))
}

/// The first area keeps the plain name
pub fn area(dir: &Path, vehicle_count: usize, idx: usize) -> PathBuf {
    if idx == 0 {
        dir.join(format!("area_{vehicle_count}.csv"))
    } else {
        dir.join(format!("area_{vehicle_count}_{idx}.csv"))
    }
}

pub fn histogram(dir: &Path, class: &str, vehicle_count: usize) -> PathBuf {
    dir.join(format!("{class}_histogram_{vehicle_count}.csv"))
}

pub fn area_comparison(dir: &Path, vehicle_count: usize, idx: usize) -> PathBuf {
    if idx == 0 {
        dir.join(format!("area_comparison_{vehicle_count}.csv"))
    } else {
        dir.join(format!("area_comparison_{vehicle_count}_{idx}.csv"))
    }
}
