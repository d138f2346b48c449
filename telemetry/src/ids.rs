use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The trajectory ID as it appears in the raw log
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrajectoryName(pub String);

/// Assigned in the order trajectories first appear in the log
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrajectoryID(pub usize);

impl CheapID for TrajectoryID {
    fn new(x: usize) -> Self {
        Self(x)
    }
}

/// CAR, TRUCK, BIKE, or whatever else a simulator emits. Not a closed set.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VehicleType(pub String);

impl VehicleType {
    pub fn new<S: Into<String>>(x: S) -> Self {
        Self(x.into())
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for TrajectoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait CheapID: Copy {
    fn new(x: usize) -> Self;
}

#[derive(Serialize, Deserialize)]
pub struct IDMapping<K: Ord, V> {
    orig_to_cheap: BTreeMap<K, V>,
    // We don't need to store the inverse. It's more convenient for each object to own that.
}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> IDMapping<K, V> {
    pub fn new() -> Self {
        Self {
            orig_to_cheap: BTreeMap::new(),
        }
    }

    /// Returns the ID and true if it was just assigned
    pub fn insert_idempotent(&mut self, orig: &K) -> (V, bool) {
        match self.orig_to_cheap.get(orig) {
            Some(x) => (*x, false),
            None => {
                let v = V::new(self.orig_to_cheap.len());
                self.orig_to_cheap.insert(orig.clone(), v);
                (v, true)
            }
        }
    }

    pub fn lookup(&self, orig: &K) -> Result<V> {
        match self.orig_to_cheap.get(orig) {
            Some(x) => Ok(*x),
            None => bail!("IDMapping lookup of {:?} failed", orig),
        }
    }

}

impl<K: Clone + std::fmt::Debug + Ord, V: CheapID> Default for IDMapping<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_first_appearance() {
        let mut ids: IDMapping<TrajectoryName, TrajectoryID> = IDMapping::new();
        let b = TrajectoryName("b".to_string());
        let a = TrajectoryName("a".to_string());

        assert_eq!((TrajectoryID(0), true), ids.insert_idempotent(&b));
        assert_eq!((TrajectoryID(1), true), ids.insert_idempotent(&a));
        assert_eq!((TrajectoryID(0), false), ids.insert_idempotent(&b));
        assert_eq!((TrajectoryID(1), false), ids.insert_idempotent(&a));
        assert_eq!(TrajectoryID(1), ids.lookup(&a).unwrap());
        assert!(ids.lookup(&TrajectoryName("c".to_string())).is_err());
    }
}
