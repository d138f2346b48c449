use geo::{Distance, Geodesic};

use telemetry::LonLat;

/// Distance along the WGS-84 ellipsoid in kilometers. A pair that can't be measured counts as 0,
/// so one bad sample doesn't ruin a whole trajectory.
pub fn geodesic_km(pt1: LonLat, pt2: LonLat) -> f64 {
    if !is_valid(pt1) || !is_valid(pt2) {
        debug!("Can't measure from {:?} to {:?}, treating it as 0", pt1, pt2);
        return 0.0;
    }
    if pt1 == pt2 {
        return 0.0;
    }

    let meters = Geodesic::distance(pt1.to_point(), pt2.to_point());
    if meters.is_finite() && meters >= 0.0 {
        meters / 1000.0
    } else {
        debug!("Geodesic from {:?} to {:?} came out {}", pt1, pt2, meters);
        0.0
    }
}

fn is_valid(pt: LonLat) -> bool {
    pt.longitude.is_finite() && pt.latitude.is_finite() && pt.latitude.abs() <= 90.0
}
