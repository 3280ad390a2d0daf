use crate::types::geometry::{CanonicalPoint, ShotRecord, TargetGeometry};

/// Ring-unit tolerance for treating a point as lying on a band boundary.
///
/// Boundary radii like `half - k * pitch` rarely survive floating point exactly; without the
/// snap, `raw` lands a hair under `k` and the shot drops to the lower band.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Scores a canonical point.
///
/// `score = clamp(floor(raw) + 1, 0, rings)` with `raw = (half - distance) / pitch`, so a point
/// exactly on the line between two bands takes the higher one and the centre scores `rings`.
/// The outer edge itself is not part of the face: `distance >= half` is a miss.
pub fn score(point: CanonicalPoint, geometry: &TargetGeometry) -> ShotRecord {
    let half = geometry.half();
    let distance = (point.x - half).hypot(point.y - half);
    ShotRecord {
        x: point.x,
        y: point.y,
        score: score_at_distance(distance, geometry),
    }
}

pub fn score_at_distance(distance: f64, geometry: &TargetGeometry) -> u32 {
    if !distance.is_finite() || distance >= geometry.half() {
        return 0;
    }
    let raw = (geometry.half() - distance) / geometry.pitch();
    let bands_inside = snap_to_boundary(raw);
    let rings = f64::from(geometry.ring_count());
    (bands_inside + 1.0).clamp(0.0, rings) as u32
}

fn snap_to_boundary(raw: f64) -> f64 {
    let nearest = raw.round();
    if (raw - nearest).abs() <= BOUNDARY_TOLERANCE {
        nearest
    } else {
        raw.floor()
    }
}
