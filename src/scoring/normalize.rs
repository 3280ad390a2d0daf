use crate::error::{QuiverError, Result};
use crate::types::geometry::{CanonicalPoint, RawPointerEvent, TargetGeometry};

/// Maps a device-space pointer position onto the canonical target face.
///
/// Each axis is scaled on its own, so a stretched surface still lands on the same canonical
/// point. Points outside the surface are kept as-is; they score as misses later.
pub fn normalize(event: &RawPointerEvent, geometry: &TargetGeometry) -> Result<CanonicalPoint> {
    let surface = &event.surface;
    if !(surface.width.is_finite() && surface.width > 0.0) {
        return Err(QuiverError::InvalidGeometry(format!(
            "surface width must be positive (found {})",
            surface.width
        )));
    }
    if !(surface.height.is_finite() && surface.height > 0.0) {
        return Err(QuiverError::InvalidGeometry(format!(
            "surface height must be positive (found {})",
            surface.height
        )));
    }

    let total = geometry.total_size();
    Ok(CanonicalPoint {
        x: (event.client_x - surface.left) / surface.width * total,
        y: (event.client_y - surface.top) / surface.height * total,
    })
}
