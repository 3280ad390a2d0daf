pub mod normalize;
pub mod radial;
pub mod rings;

pub use normalize::normalize;
pub use radial::score;
pub use rings::{color_band, ring_boundary, ring_layout};

use crate::error::Result;
use crate::types::geometry::{RawPointerEvent, ShotRecord, TargetGeometry};

pub fn score_from_event(event: &RawPointerEvent, geometry: &TargetGeometry) -> Result<ShotRecord> {
    let point = normalize(event, geometry)?;
    Ok(score(point, geometry))
}
