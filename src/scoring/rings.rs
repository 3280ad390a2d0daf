use crate::error::{QuiverError, Result};
use crate::types::geometry::TargetGeometry;
use serde::Serialize;

/// Face colours from the outermost band inwards; faces with more rings reuse the last one.
pub const FACE_COLOURS: [&str; 5] = ["#FFFFFF", "#28282B", "#0004FF", "#FF0000", "#FFFF00"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingBand {
    pub score: u32,
    pub radius: f64,
    pub band: u32,
    pub colour: &'static str,
}

/// Outer radius of the band that awards exactly `score`.
pub fn ring_boundary(score: u32, geometry: &TargetGeometry) -> Result<f64> {
    check_score(score, geometry)?;
    Ok(geometry.pitch() * f64::from(geometry.ring_count() - score + 1))
}

/// Colour band index; every two adjacent scores share one band.
pub fn color_band(score: u32, geometry: &TargetGeometry) -> Result<u32> {
    check_score(score, geometry)?;
    Ok((score - 1) / 2)
}

/// Every band from score 1 (outermost, drawn first) to the bullseye.
pub fn ring_layout(geometry: &TargetGeometry) -> Vec<RingBand> {
    (1..=geometry.ring_count())
        .map(|score| {
            let band = (score - 1) / 2;
            let colour_idx = (band as usize).min(FACE_COLOURS.len() - 1);
            RingBand {
                score,
                radius: geometry.pitch() * f64::from(geometry.ring_count() - score + 1),
                band,
                colour: FACE_COLOURS[colour_idx],
            }
        })
        .collect()
}

/// Half-length of each arm of a shot marker cross.
pub fn marker_arm(geometry: &TargetGeometry) -> f64 {
    geometry.pitch() * 0.5
}

fn check_score(score: u32, geometry: &TargetGeometry) -> Result<()> {
    if score == 0 || score > geometry.ring_count() {
        return Err(QuiverError::InvalidScore {
            score,
            ring_count: geometry.ring_count(),
        });
    }
    Ok(())
}
