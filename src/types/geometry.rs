use crate::error::{QuiverError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TOTAL_SIZE: f64 = 122.0;
pub const DEFAULT_RING_COUNT: u32 = 10;

/// Size of the canonical target face and how many scoring rings it carries.
///
/// Always constructed through [`TargetGeometry::new`], so `total_size` is finite and
/// positive and `ring_count` is at least one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetGeometry {
    total_size: f64,
    ring_count: u32,
}

impl TargetGeometry {
    pub fn new(total_size: f64, ring_count: u32) -> Result<Self> {
        if !total_size.is_finite() || total_size <= 0.0 {
            return Err(QuiverError::InvalidGeometry(format!(
                "total size must be a positive number (found {total_size})"
            )));
        }
        if ring_count == 0 {
            return Err(QuiverError::InvalidGeometry(
                "ring count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            total_size,
            ring_count,
        })
    }

    pub fn total_size(&self) -> f64 {
        self.total_size
    }

    pub fn ring_count(&self) -> u32 {
        self.ring_count
    }

    pub fn half(&self) -> f64 {
        self.total_size / 2.0
    }

    /// Radial width of one scoring band.
    pub fn pitch(&self) -> f64 {
        self.total_size / (2.0 * f64::from(self.ring_count))
    }

    /// Surface that maps one device unit onto one canonical unit.
    pub fn canonical_surface(&self) -> SurfaceBounds {
        SurfaceBounds {
            left: 0.0,
            top: 0.0,
            width: self.total_size,
            height: self.total_size,
        }
    }
}

impl Default for TargetGeometry {
    fn default() -> Self {
        Self {
            total_size: DEFAULT_TOTAL_SIZE,
            ring_count: DEFAULT_RING_COUNT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub surface: SurfaceBounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanonicalPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub x: f64,
    pub y: f64,
    pub score: u32,
}

/// A shot held in the session buffer, tagged with its per-arrow sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionShot {
    pub sequence: u64,
    #[serde(flatten)]
    pub record: ShotRecord,
}
