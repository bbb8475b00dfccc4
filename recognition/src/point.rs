use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::record::{parse_fields, RecordError};

/// A surface point with its normal.
///
/// The normal is expected to be unit length; nothing here enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedPoint {
    pub position: Vec3,
    pub normal: Vec3,
}

impl OrientedPoint {
    pub const fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Two oriented points. Feature extraction may swap `u` and `v` in place to
/// put the pair into canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPair {
    pub u: OrientedPoint,
    pub v: OrientedPoint,
}

impl PointPair {
    pub const fn new(u: OrientedPoint, v: OrientedPoint) -> Self {
        Self { u, v }
    }

    /// Exchange `u` and `v`.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.u, &mut self.v);
    }

    /// Vector from `u` to `v`.
    #[inline]
    pub fn connecting(&self) -> Vec3 {
        self.v.position - self.u.position
    }

    #[inline]
    pub fn midpoint(&self) -> Vec3 {
        (self.u.position + self.v.position) * 0.5
    }

    /// Human-readable form used in log messages.
    pub fn describe(&self) -> String {
        let (pu, nu) = (self.u.position, self.u.normal);
        let (pv, nv) = (self.v.position, self.v.normal);
        format!(
            "[u: ({},{},{}),({},{},{}) and v: ({},{},{}),({},{},{})]",
            pu.x, pu.y, pu.z, nu.x, nu.y, nu.z, pv.x, pv.y, pv.z, nv.x, nv.y, nv.z
        )
    }

    /// Position and normal of `u`, then of `v`.
    pub(crate) fn components(&self) -> [f32; 12] {
        let mut out = [0.0; 12];
        self.u.position.write_to_slice(&mut out[0..3]);
        self.u.normal.write_to_slice(&mut out[3..6]);
        self.v.position.write_to_slice(&mut out[6..9]);
        self.v.normal.write_to_slice(&mut out[9..12]);
        out
    }

    pub(crate) fn from_components(values: &[f32]) -> Self {
        debug_assert!(values.len() >= 12);
        Self {
            u: OrientedPoint::new(
                Vec3::from_slice(&values[0..3]),
                Vec3::from_slice(&values[3..6]),
            ),
            v: OrientedPoint::new(
                Vec3::from_slice(&values[6..9]),
                Vec3::from_slice(&values[9..12]),
            ),
        }
    }
}

/// Record form: the 12 components separated by commas.
impl fmt::Display for PointPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.components())
    }
}

impl FromStr for PointPair {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: [f32; 12] = parse_fields(s)?;
        Ok(Self::from_components(&values))
    }
}

pub(crate) fn write_joined(f: &mut fmt::Formatter<'_>, values: &[f32]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}
