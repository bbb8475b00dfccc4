//! Point-pair features.
//!
//! A pair of oriented points is described by four values that do not change
//! under rigid motion:
//!
//! - `f1`: distance between the points
//! - `f2`: angle between the two normals
//! - `f3`, `f4`: angles between each normal and the line joining the points,
//!   ordered so that `f3 <= f4`
//!
//! The angular components are discretized into a [`Signature`] that keys the
//! feature hash index. The distance is left to the caller's range filter.

mod frame;
mod signature;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::PointPair;

pub use frame::{FrameError, LocalFrame, PairFrame, MIN_AXIS_LENGTH_SQ};
pub use signature::Signature;

/// Continuous point-pair descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Descriptor {
    pub f1: f32,
    pub f2: f32,
    pub f3: f32,
    pub f4: f32,
}

impl Descriptor {
    pub const ZERO: Self = Self {
        f1: 0.0,
        f2: 0.0,
        f3: 0.0,
        f4: 0.0,
    };

    /// Hash key for this descriptor.
    #[inline]
    pub fn signature(&self, step: f32) -> Signature {
        Signature::discretize(self.f2, self.f3, self.f4, step)
    }
}

/// Why a pair produced no usable feature. Both cases are filtering
/// conditions; callers skip the pair.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PairRejection {
    #[error("point pair is degenerate: u and v coincide")]
    Degenerate,

    #[error("point pair squared distance {distance_sq} outside [{min_sq}, {max_sq}]")]
    OutOfRange {
        distance_sq: f32,
        min_sq: f32,
        max_sq: f32,
    },
}

impl PairRejection {
    /// The descriptor reported alongside the rejection: all zero for a
    /// degenerate pair, only the true distance for an out-of-range pair.
    pub fn descriptor(&self) -> Descriptor {
        match *self {
            PairRejection::Degenerate => Descriptor::ZERO,
            PairRejection::OutOfRange { distance_sq, .. } => Descriptor {
                f1: distance_sq.sqrt(),
                ..Descriptor::ZERO
            },
        }
    }
}

#[inline]
fn clamped_acos(cos: f32) -> f32 {
    cos.clamp(-1.0, 1.0).acos()
}

/// Compute the descriptor of `pair`.
///
/// Pairs whose squared distance falls outside `[min_distance_sq, max_distance_sq]`
/// are rejected, as are coincident (or non-finite) points.
///
/// On success the pair is left in canonical order: `u` is the point whose
/// normal makes the smaller angle with the line to the other point. If the
/// input had it the other way round, `u` and `v` are swapped in place.
pub fn compute_feature(
    pair: &mut PointPair,
    min_distance_sq: f32,
    max_distance_sq: f32,
) -> Result<Descriptor, PairRejection> {
    let d = pair.connecting();
    let distance_sq = d.length_squared();

    if distance_sq == 0.0 || !distance_sq.is_finite() {
        return Err(PairRejection::Degenerate);
    }
    if distance_sq < min_distance_sq || distance_sq > max_distance_sq {
        return Err(PairRejection::OutOfRange {
            distance_sq,
            min_sq: min_distance_sq,
            max_sq: max_distance_sq,
        });
    }

    let f1 = distance_sq.sqrt();
    let dir = d / f1;
    let nu = pair.u.normal;
    let nv = pair.v.normal;

    let f2 = clamped_acos(nu.dot(nv));
    let alpha_u = clamped_acos(nu.dot(dir));
    let alpha_v = clamped_acos(-nv.dot(dir));

    let (f3, f4) = if alpha_u < alpha_v {
        (alpha_u, alpha_v)
    } else {
        // Frame construction and matching rely on this ordering.
        pair.swap();
        (alpha_v, alpha_u)
    };

    Ok(Descriptor { f1, f2, f3, f4 })
}
