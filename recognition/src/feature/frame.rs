use std::fmt;
use std::str::FromStr;

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::{write_joined, PointPair};
use crate::record::{check_record, parse_fields, RecordError};

/// Relative bound on the x axis: the frame is degenerate when
/// `|x|^2 <= MIN_AXIS_LENGTH_SQ * |v - u|^2 * |n_u + n_v|^2`, i.e. when the
/// connecting vector and the normal sum are parallel to within about 1e-6 rad.
pub const MIN_AXIS_LENGTH_SQ: f32 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("cannot build a local frame: the {axis} axis is degenerate")]
    DegenerateAxis { axis: char },
}

/// Rigid transform attached to a point pair.
///
/// Columns: `x = (v - u) x (n_u + n_v)`, `y = v - u`, `z = x x y`, all
/// normalized, and the midpoint of the pair as translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalFrame {
    matrix: Mat4,
}

impl LocalFrame {
    /// Build the frame of `pair`.
    ///
    /// Fails when the connecting vector has no length or is parallel to the
    /// sum of the normals (including opposite normals, whose sum vanishes).
    pub fn from_pair(pair: &PointPair) -> Result<Self, FrameError> {
        let puv = pair.connecting();
        let normal_sum = pair.u.normal + pair.v.normal;
        let x = puv.cross(normal_sum);

        let reference_sq = puv.length_squared() * normal_sum.length_squared();
        let x = normalized(x, MIN_AXIS_LENGTH_SQ * reference_sq, 'x')?;
        let y = normalized(puv, 0.0, 'y')?;
        // Unit length: x and y are orthonormal.
        let z = x.cross(y);

        Ok(Self {
            matrix: Mat4::from_cols(
                x.extend(0.0),
                y.extend(0.0),
                z.extend(0.0),
                pair.midpoint().extend(1.0),
            ),
        })
    }

    /// Wrap an existing matrix. The caller vouches that it is rigid.
    pub const fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    pub fn is_finite(&self) -> bool {
        self.matrix.is_finite()
    }

    /// Inverse of a rigid transform: transposed rotation, rotated negated translation.
    pub fn inverse(&self) -> Mat4 {
        let rotation_t = Mat4::from_cols(
            self.matrix.x_axis.truncate().extend(0.0),
            self.matrix.y_axis.truncate().extend(0.0),
            self.matrix.z_axis.truncate().extend(0.0),
            Vec4::W,
        )
        .transpose();
        let t = rotation_t.transform_vector3(self.translation());
        Mat4::from_cols(
            rotation_t.x_axis,
            rotation_t.y_axis,
            rotation_t.z_axis,
            (-t).extend(1.0),
        )
    }

    /// The first three rows, row-major. The last row is always `[0, 0, 0, 1]`.
    pub fn upper_rows(&self) -> [f32; 12] {
        let mut out = [0.0; 12];
        for r in 0..3 {
            self.matrix.row(r).write_to_slice(&mut out[r * 4..r * 4 + 4]);
        }
        out
    }

    pub fn from_upper_rows(values: &[f32]) -> Self {
        debug_assert!(values.len() >= 12);
        let rows = Mat4::from_cols(
            Vec4::from_slice(&values[0..4]),
            Vec4::from_slice(&values[4..8]),
            Vec4::from_slice(&values[8..12]),
            Vec4::W,
        );
        Self {
            matrix: rows.transpose(),
        }
    }
}

fn normalized(v: Vec3, min_length_sq: f32, axis: char) -> Result<Vec3, FrameError> {
    let length_sq = v.length_squared();
    // Written so that NaN also fails.
    if !(length_sq > min_length_sq && length_sq > 0.0 && length_sq.is_finite()) {
        return Err(FrameError::DegenerateAxis { axis });
    }
    Ok(v / length_sq.sqrt())
}

/// A canonical point pair together with its local frame; the unit stored in
/// the feature hash index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairFrame {
    pub pair: PointPair,
    pub frame: LocalFrame,
}

impl PairFrame {
    pub fn from_pair(pair: PointPair) -> Result<Self, FrameError> {
        let frame = LocalFrame::from_pair(&pair)?;
        Ok(Self { pair, frame })
    }
}

/// Record form: 12 pair values then 12 frame values.
impl fmt::Display for PairFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.pair.components())?;
        f.write_str(",")?;
        write_joined(f, &self.frame.upper_rows())
    }
}

impl FromStr for PairFrame {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        check_record(s)?;
        let values: [f32; 24] = parse_fields(s)?;
        Ok(Self {
            pair: PointPair::from_components(&values[..12]),
            frame: LocalFrame::from_upper_rows(&values[12..]),
        })
    }
}
