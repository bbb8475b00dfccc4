use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::{parse_fields, RecordError};

/// Discretized angular components of a point-pair feature.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Signature {
    pub d2: i32,
    pub d3: i32,
    pub d4: i32,
}

impl Signature {
    pub const fn new(d2: i32, d3: i32, d4: i32) -> Self {
        Self { d2, d3, d4 }
    }

    /// `floor(value * step)` per component.
    ///
    /// Bins are unbounded in both directions. Values beyond the `i32` range
    /// saturate and NaN maps to bin 0.
    pub fn discretize(f2: f32, f3: f32, f4: f32, step: f32) -> Self {
        Self {
            d2: bin(f2, step),
            d3: bin(f3, step),
            d4: bin(f4, step),
        }
    }
}

#[inline]
fn bin(value: f32, step: f32) -> i32 {
    (value * step).floor() as i32
}

/// Record form `d2,d3,d4`.
impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.d2, self.d3, self.d4)
    }
}

impl FromStr for Signature {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [d2, d3, d4] = parse_fields::<i32, 3>(s)?;
        Ok(Self { d2, d3, d4 })
    }
}
