use nalgebra::{Matrix3, Matrix4};

use crate::position::Position;

#[cfg(feature = "serde")]
use serde::Serialize;

/// [DilutionOfPrecision] of one solution
#[derive(Clone, Debug, Default, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DilutionOfPrecision {
    /// Geometric DOP
    pub gdop: f64,

    /// Position DOP
    pub pdop: f64,

    /// Horizontal DOP
    pub hdop: f64,

    /// Vertical DOP
    pub vdop: f64,

    /// Temporal DOP
    pub tdop: f64,
}

impl DilutionOfPrecision {
    /// Creates new [DilutionOfPrecision].
    ///
    /// ## Input
    /// - h = (Gᵀ.G)⁻¹ matrix
    /// - position: solved [Position], defining the local vertical
    pub(crate) fn new(h: &Matrix4<f64>, position: &Position) -> Self {
        let pdop_sq = h[(0, 0)] + h[(1, 1)] + h[(2, 2)];

        // VDOP is the projection of H on the local down vector,
        // HDOP follows from PDOP² = HDOP² + VDOP²
        let down = position.down();
        let h3: Matrix3<f64> = h.fixed_view::<3, 3>(0, 0).into_owned();
        let vdop_sq = down.dot(&(h3 * down));

        Self {
            pdop: pdop_sq.sqrt(),
            tdop: h[(3, 3)].sqrt(),
            gdop: (pdop_sq + h[(3, 3)]).sqrt(),
            vdop: vdop_sq.sqrt(),
            hdop: (pdop_sq - vdop_sq).max(0.0).sqrt(),
        }
    }
}
