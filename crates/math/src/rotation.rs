use glam::{DMat3, DVec3};

use crate::vector::{MathError, normalize};

/// Rotation by a signed angle around an axis through the origin.
///
/// The matrix is the explicit form of Rodrigues' rotation formula. Positive
/// angles follow the right-hand rule around the axis direction. Build once
/// and [`apply`](Self::apply) to many points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRotation {
    axis: DVec3,
    angle: f64,
    matrix: DMat3,
}

impl AxisRotation {
    /// Fails with [`MathError::InvalidAxis`] when `axis` has zero (or
    /// non-finite) length. `angle` is in radians and is not wrapped.
    pub fn new(axis: DVec3, angle: f64) -> Result<Self, MathError> {
        let v = normalize(axis).map_err(|_| MathError::InvalidAxis)?;
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let row_x = DVec3::new(
            v.x * v.x * t + c,
            v.x * v.y * t - v.z * s,
            v.x * v.z * t + v.y * s,
        );
        let row_y = DVec3::new(
            v.y * v.x * t + v.z * s,
            v.y * v.y * t + c,
            v.y * v.z * t - v.x * s,
        );
        let row_z = DVec3::new(
            v.x * v.z * t - v.y * s,
            v.y * v.z * t + v.x * s,
            v.z * v.z * t + c,
        );

        Ok(Self {
            axis: v,
            angle,
            matrix: DMat3::from_cols(row_x, row_y, row_z).transpose(),
        })
    }

    /// Unit axis direction.
    pub fn axis(&self) -> DVec3 {
        self.axis
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn matrix(&self) -> DMat3 {
        self.matrix
    }

    /// The rotation by the opposite angle around the same axis.
    pub fn inverse(&self) -> Self {
        Self {
            axis: self.axis,
            angle: -self.angle,
            matrix: self.matrix.transpose(),
        }
    }

    pub fn apply(&self, point: DVec3) -> DVec3 {
        self.matrix * point
    }
}

/// Image of `point` under rotation by `angle` radians around `axis`.
///
/// `axis` need not be unit length. Fails with [`MathError::InvalidAxis`]
/// when it is the zero vector.
pub fn rotate_around_axis(point: DVec3, axis: DVec3, angle: f64) -> Result<DVec3, MathError> {
    Ok(AxisRotation::new(axis, angle)?.apply(point))
}
