use glam::DVec3;

/// Errors from vector operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("cannot normalize a zero-length or non-finite vector")]
    InvalidVector,
    #[error("rotation axis must be a non-zero finite vector")]
    InvalidAxis,
}

/// Scale `v` to unit length.
///
/// The norm is the Euclidean length computed with `hypot`, which avoids
/// intermediate overflow for large components. Fails with
/// [`MathError::InvalidVector`] when the norm is zero or not finite.
pub fn normalize(v: DVec3) -> Result<DVec3, MathError> {
    let norm = v.x.hypot(v.y).hypot(v.z);
    if norm == 0.0 || !norm.is_finite() {
        return Err(MathError::InvalidVector);
    }
    Ok(DVec3::new(v.x / norm, v.y / norm, v.z / norm))
}
