//! Vector type alias for wind velocities.

use nalgebra::Vector3;

/// 3D vector type for wind velocities.
///
/// This is a simple alias for `nalgebra::Vector3<f64>`. Components are
/// `(x, y, z)` with `x = speed·sin(direction)`, `y = speed·cos(direction)`
/// and `z` vertical, following the convention of the turbulence generators.
pub type Vec3 = Vector3<f64>;
