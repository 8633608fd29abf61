#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole camera model and pixel projections.
pub mod camera;

/// Dense optical flow from scene motion.
pub mod flow;

/// Linear algebra utilities.
pub mod linalg;

/// Rigid motion parameter vectors.
pub mod motion;

/// 3D transforms algorithms.
pub mod transforms;
