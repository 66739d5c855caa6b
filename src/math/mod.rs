//! Math utilities module
//!
//! Provides re-exports from glam, the body [`Transform`] and the Catmull-Rom
//! curve used to shape the band.

pub mod curve;
mod transform;

pub use curve::{CatmullRom, CurveType};
pub use transform::{Transform, TransformRaw};

// Re-export commonly used glam types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
