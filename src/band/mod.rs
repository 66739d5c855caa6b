//! Band curve module
//!
//! Smooths the interior joints and samples the chordal Catmull-Rom curve the
//! band ribbon is rendered along.

pub mod sampler;
pub mod smoothing;

pub use sampler::{update_curve, BandSampler, BAND_POINTS, BAND_SEGMENTS};
pub use smoothing::Smoothing;
