//! Lanyard physics module
//!
//! This module contains the bodies, joints and chain topology plus the
//! position-based step that advances them.

pub mod body;
pub mod chain;
pub mod joint;
pub mod solver;
pub mod spin;

pub use body::{Body, BodyKind, Collider};
pub use chain::{create_chain, BodyRole, Chain, ChainBuilder, SleepConfig, BODY_COUNT};
pub use joint::{Joint, RopeJoint, RopeMode, SphericalJoint};
pub use solver::{step, ChainSolver, StepResult, StepStatus};
pub use spin::{correct_spin, correct_spin_with_gain};
