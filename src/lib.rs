//! # lanyard-sim
//!
//! A real-time lanyard: a fixed anchor, three rope-linked joints and a card on
//! a ball joint, driven by a small position-based solver.
//!
//! ## Features
//! - Single-pass rope and spherical joint solver with gravity, damping and sleeping
//! - Pointer drag through camera unprojection
//! - Speed-scaled smoothing and a chordal Catmull-Rom band curve
//! - JSON configuration, native demo binary and a WASM binding
//!
//! ## Example
//! ```rust,ignore
//! use lanyard_sim::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! for _ in 0..120 {
//!     let frame = sim.frame(1.0 / 60.0);
//!     println!("card at {:?}", frame.transforms[4].position);
//! }
//!
//! // Drag the card from the center of the screen
//! sim.pointer_down(glam::Vec2::ZERO);
//! sim.pointer_move(glam::Vec2::new(0.2, 0.1));
//! sim.frame(1.0 / 60.0);
//! ```

pub mod band;
pub mod camera;
pub mod config;
pub mod error;
pub mod interaction;
pub mod math;
pub mod physics;
pub mod simulation;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use band::{update_curve, BandSampler, Smoothing, BAND_POINTS};
pub use camera::Camera;
pub use config::{SimulationConfig, TimestepMode};
pub use error::{Result, SimError};
pub use interaction::{begin_drag, end_drag, update_drag, DragController};
pub use math::{CatmullRom, CurveType, Transform};
pub use physics::{create_chain, step, BodyKind, BodyRole, Chain, RopeMode, StepResult};
pub use simulation::{FrameOutput, PointerEvent, Simulation};
