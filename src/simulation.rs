//! Per-frame driver tying the chain, drag input, band curve and spin
//! correction together.

use crate::band::{BandSampler, BAND_POINTS};
use crate::camera::Camera;
use crate::config::{SimulationConfig, TimestepMode};
use crate::error::Result;
use crate::interaction::DragController;
use crate::math::{Transform, TransformRaw};
use crate::physics::{
    correct_spin_with_gain, BodyRole, Chain, ChainSolver, StepResult, StepStatus, BODY_COUNT,
};
use glam::{Vec2, Vec3};
use log::{debug, info, warn};

/// Pointer input, in normalized device coordinates (`[-1, 1]`, y up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { ndc: Vec2 },
    /// Press on a picked point of the card.
    DownAt { ndc: Vec2, hit_point: Vec3 },
    Move { ndc: Vec2 },
    Up,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    /// Band polyline, free end first.
    pub band: &'a [Vec3; BAND_POINTS],
    pub transforms: [Transform; BODY_COUNT],
    pub step: StepResult,
}

pub struct Simulation {
    config: SimulationConfig,
    chain: Chain,
    camera: Camera,
    drag: DragController,
    sampler: BandSampler,
    pointer: Option<Vec2>,
    pending: Vec<PointerEvent>,
    accumulator: f32,
    frame: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let sampler = BandSampler::new(config.smoothing()).with_curve_type(config.curve_type);
        let sim = Self {
            chain: config.build_chain(),
            camera: config.build_camera(),
            drag: DragController::new(),
            sampler,
            pointer: None,
            pending: Vec::new(),
            accumulator: 0.0,
            frame: 0,
            config,
        };
        info!(
            "simulation ready: origin {:?}, gravity {:?}, {:?}",
            sim.config.chain_origin, sim.config.gravity, sim.config.timestep
        );
        Ok(sim)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Queues an event; events are applied at the start of the next frame.
    pub fn push_event(&mut self, event: PointerEvent) {
        self.pending.push(event);
    }

    pub fn pointer_down(&mut self, ndc: Vec2) {
        self.push_event(PointerEvent::Down { ndc });
    }

    pub fn pointer_down_at(&mut self, ndc: Vec2, hit_point: Vec3) {
        self.push_event(PointerEvent::DownAt { ndc, hit_point });
    }

    pub fn pointer_move(&mut self, ndc: Vec2) {
        self.push_event(PointerEvent::Move { ndc });
    }

    pub fn pointer_up(&mut self) {
        self.push_event(PointerEvent::Up);
    }

    /// Advances one rendered frame.
    ///
    /// Order: pending input, drag pin, physics, band curve, spin correction.
    pub fn frame(&mut self, dt: f32) -> FrameOutput<'_> {
        self.frame += 1;
        self.apply_events();

        if let Some(pointer) = self.pointer {
            self.drag.update(&mut self.chain, pointer, &self.camera);
        }

        let step = self.advance_physics(dt);
        self.sampler.update(&mut self.chain, dt);

        self.correct_spin();

        FrameOutput {
            band: self.sampler.points(),
            transforms: self.chain.transforms(),
            step,
        }
    }

    fn apply_events(&mut self) {
        for event in self.pending.drain(..) {
            apply_event(
                event,
                &mut self.drag,
                &mut self.chain,
                &self.camera,
                &mut self.pointer,
            );
        }
    }

    /// Runs every frame. A sleeping chain is woken when the correction
    /// changes the card's yaw rate.
    fn correct_spin(&mut self) {
        let card = self.chain.card_mut();
        let before = card.angular_velocity;
        correct_spin_with_gain(card, self.config.spin_gain);

        if card.angular_velocity != before && self.chain.is_sleeping() {
            debug!("yaw correction woke the chain");
            self.chain.wake_up();
        }
    }

    fn advance_physics(&mut self, dt: f32) -> StepResult {
        let gravity = self.config.gravity;
        match self.config.timestep {
            TimestepMode::Variable => ChainSolver::step(&mut self.chain, dt, gravity),
            TimestepMode::Fixed { step, max_substeps } => {
                if dt.is_finite() && dt > 0.0 {
                    self.accumulator += dt;
                } else {
                    debug!("ignoring frame time {dt}");
                }

                let mut result = StepResult::measured(StepStatus::Skipped, &self.chain);
                let mut substeps = 0;
                while self.accumulator >= step && substeps < max_substeps {
                    result = ChainSolver::step(&mut self.chain, step, gravity);
                    self.accumulator -= step;
                    substeps += 1;
                }

                if self.accumulator >= step {
                    warn!(
                        "dropping {:.3}s of simulation time after {max_substeps} substeps",
                        self.accumulator
                    );
                    self.accumulator %= step;
                }
                result
            }
        }
    }

    pub fn band(&self) -> &[Vec3; BAND_POINTS] {
        self.sampler.points()
    }

    pub fn band_floats(&self) -> &[f32] {
        self.sampler.as_floats()
    }

    pub fn transforms(&self) -> [Transform; BODY_COUNT] {
        self.chain.transforms()
    }

    pub fn card_transform(&self) -> Transform {
        self.chain.body(BodyRole::Card).transform()
    }

    /// Body poses packed for an instance buffer, anchor first.
    pub fn instance_data(&self) -> [TransformRaw; BODY_COUNT] {
        self.transforms().map(|t| t.to_raw())
    }
}

fn apply_event(
    event: PointerEvent,
    drag: &mut DragController,
    chain: &mut Chain,
    camera: &Camera,
    pointer: &mut Option<Vec2>,
) {
    match event {
        PointerEvent::Down { .. } | PointerEvent::DownAt { .. } if drag.is_dragging() => {
            warn!("pointer down while already dragging, ignored");
        }
        PointerEvent::Down { ndc } => {
            *pointer = Some(ndc);
            drag.begin(chain, ndc, camera);
        }
        PointerEvent::DownAt { ndc, hit_point } => {
            *pointer = Some(ndc);
            drag.begin_at(chain, hit_point);
        }
        PointerEvent::Move { ndc } => *pointer = Some(ndc),
        PointerEvent::Up => {
            drag.end(chain);
        }
    }
}
