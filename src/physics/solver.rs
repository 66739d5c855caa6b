use super::chain::Chain;
use glam::Vec3;
use log::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Advanced,
    /// `dt` was not a positive finite number, or a fixed-step accumulator
    /// had not yet gathered a full step.
    Skipped,
    Asleep,
}

#[derive(Debug, Clone, Copy)]
pub struct StepResult {
    pub status: StepStatus,
    pub max_rope_error: f32,
    pub pivot_error: f32,
}

impl StepResult {
    pub(crate) fn measured(status: StepStatus, chain: &Chain) -> Self {
        Self {
            status,
            max_rope_error: chain.max_rope_error(),
            pivot_error: chain.pivot_error(),
        }
    }

    pub fn advanced(&self) -> bool {
        self.status == StepStatus::Advanced
    }
}

/// Position-based solver for the lanyard chain.
///
/// Each step integrates gravity and damping, makes a single in-order pass
/// over the joints, and derives velocities from the resulting pose change.
/// There is no relaxation loop, so a small residual stretch remains.
pub struct ChainSolver;

impl ChainSolver {
    pub fn step(chain: &mut Chain, dt: f32, gravity: Vec3) -> StepResult {
        if !(dt.is_finite() && dt > 0.0) {
            debug!("skipping step with dt = {dt}");
            return StepResult::measured(StepStatus::Skipped, chain);
        }

        if chain.is_sleeping() {
            return StepResult::measured(StepStatus::Asleep, chain);
        }

        for body in &mut chain.bodies {
            body.integrate(dt, gravity);
        }

        for joint in chain.joints {
            joint.solve(&mut chain.bodies);
        }

        for body in &mut chain.bodies {
            body.derive_velocities(dt);
        }

        Self::update_sleep(chain, dt);

        let result = StepResult::measured(StepStatus::Advanced, chain);
        trace!(
            "step dt={dt:.4} rope_error={:.4} pivot_error={:.4}",
            result.max_rope_error,
            result.pivot_error
        );
        result
    }

    fn update_sleep(chain: &mut Chain, dt: f32) {
        let config = chain.sleep;
        let may_sleep = !chain.is_dragged()
            && chain.bodies.iter().filter(|b| b.is_dynamic()).all(|b| b.can_sleep);

        let calm = chain.bodies.iter().filter(|b| b.is_dynamic()).all(|b| {
            b.linear_velocity.length() < config.linear_threshold
                && b.angular_velocity.length() < config.angular_threshold
        });

        if !(may_sleep && calm) {
            chain.calm_time = 0.0;
            return;
        }

        chain.calm_time += dt;
        if chain.calm_time >= config.time_until_sleep {
            chain.fall_asleep();
            info!("chain at rest, sleeping");
        }
    }
}

pub fn step(chain: &mut Chain, dt: f32, gravity: Vec3) -> StepResult {
    ChainSolver::step(chain, dt, gravity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyKind, BodyRole};

    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: Vec3 = Vec3::new(0.0, -40.0, 0.0);

    fn hanging_chain() -> Chain {
        Chain::new(Vec3::new(0.0, 4.0, 0.0))
    }

    #[test]
    fn invalid_timestep_is_a_no_op() {
        let mut chain = hanging_chain();
        let before: Vec<Vec3> = chain.positions().collect();

        for dt in [0.0, -DT, f32::NAN, f32::INFINITY] {
            let result = step(&mut chain, dt, GRAVITY);
            assert_eq!(result.status, StepStatus::Skipped);
        }
        assert_eq!(chain.positions().collect::<Vec<_>>(), before);
    }

    #[test]
    fn pivot_is_solved_last_and_exactly() {
        let mut chain = hanging_chain();
        let result = step(&mut chain, DT, GRAVITY);

        assert!(result.advanced());
        assert!(result.pivot_error < 1e-4);
    }

    #[test]
    fn ropes_settle_near_rest_length() {
        let mut chain = hanging_chain();
        for _ in 0..1000 {
            step(&mut chain, DT, GRAVITY);
            assert_eq!(chain.anchor().position, Vec3::new(0.0, 4.0, 0.0));
        }

        for separation in chain.rope_separations() {
            assert!((separation - 1.0).abs() < 0.05, "separation {separation}");
        }
        // the card hangs straight below joint3
        let card = chain.card();
        let joint3 = chain.body(BodyRole::Joint3);
        assert!(card.position.y < joint3.position.y);
        assert!((card.position.x - joint3.position.x).abs() < 0.05);
    }

    #[test]
    fn chain_at_rest_falls_asleep_and_stops_stepping() {
        let mut chain = hanging_chain();
        let mut status = StepStatus::Advanced;
        for _ in 0..1000 {
            status = step(&mut chain, DT, GRAVITY).status;
        }
        assert_eq!(status, StepStatus::Asleep);
        assert!(chain.is_sleeping());

        let frozen: Vec<Vec3> = chain.positions().collect();
        step(&mut chain, DT, GRAVITY);
        assert_eq!(chain.positions().collect::<Vec<_>>(), frozen);
    }

    #[test]
    fn dragged_chain_never_sleeps() {
        let mut chain = hanging_chain();
        chain.card_mut().kind = BodyKind::KinematicallyDriven;
        for _ in 0..600 {
            step(&mut chain, DT, GRAVITY);
        }
        assert!(!chain.is_sleeping());
    }

    #[test]
    fn kinematic_card_is_not_integrated() {
        let mut chain = hanging_chain();
        let card = chain.card_mut();
        card.kind = BodyKind::KinematicallyDriven;
        let pinned = card.position;

        for _ in 0..30 {
            step(&mut chain, DT, GRAVITY);
        }
        assert_eq!(chain.card().position, pinned);
        assert!(chain.pivot_error() < 1e-4);
    }
}
