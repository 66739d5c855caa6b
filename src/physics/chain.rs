use super::body::{Body, BodyKind, Collider, DEFAULT_DAMPING};
use super::joint::{Joint, RopeJoint, RopeMode, SphericalJoint};
use crate::math::Transform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const BODY_COUNT: usize = 5;
pub const JOINT_COUNT: usize = 4;
pub const ROPE_COUNT: usize = 3;

/// Spacing between consecutive bodies in the initial layout.
pub const LAYOUT_SPACING: f32 = 0.5;
pub const DEFAULT_ROPE_LENGTH: f32 = 1.0;
pub const DEFAULT_CARD_PIVOT: Vec3 = Vec3::new(0.0, 1.5, 0.0);
pub const JOINT_RADIUS: f32 = 0.1;
pub const CARD_HALF_EXTENTS: Vec3 = Vec3::new(0.8, 1.125, 0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Anchor,
    Joint1,
    Joint2,
    Joint3,
    Card,
}

impl BodyRole {
    pub const ALL: [BodyRole; BODY_COUNT] = [
        BodyRole::Anchor,
        BodyRole::Joint1,
        BodyRole::Joint2,
        BodyRole::Joint3,
        BodyRole::Card,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    pub linear_threshold: f32,
    pub angular_threshold: f32,
    /// Seconds every body must stay below both thresholds.
    pub time_until_sleep: f32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            linear_threshold: 0.4,
            angular_threshold: 0.5,
            time_until_sleep: 2.0,
        }
    }
}

/// The lanyard: a fixed anchor, three rope joints and the card, in that order.
#[derive(Debug, Clone)]
pub struct Chain {
    pub(crate) bodies: [Body; BODY_COUNT],
    pub(crate) joints: [Joint; JOINT_COUNT],
    pub(crate) sleep: SleepConfig,
    pub(crate) calm_time: f32,
}

impl Chain {
    pub fn new(origin: Vec3) -> Self {
        Self::builder().origin(origin).build()
    }

    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    pub fn bodies(&self) -> &[Body; BODY_COUNT] {
        &self.bodies
    }

    pub fn joints(&self) -> &[Joint; JOINT_COUNT] {
        &self.joints
    }

    pub fn body(&self, role: BodyRole) -> &Body {
        &self.bodies[role.index()]
    }

    pub fn body_mut(&mut self, role: BodyRole) -> &mut Body {
        &mut self.bodies[role.index()]
    }

    pub fn anchor(&self) -> &Body {
        self.body(BodyRole::Anchor)
    }

    pub fn card(&self) -> &Body {
        self.body(BodyRole::Card)
    }

    pub fn card_mut(&mut self) -> &mut Body {
        self.body_mut(BodyRole::Card)
    }

    pub fn sleep_config(&self) -> &SleepConfig {
        &self.sleep
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.bodies.iter().map(|b| b.position)
    }

    pub fn transforms(&self) -> [Transform; BODY_COUNT] {
        self.bodies.each_ref().map(Body::transform)
    }

    /// Current separation of each rope pair, anchor side first.
    pub fn rope_separations(&self) -> [f32; ROPE_COUNT] {
        let mut out = [0.0; ROPE_COUNT];
        for (slot, rope) in out.iter_mut().zip(self.ropes()) {
            *slot = rope.separation(&self.bodies);
        }
        out
    }

    pub fn max_rope_error(&self) -> f32 {
        self.ropes()
            .map(|rope| rope.error(&self.bodies).abs())
            .fold(0.0, f32::max)
    }

    pub fn pivot_error(&self) -> f32 {
        self.joints
            .iter()
            .filter_map(|joint| match joint {
                Joint::Spherical(spherical) => Some(spherical.error(&self.bodies)),
                Joint::Rope(_) => None,
            })
            .fold(0.0, f32::max)
    }

    pub fn is_dragged(&self) -> bool {
        self.card().kind == BodyKind::KinematicallyDriven
    }

    pub fn is_sleeping(&self) -> bool {
        self.bodies
            .iter()
            .filter(|b| b.kind != BodyKind::Fixed)
            .all(Body::is_sleeping)
    }

    pub fn wake_up(&mut self) {
        for body in &mut self.bodies {
            body.wake_up();
        }
        self.calm_time = 0.0;
    }

    pub(crate) fn fall_asleep(&mut self) {
        for body in self.bodies.iter_mut().filter(|b| b.kind != BodyKind::Fixed) {
            body.put_to_sleep();
        }
    }

    fn ropes(&self) -> impl Iterator<Item = &RopeJoint> + '_ {
        self.joints.iter().filter_map(|joint| match joint {
            Joint::Rope(rope) => Some(rope),
            Joint::Spherical(_) => None,
        })
    }
}

/// Builds a chain at its origin. Shorthand for `Chain::new`.
pub fn create_chain(origin: Vec3) -> Chain {
    Chain::new(origin)
}

pub struct ChainBuilder {
    origin: Vec3,
    rope_length: f32,
    rope_mode: RopeMode,
    card_pivot: Vec3,
    linear_damping: f32,
    angular_damping: f32,
    can_sleep: bool,
    sleep: SleepConfig,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self {
            origin: Vec3::ZERO,
            rope_length: DEFAULT_ROPE_LENGTH,
            rope_mode: RopeMode::Taut,
            card_pivot: DEFAULT_CARD_PIVOT,
            linear_damping: DEFAULT_DAMPING,
            angular_damping: DEFAULT_DAMPING,
            can_sleep: true,
            sleep: SleepConfig::default(),
        }
    }

    pub fn origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn rope_length(mut self, length: f32) -> Self {
        self.rope_length = length;
        self
    }

    pub fn rope_mode(mut self, mode: RopeMode) -> Self {
        self.rope_mode = mode;
        self
    }

    pub fn card_pivot(mut self, pivot: Vec3) -> Self {
        self.card_pivot = pivot;
        self
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    pub fn sleep(mut self, sleep: SleepConfig) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn build(self) -> Chain {
        let ball = Collider::Ball {
            radius: JOINT_RADIUS,
        };
        let card = Collider::Cuboid {
            half_extents: CARD_HALF_EXTENTS,
        };

        let bodies = BodyRole::ALL.map(|role| {
            let position = self.origin + Vec3::X * (LAYOUT_SPACING * role.index() as f32);
            let body = match role {
                BodyRole::Anchor => Body::fixed(position),
                BodyRole::Joint1 | BodyRole::Joint2 | BodyRole::Joint3 => {
                    Body::dynamic(position).with_collider(ball)
                }
                BodyRole::Card => Body::dynamic(position).with_collider(card),
            };
            body.with_damping(self.linear_damping, self.angular_damping)
                .with_can_sleep(self.can_sleep)
        });

        let rope = |a, b| Joint::Rope(RopeJoint::new(a, b, self.rope_length).with_mode(self.rope_mode));
        let joints = [
            rope(BodyRole::Anchor, BodyRole::Joint1),
            rope(BodyRole::Joint1, BodyRole::Joint2),
            rope(BodyRole::Joint2, BodyRole::Joint3),
            Joint::Spherical(SphericalJoint::new(
                BodyRole::Joint3,
                BodyRole::Card,
                Vec3::ZERO,
                self.card_pivot,
            )),
        ];

        Chain {
            bodies,
            joints,
            sleep: self.sleep,
            calm_time: 0.0,
        }
    }
}

impl Default for ChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_layout_runs_along_x_from_origin() {
        let origin = Vec3::new(0.0, 4.0, 0.0);
        let chain = Chain::new(origin);

        let expected = [0.0, 0.5, 1.0, 1.5, 2.0].map(|x| origin + Vec3::new(x, 0.0, 0.0));
        assert_eq!(chain.positions().collect::<Vec<_>>(), expected.to_vec());
        assert_eq!(chain.rope_separations(), [0.5; ROPE_COUNT]);
    }

    #[test]
    fn roles_and_kinds_are_fixed() {
        let chain = create_chain(Vec3::ZERO);

        assert_eq!(chain.anchor().kind, BodyKind::Fixed);
        for role in [BodyRole::Joint1, BodyRole::Joint2, BodyRole::Joint3, BodyRole::Card] {
            assert_eq!(chain.body(role).kind, BodyKind::Dynamic);
            assert_eq!(chain.body(role).linear_damping, 4.0);
            assert!(chain.body(role).lerped.is_none());
        }
        assert_eq!(
            chain.joints().iter().map(|j| j.bodies()).collect::<Vec<_>>(),
            vec![
                (BodyRole::Anchor, BodyRole::Joint1),
                (BodyRole::Joint1, BodyRole::Joint2),
                (BodyRole::Joint2, BodyRole::Joint3),
                (BodyRole::Joint3, BodyRole::Card),
            ]
        );
    }

    #[test]
    fn wake_up_clears_sleep_on_every_body() {
        let mut chain = Chain::new(Vec3::ZERO);
        chain.fall_asleep();
        assert!(chain.is_sleeping());
        assert!(!chain.anchor().is_sleeping());

        chain.wake_up();
        assert!(!chain.is_sleeping());
    }
}
