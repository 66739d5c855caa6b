use super::body::Body;
use super::chain::{BodyRole, BODY_COUNT};
use glam::Vec3;
use serde::{Deserialize, Serialize};

const EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RopeMode {
    /// Holds the endpoints at exactly the rope length.
    #[default]
    Taut,
    /// Only resists stretching past the rope length.
    Slack,
}

/// Distance constraint between two local anchor points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RopeJoint {
    pub bodies: (BodyRole, BodyRole),
    pub local_anchors: (Vec3, Vec3),
    pub length: f32,
    pub mode: RopeMode,
}

impl RopeJoint {
    pub fn new(a: BodyRole, b: BodyRole, length: f32) -> Self {
        Self {
            bodies: (a, b),
            local_anchors: (Vec3::ZERO, Vec3::ZERO),
            length,
            mode: RopeMode::Taut,
        }
    }

    pub fn with_mode(mut self, mode: RopeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn separation(&self, bodies: &[Body; BODY_COUNT]) -> f32 {
        let (a, b) = self.world_anchors(bodies);
        (b - a).length()
    }

    /// Signed deviation from the rope length, respecting slack.
    pub fn error(&self, bodies: &[Body; BODY_COUNT]) -> f32 {
        let error = self.separation(bodies) - self.length;
        match self.mode {
            RopeMode::Slack if error < 0.0 => 0.0,
            _ => error,
        }
    }

    fn world_anchors(&self, bodies: &[Body; BODY_COUNT]) -> (Vec3, Vec3) {
        let (a, b) = self.bodies;
        (
            bodies[a.index()].local_to_world(self.local_anchors.0),
            bodies[b.index()].local_to_world(self.local_anchors.1),
        )
    }

    fn solve(&self, bodies: &mut [Body; BODY_COUNT]) {
        let (a, b) = (self.bodies.0.index(), self.bodies.1.index());
        let (anchor_a, anchor_b) = self.world_anchors(bodies);

        let delta = anchor_b - anchor_a;
        let len = delta.length();
        let error = len - self.length;
        if self.mode == RopeMode::Slack && error <= 0.0 {
            return;
        }

        let wa = bodies[a].inverse_mass();
        let wb = bodies[b].inverse_mass();
        let w = wa + wb;
        if w <= 0.0 {
            return;
        }

        let direction = if len > EPSILON { delta / len } else { Vec3::Y };
        let correction = direction * (error / w);

        bodies[a].position += correction * wa;
        bodies[b].position -= correction * wb;
    }
}

/// Pins a local point on one body to a local point on another, leaving
/// rotation free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalJoint {
    pub bodies: (BodyRole, BodyRole),
    pub local_anchors: (Vec3, Vec3),
}

impl SphericalJoint {
    pub fn new(a: BodyRole, b: BodyRole, anchor_a: Vec3, anchor_b: Vec3) -> Self {
        Self {
            bodies: (a, b),
            local_anchors: (anchor_a, anchor_b),
        }
    }

    pub fn error(&self, bodies: &[Body; BODY_COUNT]) -> f32 {
        let (a, b) = self.bodies;
        let target = bodies[a.index()].local_to_world(self.local_anchors.0);
        let pivot = bodies[b.index()].local_to_world(self.local_anchors.1);
        (target - pivot).length()
    }

    /// The second body absorbs the whole correction when it is dynamic: it
    /// turns about its own centre by its generalized inverse mass, then
    /// translates so the pivot lands exactly on the first body's anchor. A
    /// pinned second body drags the first one along instead.
    fn solve(&self, bodies: &mut [Body; BODY_COUNT]) {
        let (a, b) = (self.bodies.0.index(), self.bodies.1.index());
        let target = bodies[a].local_to_world(self.local_anchors.0);

        if bodies[b].is_dynamic() {
            let anchor = self.local_anchors.1;
            let body = &mut bodies[b];

            let arm = body.rotation * anchor;
            let delta = target - (body.position + arm);
            let len = delta.length();
            if len <= EPSILON {
                body.position += delta;
                return;
            }

            let direction = delta / len;
            let arm_cross = arm.cross(direction);
            let w = body.inverse_mass() + arm_cross.dot(body.inverse_inertia_mul(arm_cross));
            if w > 0.0 {
                let impulse = direction * (len / w);
                let turn = body.inverse_inertia_mul(arm.cross(impulse));
                body.rotate_by(turn);
            }

            let pivot = body.local_to_world(anchor);
            body.position += target - pivot;
        } else if bodies[a].is_dynamic() {
            let pivot = bodies[b].local_to_world(self.local_anchors.1);
            bodies[a].position += pivot - target;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Joint {
    Rope(RopeJoint),
    Spherical(SphericalJoint),
}

impl Joint {
    pub fn bodies(&self) -> (BodyRole, BodyRole) {
        match self {
            Joint::Rope(rope) => rope.bodies,
            Joint::Spherical(spherical) => spherical.bodies,
        }
    }

    /// Absolute constraint violation in world units.
    pub fn error(&self, bodies: &[Body; BODY_COUNT]) -> f32 {
        match self {
            Joint::Rope(rope) => rope.error(bodies).abs(),
            Joint::Spherical(spherical) => spherical.error(bodies),
        }
    }

    pub(crate) fn solve(&self, bodies: &mut [Body; BODY_COUNT]) {
        match self {
            Joint::Rope(rope) => rope.solve(bodies),
            Joint::Spherical(spherical) => spherical.solve(bodies),
        }
    }
}
