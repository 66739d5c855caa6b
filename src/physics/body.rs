use crate::math::Transform;
use glam::{Quat, Vec3};

pub const DEFAULT_DAMPING: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves.
    Fixed,
    /// Advanced by the solver from gravity, damping and joints.
    Dynamic,
    /// Position set from outside each frame; excluded from force integration.
    KinematicallyDriven,
}

/// Shape attached to a body. Only used for mass and inertia at unit density;
/// contacts are not resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// No shape: treated as a unit point mass.
    None,
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Collider {
    pub fn mass(&self) -> f32 {
        match *self {
            Collider::None => 1.0,
            Collider::Ball { radius } => 4.0 / 3.0 * std::f32::consts::PI * radius.powi(3),
            Collider::Cuboid { half_extents } => {
                8.0 * half_extents.x * half_extents.y * half_extents.z
            }
        }
    }

    /// Principal moments of inertia in the body frame.
    pub fn principal_inertia(&self) -> Vec3 {
        let mass = self.mass();
        match *self {
            Collider::None => Vec3::splat(mass),
            Collider::Ball { radius } => Vec3::splat(0.4 * mass * radius * radius),
            Collider::Cuboid { half_extents } => {
                let sq = half_extents * half_extents;
                Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 3.0)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub kind: BodyKind,
    pub collider: Collider,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub can_sleep: bool,
    /// Lagged copy of `position` kept for the band curve.
    pub lerped: Option<Vec3>,
    pub(crate) sleeping: bool,
    pub(crate) previous_position: Vec3,
    pub(crate) previous_rotation: Quat,
}

impl Body {
    pub fn new(position: Vec3, kind: BodyKind) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            kind,
            collider: Collider::None,
            linear_damping: DEFAULT_DAMPING,
            angular_damping: DEFAULT_DAMPING,
            can_sleep: true,
            lerped: None,
            sleeping: false,
            previous_position: position,
            previous_rotation: Quat::IDENTITY,
        }
    }

    pub fn fixed(position: Vec3) -> Self {
        Self::new(position, BodyKind::Fixed)
    }

    pub fn dynamic(position: Vec3) -> Self {
        Self::new(position, BodyKind::Dynamic)
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = collider;
        self
    }

    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn with_can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }

    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.transform().transform_point(local)
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn wake_up(&mut self) {
        self.sleeping = false;
    }

    /// Zero for anything the solver may not push around.
    pub fn inverse_mass(&self) -> f32 {
        match self.kind {
            BodyKind::Fixed | BodyKind::KinematicallyDriven => 0.0,
            BodyKind::Dynamic => 1.0 / self.collider.mass(),
        }
    }

    /// Applies the world-space inverse inertia tensor to `v`.
    pub fn inverse_inertia_mul(&self, v: Vec3) -> Vec3 {
        match self.kind {
            BodyKind::Fixed | BodyKind::KinematicallyDriven => Vec3::ZERO,
            BodyKind::Dynamic => {
                let local = self.rotation.conjugate() * v;
                self.rotation * (local / self.collider.principal_inertia())
            }
        }
    }

    /// Rotates the body by the small world-space rotation vector `delta`.
    pub(crate) fn rotate_by(&mut self, delta: Vec3) {
        let spin = Quat::from_xyzw(delta.x, delta.y, delta.z, 0.0) * self.rotation;
        self.rotation = (self.rotation + spin * 0.5).normalize();
    }

    pub(crate) fn integrate(&mut self, dt: f32, gravity: Vec3) {
        self.previous_position = self.position;
        self.previous_rotation = self.rotation;

        match self.kind {
            BodyKind::Fixed => {}
            BodyKind::KinematicallyDriven => self.integrate_rotation(dt),
            BodyKind::Dynamic => {
                self.linear_velocity += gravity * dt;
                self.linear_velocity *= (-self.linear_damping * dt).exp();
                self.position += self.linear_velocity * dt;
                self.integrate_rotation(dt);
            }
        }
    }

    fn integrate_rotation(&mut self, dt: f32) {
        self.angular_velocity *= (-self.angular_damping * dt).exp();
        self.rotate_by(self.angular_velocity * dt);
    }

    /// Re-derives velocities from the pose change made during the step.
    pub(crate) fn derive_velocities(&mut self, dt: f32) {
        if self.kind != BodyKind::Dynamic {
            return;
        }

        self.linear_velocity = (self.position - self.previous_position) / dt;

        let delta = self.rotation * self.previous_rotation.conjugate();
        let omega = delta.xyz() * (2.0 / dt);
        self.angular_velocity = if delta.w < 0.0 { -omega } else { omega };
    }

    pub(crate) fn put_to_sleep(&mut self) {
        self.sleeping = true;
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}
