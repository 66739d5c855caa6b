use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const MIN_CATCH_UP_DISTANCE: f32 = 0.1;
pub const MAX_CATCH_UP_DISTANCE: f32 = 1.0;

/// Speed-scaled lerp that makes a lagged copy of a moving point.
///
/// The further the copy trails behind, the faster it catches up. The lerp
/// factor is not clamped, so large frame times can overshoot the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Smoothing {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            min_speed: 0.0,
            max_speed: 50.0,
        }
    }
}

impl Smoothing {
    pub fn new(min_speed: f32, max_speed: f32) -> Self {
        Self {
            min_speed,
            max_speed,
        }
    }

    pub fn factor(&self, lag: f32, dt: f32) -> f32 {
        let lag = lag.clamp(MIN_CATCH_UP_DISTANCE, MAX_CATCH_UP_DISTANCE);
        dt * (self.min_speed + lag * (self.max_speed - self.min_speed))
    }

    /// Moves `lerped` toward `target`, seeding it with `target` on first use.
    pub fn advance(&self, lerped: &mut Option<Vec3>, target: Vec3, dt: f32) -> Vec3 {
        let current = *lerped.get_or_insert(target);
        let t = if dt.is_finite() && dt > 0.0 {
            self.factor(current.distance(target), dt)
        } else {
            0.0
        };

        let next = current.lerp(target, t);
        *lerped = Some(next);
        next
    }
}
