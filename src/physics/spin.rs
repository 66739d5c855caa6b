use super::body::Body;

pub const SPIN_CORRECTION_GAIN: f32 = 0.25;

/// Nudges the card's yaw rate against its current yaw so it settles facing
/// forward. Reads the quaternion's `y` component, not an Euler angle.
pub fn correct_spin(card: &mut Body) {
    correct_spin_with_gain(card, SPIN_CORRECTION_GAIN);
}

pub fn correct_spin_with_gain(card: &mut Body, gain: f32) {
    card.angular_velocity.y -= card.rotation.y * gain;
}
