use super::smoothing::Smoothing;
use crate::math::{CatmullRom, CurveType};
use crate::physics::{BodyRole, Chain};
use glam::Vec3;

pub const BAND_SEGMENTS: usize = 32;
pub const BAND_POINTS: usize = BAND_SEGMENTS + 1;
pub const CONTROL_POINTS: usize = 4;

/// Turns the chain into the dense polyline the band is drawn along.
///
/// Joint1 and joint2 are smoothed before they become control points; the
/// free end (joint3) and the anchor are used as-is. The sample buffer is
/// reused frame to frame.
#[derive(Debug, Clone)]
pub struct BandSampler {
    smoothing: Smoothing,
    curve: CatmullRom<CONTROL_POINTS>,
    points: [Vec3; BAND_POINTS],
}

impl Default for BandSampler {
    fn default() -> Self {
        Self::new(Smoothing::default())
    }
}

impl BandSampler {
    pub fn new(smoothing: Smoothing) -> Self {
        Self {
            smoothing,
            curve: CatmullRom::chordal([Vec3::ZERO; CONTROL_POINTS]),
            points: [Vec3::ZERO; BAND_POINTS],
        }
    }

    /// Swaps the knot spacing. Chordal unless told otherwise.
    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve = CatmullRom::new(*self.curve.points(), curve_type);
        self
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve.curve_type()
    }

    pub fn update(&mut self, chain: &mut Chain, dt: f32) -> &[Vec3; BAND_POINTS] {
        let lerped1 = self.smooth(chain, BodyRole::Joint1, dt);
        let lerped2 = self.smooth(chain, BodyRole::Joint2, dt);

        self.curve.set_points([
            chain.body(BodyRole::Joint3).position,
            lerped2,
            lerped1,
            chain.anchor().position,
        ]);
        self.curve.sample_into(&mut self.points);
        &self.points
    }

    fn smooth(&self, chain: &mut Chain, role: BodyRole, dt: f32) -> Vec3 {
        let body = chain.body_mut(role);
        let target = body.position;
        self.smoothing.advance(&mut body.lerped, target, dt)
    }

    /// Last sampled polyline, free end first.
    pub fn points(&self) -> &[Vec3; BAND_POINTS] {
        &self.points
    }

    pub fn control_points(&self) -> &[Vec3; CONTROL_POINTS] {
        self.curve.points()
    }

    /// The polyline as packed xyz floats, ready for a vertex buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.points)
    }
}

/// One-shot form of [`BandSampler::update`].
pub fn update_curve(
    chain: &mut Chain,
    min_speed: f32,
    max_speed: f32,
    dt: f32,
) -> [Vec3; BAND_POINTS] {
    let mut sampler = BandSampler::new(Smoothing::new(min_speed, max_speed));
    *sampler.update(chain, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::step;

    const DT: f32 = 1.0 / 60.0;
    const GRAVITY: Vec3 = Vec3::new(0.0, -40.0, 0.0);

    #[test]
    fn first_frame_uses_raw_positions() {
        let mut chain = Chain::new(Vec3::new(0.0, 4.0, 0.0));
        let mut sampler = BandSampler::default();
        sampler.update(&mut chain, DT);

        assert_eq!(
            *sampler.control_points(),
            [
                Vec3::new(1.5, 4.0, 0.0),
                Vec3::new(1.0, 4.0, 0.0),
                Vec3::new(0.5, 4.0, 0.0),
                Vec3::new(0.0, 4.0, 0.0),
            ]
        );
        assert!(chain.body(BodyRole::Joint1).lerped.is_some());
        assert!(chain.body(BodyRole::Joint2).lerped.is_some());
        assert!(chain.body(BodyRole::Joint3).lerped.is_none());
    }

    #[test]
    fn end_control_points_track_bodies_exactly() {
        let mut chain = Chain::new(Vec3::new(0.0, 4.0, 0.0));
        let mut sampler = BandSampler::default();

        for _ in 0..200 {
            step(&mut chain, DT, GRAVITY);
            let points = *sampler.update(&mut chain, DT);

            let controls = sampler.control_points();
            assert_eq!(controls[0], chain.body(BodyRole::Joint3).position);
            assert_eq!(controls[3], chain.anchor().position);
            assert_eq!(points[0], controls[0]);
            assert!((points[BAND_SEGMENTS] - controls[3]).length() < 1e-4);
        }
    }

    #[test]
    fn always_yields_thirty_three_points() {
        let mut chain = Chain::new(Vec3::ZERO);
        let points = update_curve(&mut chain, 0.0, 50.0, DT);
        assert_eq!(points.len(), 33);

        let sampler = BandSampler::default();
        assert_eq!(sampler.as_floats().len(), 33 * 3);
    }

    #[test]
    fn float_view_matches_points() {
        let mut chain = Chain::new(Vec3::new(0.0, 4.0, 0.0));
        let mut sampler = BandSampler::default();
        sampler.update(&mut chain, DT);

        let floats = sampler.as_floats();
        let last = sampler.points()[BAND_SEGMENTS];
        assert_eq!(&floats[BAND_SEGMENTS * 3..], &last.to_array());
    }
}
