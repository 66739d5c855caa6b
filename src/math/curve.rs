use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Knot spacing used between control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveType {
    /// Uniform spacing with tension 0.5.
    Uniform,
    /// Knots spaced by the square root of the chord length.
    Centripetal,
    /// Knots spaced by the chord length.
    #[default]
    Chordal,
}

/// Open Catmull-Rom spline through `N` control points.
///
/// The parameter `t` in `[0, 1]` is spread evenly over the `N - 1` segments,
/// so sampling is evenly parameterized rather than arc-length based. The end
/// segments use mirrored phantom points (`2 * p0 - p1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatmullRom<const N: usize> {
    points: [Vec3; N],
    curve_type: CurveType,
}

impl<const N: usize> CatmullRom<N> {
    const MIN_POINTS: () = assert!(N >= 2, "a Catmull-Rom spline needs at least two points");

    pub fn new(points: [Vec3; N], curve_type: CurveType) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::MIN_POINTS;
        Self { points, curve_type }
    }

    pub fn chordal(points: [Vec3; N]) -> Self {
        Self::new(points, CurveType::Chordal)
    }

    pub fn points(&self) -> &[Vec3; N] {
        &self.points
    }

    pub fn set_points(&mut self, points: [Vec3; N]) {
        self.points = points;
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        let p = (N - 1) as f32 * t.clamp(0.0, 1.0);
        let mut segment = p.floor() as usize;
        let mut weight = p - segment as f32;

        if segment >= N - 1 {
            segment = N - 2;
            weight = 1.0;
        }

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        let p0 = if segment > 0 {
            self.points[segment - 1]
        } else {
            2.0 * self.points[0] - self.points[1]
        };
        let p3 = if segment + 2 < N {
            self.points[segment + 2]
        } else {
            2.0 * self.points[N - 1] - self.points[N - 2]
        };

        let cubic = match self.curve_type {
            CurveType::Uniform => CubicPoly::uniform(p0, p1, p2, p3, 0.5),
            CurveType::Centripetal => CubicPoly::non_uniform(p0, p1, p2, p3, 0.25),
            CurveType::Chordal => CubicPoly::non_uniform(p0, p1, p2, p3, 0.5),
        };
        cubic.eval(weight)
    }

    /// Fills `out` with `out.len()` samples at `t = i / (out.len() - 1)`.
    pub fn sample_into(&self, out: &mut [Vec3]) {
        match out.len() {
            0 => {}
            1 => out[0] = self.point_at(0.0),
            len => {
                let divisions = (len - 1) as f32;
                for (i, slot) in out.iter_mut().enumerate() {
                    *slot = self.point_at(i as f32 / divisions);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CubicPoly {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicPoly {
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, tension: f32) -> Self {
        Self::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
    }

    fn non_uniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, power: f32) -> Self {
        let mut dt0 = p0.distance_squared(p1).powf(power);
        let mut dt1 = p1.distance_squared(p2).powf(power);
        let mut dt2 = p2.distance_squared(p3).powf(power);

        // coincident points
        if dt1 < 1e-4 {
            dt1 = 1.0;
        }
        if dt0 < 1e-4 {
            dt0 = dt1;
        }
        if dt2 < 1e-4 {
            dt2 = dt1;
        }

        let t1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
        let t2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;

        Self::hermite(p1, p2, t1, t2)
    }

    fn eval(&self, t: f32) -> Vec3 {
        let t2 = t * t;
        let t3 = t2 * t;
        self.c0 + self.c1 * t + self.c2 * t2 + self.c3 * t3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn passes_through_every_control_point() {
        let points = [
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 2.5, 0.3),
            Vec3::new(0.4, 3.2, -0.1),
            Vec3::new(0.0, 4.0, 0.0),
        ];
        for curve_type in [CurveType::Uniform, CurveType::Centripetal, CurveType::Chordal] {
            let curve = CatmullRom::new(points, curve_type);
            assert_close(curve.point_at(0.0), points[0]);
            assert_close(curve.point_at(1.0 / 3.0), points[1]);
            assert_close(curve.point_at(2.0 / 3.0), points[2]);
            assert_close(curve.point_at(1.0), points[3]);
        }
    }

    #[test]
    fn collinear_evenly_spaced_points_stay_on_the_line() {
        let curve = CatmullRom::chordal([
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        ]);
        let mut samples = [Vec3::ZERO; 13];
        curve.sample_into(&mut samples);

        for (i, p) in samples.iter().enumerate() {
            assert_close(*p, Vec3::new(i as f32 * 0.25, 0.0, 0.0));
        }
    }

    #[test]
    fn coincident_points_do_not_produce_nan() {
        let curve = CatmullRom::chordal([Vec3::ONE; 4]);
        let mut samples = [Vec3::ZERO; 33];
        curve.sample_into(&mut samples);
        assert!(samples.iter().all(|p| p.is_finite()));
        assert_close(samples[16], Vec3::ONE);
    }

    #[test]
    fn parameter_is_clamped() {
        let curve = CatmullRom::chordal([Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]);
        assert_close(curve.point_at(-1.0), Vec3::ZERO);
        assert_close(curve.point_at(2.0), Vec3::Z);
    }
}
