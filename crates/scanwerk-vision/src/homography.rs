// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Projective transform between two quadrilaterals.

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

/// A 3x3 planar homography with `h[(2, 2)] == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    /// Solve the direct linear transform mapping each `src[i]` onto `dst[i]`.
    ///
    /// Fixing `h33 = 1` leaves an 8x8 linear system, solved by LU. Returns
    /// `None` when the system is singular or the solution is not finite.
    pub fn from_pairs(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Option<Self> {
        let mut m = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();

        for i in 0..4 {
            let [sx, sy] = src[i];
            let [dx, dy] = dst[i];
            let r = i * 2;

            m[(r, 0)] = sx;
            m[(r, 1)] = sy;
            m[(r, 2)] = 1.0;
            m[(r, 6)] = -sx * dx;
            m[(r, 7)] = -sy * dx;
            b[r] = dx;

            m[(r + 1, 3)] = sx;
            m[(r + 1, 4)] = sy;
            m[(r + 1, 5)] = 1.0;
            m[(r + 1, 6)] = -sx * dy;
            m[(r + 1, 7)] = -sy * dy;
            b[r + 1] = dy;
        }

        let v = m.lu().solve(&b)?;
        if v.iter().any(|x| !x.is_finite()) {
            return None;
        }
        let h = Matrix3::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], 1.0);
        Some(Self { h })
    }

    /// Inverse transform, renormalised so that `h33 == 1`.
    pub fn inverse(&self) -> Option<Self> {
        let inv = self.h.try_inverse()?;
        let scale = inv[(2, 2)];
        if scale.abs() < f64::EPSILON || !scale.is_finite() {
            return None;
        }
        Some(Self { h: inv / scale })
    }

    /// Map a point through the transform. Returns `None` for points that land
    /// on the line at infinity.
    pub fn project(&self, p: [f64; 2]) -> Option<[f64; 2]> {
        let res = self.h * Vector3::new(p[0], p[1], 1.0);
        let w = res[2];
        if w.abs() < f64::EPSILON {
            return None;
        }
        Some([res[0] / w, res[1] / w])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const UNIT: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    #[test]
    fn identity_for_equal_quads() {
        let h = Homography::from_pairs(&UNIT, &UNIT).unwrap();
        assert!((h.h - Matrix3::identity()).abs().max() < 1e-12);
    }

    #[test]
    fn maps_corners_exactly() {
        let src = [[100.0, 100.0], [900.0, 120.0], [880.0, 880.0], [120.0, 900.0]];
        let dst = [[0.0, 0.0], [800.0, 0.0], [800.0, 800.0], [0.0, 800.0]];
        let h = Homography::from_pairs(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let p = h.project(*s).unwrap();
            assert!((p[0] - d[0]).abs() < 1e-6 && (p[1] - d[1]).abs() < 1e-6, "{p:?} vs {d:?}");
        }
    }

    #[test]
    fn degenerate_source_is_rejected() {
        let src = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        assert!(Homography::from_pairs(&src, &UNIT).is_none());
    }

    proptest! {
        #[test]
        fn inverse_round_trips(
            jitter in proptest::array::uniform8(-30.0f64..30.0),
            px in 0.0f64..400.0,
            py in 0.0f64..300.0,
        ) {
            let src = [
                [50.0 + jitter[0], 40.0 + jitter[1]],
                [450.0 + jitter[2], 35.0 + jitter[3]],
                [460.0 + jitter[4], 330.0 + jitter[5]],
                [45.0 + jitter[6], 340.0 + jitter[7]],
            ];
            let dst = [[0.0, 0.0], [400.0, 0.0], [400.0, 300.0], [0.0, 300.0]];
            let forward = Homography::from_pairs(&src, &dst).unwrap();
            let back = forward.inverse().unwrap();
            let q = forward.project(back.project([px, py]).unwrap()).unwrap();
            prop_assert!((q[0] - px).abs() < 1e-6 && (q[1] - py).abs() < 1e-6);
        }
    }
}
