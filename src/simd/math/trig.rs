use num::Float;

use super::{horner, IntLanes};
use crate::simd::backend::Backend;
use crate::simd::element::FloatElement;
use crate::simd::mask::Mask;
use crate::simd::traits::{FloatVector, MaskVector, SignedVector, SimdVector};
use crate::simd::vector::Vector;

/// Shared range reduction and both polynomials, computed once for `sin`, `cos` and
/// `sincos`.
struct Octant<T: FloatElement, const N: usize, B: Backend> {
    x: Vector<T, N, B>,
    /// `sin` of the reduced argument, before sign and swap fix-up.
    sin_r: Vector<T, N, B>,
    /// `cos` of the reduced argument, before sign and swap fix-up.
    cos_r: Vector<T, N, B>,
    /// Lanes whose octant pair swaps the roles of the two polynomials.
    swap: Mask<N>,
    /// Lanes where `sin` changes sign.
    sin_neg: Mask<N>,
    /// Lanes where `cos` changes sign.
    cos_neg: Mask<N>,
    /// Infinite and NaN inputs.
    invalid: Mask<N>,
    /// Lanes past `T::TRIG_MAX`, where the three-piece reduction runs out of bits.
    beyond: Mask<N>,
}

/// Cody-Waite reduction modulo `pi / 4`.
///
/// `q = trunc(|x| * 4 / pi)` rounded up to even picks the octant pair; the reduced
/// argument `r = |x| - q * pi / 4` lies in `[-pi/4, pi/4]` and `pi / 4` is subtracted
/// in three pieces so the first two products are exact for `|x| <= T::TRIG_MAX`.
/// The octant stays in the float domain, so no lane can overflow an integer.
#[inline(always)]
fn reduce<T: FloatElement, const N: usize, B: Backend>(x: Vector<T, N, B>) -> Octant<T, N, B> {
    let splat = Vector::<T, N, B>::splat;
    let half = splat(T::from_f64(0.5));
    let two = splat(T::from_f64(2.0));

    let ax = x.abs();
    let q = (ax * T::from_f64(4.0 / std::f64::consts::PI)).trunc();
    let y = ((q + T::one()) * half).floor() * two;

    let [dp1, dp2, dp3] = T::PIO4;
    let r = y.fmuladd(splat(-dp1), ax);
    let r = y.fmuladd(splat(-dp2), r);
    let r = y.fmuladd(splat(-dp3), r);

    let z = r * r;
    let sin_r = (r * z).fmuladd(horner(z, T::SIN_POLY), r);
    let cos_r = (z * z).fmuladd(horner(z, T::COS_POLY), z.fmuladd(-half, splat(T::one())));

    // y mod 8 is one of 0, 2, 4, 6
    let octant = y - (y * T::from_f64(0.125)).floor() * T::from_f64(8.0);
    let swap = octant.cmp_eq(two) | octant.cmp_eq(splat(T::from_f64(6.0)));
    let upper = octant.cmp_ge(splat(T::from_f64(4.0)));
    let negative_input = x.to_int_bits().cmp_lt(IntLanes::<T, N, B>::zero());

    Octant {
        x,
        sin_r,
        cos_r,
        swap,
        sin_neg: upper ^ negative_input,
        cos_neg: upper ^ swap,
        invalid: !x.is_finite(),
        beyond: ax.cmp_gt(splat(T::TRIG_MAX)),
    }
}

impl<T: FloatElement, const N: usize, B: Backend> Octant<T, N, B> {
    #[inline(always)]
    fn sin(&self) -> Vector<T, N, B> {
        let v = Vector::select(self.swap, self.cos_r, self.sin_r);
        self.fix_up(v.neg_masked(self.sin_neg), <T as Float>::sin)
    }

    #[inline(always)]
    fn cos(&self) -> Vector<T, N, B> {
        let v = Vector::select(self.swap, self.sin_r, self.cos_r);
        self.fix_up(v.neg_masked(self.cos_neg), <T as Float>::cos)
    }

    /// NaN for non-finite input; lanes too large for the reduction take the scalar
    /// result.
    #[inline(always)]
    fn fix_up(&self, v: Vector<T, N, B>, scalar: impl Fn(T) -> T) -> Vector<T, N, B> {
        let mut v = Vector::select(self.invalid, Vector::splat(<T as Float>::nan()), v);
        if self.beyond.hlor() {
            perf_warning!(
                "{} trigonometric argument beyond {:?}; those lanes use the scalar function",
                T::NAME,
                T::TRIG_MAX
            );
            for i in 0..N {
                if self.beyond[i] {
                    v[i] = scalar(self.x[i]);
                }
            }
        }
        v
    }
}

/// Sine, accurate to about one unit in the last place for every finite `x`. Lanes
/// with `|x|` above `8192` (f32) or `2^30` (f64) are reduced by the scalar `sin`.
/// NaN and infinities give NaN; the sign of zero is kept.
#[inline(always)]
pub(crate) fn sin<T: FloatElement, const N: usize, B: Backend>(x: Vector<T, N, B>) -> Vector<T, N, B> {
    reduce(x).sin()
}

/// Cosine, over the same domain as [`sin`].
#[inline(always)]
pub(crate) fn cos<T: FloatElement, const N: usize, B: Backend>(x: Vector<T, N, B>) -> Vector<T, N, B> {
    reduce(x).cos()
}

/// Both at once; bit-identical to calling [`sin`] and [`cos`] separately.
#[inline(always)]
pub(crate) fn sincos<T: FloatElement, const N: usize, B: Backend>(
    x: Vector<T, N, B>,
) -> (Vector<T, N, B>, Vector<T, N, B>) {
    let octant = reduce(x);
    (octant.sin(), octant.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::math::testing::sweep;

    fn check_f32(lo: f64, hi: f64, tol: f64) {
        let xs: Vec<f32> = sweep(lo, hi, 8192).map(|x| x as f32).collect();
        for chunk in xs.chunks(16) {
            let v = Vector::<f32, 16>::load_partial(chunk);
            let (s, c) = v.sincos();
            for (i, &x) in chunk.iter().enumerate() {
                let x64 = x as f64;
                assert!((s[i] as f64 - x64.sin()).abs() <= tol, "sin({x}) = {}", s[i]);
                assert!((c[i] as f64 - x64.cos()).abs() <= tol, "cos({x}) = {}", c[i]);
            }
        }
    }

    #[test]
    fn f32_near_zero() {
        check_f32(-4.0, 4.0, 1e-6);
    }

    #[test]
    fn f32_whole_tested_range() {
        check_f32(-8192.0, 8192.0, 1e-6);
    }

    #[test]
    fn f64_accuracy() {
        let xs: Vec<f64> = sweep(-1000.0, 1000.0, 8192).collect();
        for chunk in xs.chunks(8) {
            let v = Vector::<f64, 8>::load_partial(chunk);
            let s = v.sin();
            let c = v.cos();
            for (i, &x) in chunk.iter().enumerate() {
                assert!((s[i] - x.sin()).abs() <= 1e-14, "sin({x}) = {}", s[i]);
                assert!((c[i] - x.cos()).abs() <= 1e-14, "cos({x}) = {}", c[i]);
            }
        }
    }

    #[test]
    fn sincos_matches_separate_calls() {
        let v = Vector::<f64, 4>::from_array([0.3, -2.0, 100.0, 7.5]);
        let (s, c) = v.sincos();
        assert!(s.bits_eq(&v.sin()));
        assert!(c.bits_eq(&v.cos()));
    }

    #[test]
    fn special_values() {
        let v = Vector::<f32, 4>::from_array([0.0, -0.0, f32::NAN, f32::INFINITY]);
        let s = v.sin().to_array();
        let c = v.cos().to_array();
        assert_eq!(s[0].to_bits(), 0.0f32.to_bits());
        assert_eq!(s[1].to_bits(), (-0.0f32).to_bits());
        assert_eq!(c[0], 1.0);
        assert_eq!(c[1], 1.0);
        assert!(s[2].is_nan() && c[2].is_nan());
        assert!(s[3].is_nan() && c[3].is_nan());
    }

    #[test]
    fn edge_of_the_reduction_range() {
        let xs = [8192.0f32, -8192.0, 8191.9, 6433.98];
        let (s, c) = Vector::<f32, 4>::from_array(xs).sincos();
        for (i, &x) in xs.iter().enumerate() {
            let x = x as f64;
            assert!((s[i] as f64 - x.sin()).abs() <= 1e-6, "sin({x}) = {}", s[i]);
            assert!((c[i] as f64 - x.cos()).abs() <= 1e-6, "cos({x}) = {}", c[i]);
        }
    }

    #[test]
    fn past_the_reduction_range_uses_scalar_lanes() {
        use crate::simd::backend::Emulation;

        let xs = [2.5e9f32, -1e30, f32::MAX, 8192.5];
        let want_sin = xs.map(f32::sin);
        let want_cos = xs.map(f32::cos);

        let v = Vector::<f32, 4>::from_array(xs);
        assert_eq!(v.sin().to_array(), want_sin);
        assert_eq!(v.cos().to_array(), want_cos);
        let (s, c) = v.to_backend::<Emulation>().sincos();
        assert_eq!(s.to_array(), want_sin);
        assert_eq!(c.to_array(), want_cos);

        let v = Vector::<f64, 2>::from_array([7e18, -f64::MAX]);
        assert_eq!(v.sin().to_array(), [7e18f64.sin(), (-f64::MAX).sin()]);
        assert_eq!(v.cos().to_array(), [7e18f64.cos(), (-f64::MAX).cos()]);
        assert!(v.sin().to_array().iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn quadrant_signs() {
        use std::f64::consts::PI;
        let xs = [PI / 6.0, 5.0 * PI / 6.0, 7.0 * PI / 6.0, 11.0 * PI / 6.0];
        let v = Vector::<f64, 4>::from_array(xs);
        let s = v.sin().to_array();
        let c = v.cos().to_array();
        for i in 0..4 {
            assert!((s[i] - xs[i].sin()).abs() < 1e-15);
            assert!((c[i] - xs[i].cos()).abs() < 1e-15);
        }
    }
}
