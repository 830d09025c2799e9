use num::Float;

use super::{horner, pow2, IntLanes};
use crate::simd::backend::Backend;
use crate::simd::element::FloatElement;
use crate::simd::traits::{FloatVector, SimdVector};
use crate::simd::vector::Vector;

/// Natural exponential `e^x`.
///
/// # Algorithm
///
/// 1. Range reduction: `x = k * ln 2 + r` with `k = round(x / ln 2)`, so `|r| <= ln 2 / 2`.
///    `ln 2` is applied in two pieces so `k * LN2_HI` is exact.
/// 2. `e^r` from its Taylor series, evaluated with Horner's scheme.
/// 3. Reconstruction: `e^x = e^r * 2^(k/2) * 2^(k - k/2)`. Scaling in two halves keeps
///    both factors normal, so results that land in the subnormal range are rounded once
///    by the final multiply instead of being flushed.
///
/// Inputs above `EXP_MAX` give `+inf`, inputs below `EXP_MIN` give `0`, NaN stays NaN.
#[inline(always)]
pub(crate) fn exp<T: FloatElement, const N: usize, B: Backend>(x: Vector<T, N, B>) -> Vector<T, N, B> {
    let splat = Vector::<T, N, B>::splat;

    let k = (x * T::from_f64(std::f64::consts::LOG2_E)).round();
    let r = k.fmuladd(splat(-T::LN2_HI), x);
    let r = k.fmuladd(splat(-T::LN2_LO), r);

    let p = horner(r, T::EXP_POLY);

    let k: IntLanes<T, N, B> = k.round_to_int();
    let half = k >> 1;
    let result = p * pow2::<T, N, B>(half) * pow2::<T, N, B>(k - half);

    // NaN compares false on both sides and flows through unchanged.
    let result = Vector::select(x.cmp_gt(splat(T::EXP_MAX)), splat(<T as Float>::infinity()), result);
    Vector::select(x.cmp_lt(splat(T::EXP_MIN)), Vector::zero(), result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::math::testing::{rel_err, sweep};

    #[test]
    fn exact_points() {
        let v = Vector::<f64, 4>::from_array([0.0, -0.0, 1.0, f64::NEG_INFINITY]);
        let e = v.exp().to_array();
        assert_eq!(e[0], 1.0);
        assert_eq!(e[1], 1.0);
        assert!(rel_err(e[2], std::f64::consts::E) <= 2.0 * f64::EPSILON);
        assert_eq!(e[3], 0.0);
    }

    #[test]
    fn special_values() {
        let v = Vector::<f32, 4>::from_array([f32::NAN, f32::INFINITY, 100.0, -200.0]);
        let e = v.exp().to_array();
        assert!(e[0].is_nan());
        assert_eq!(e[1], f32::INFINITY);
        assert_eq!(e[2], f32::INFINITY);
        assert_eq!(e[3], 0.0);
    }

    #[test]
    fn f32_relative_error_on_normal_results() {
        let xs: Vec<f32> = sweep(-87.0, 88.0, 4096).map(|x| x as f32).collect();
        for chunk in xs.chunks(16) {
            let v = Vector::<f32, 16>::load_partial(chunk);
            let got = v.exp();
            for (i, &x) in chunk.iter().enumerate() {
                let want = (x as f64).exp() as f32;
                let err = rel_err(got[i], want);
                assert!(err <= 4.0 * f32::EPSILON, "exp({x}) = {} want {want}", got[i]);
            }
        }
    }

    #[test]
    fn f64_relative_error_on_normal_results() {
        let xs: Vec<f64> = sweep(-708.0, 709.0, 4096).collect();
        for chunk in xs.chunks(8) {
            let v = Vector::<f64, 8>::load_partial(chunk);
            let got = v.exp();
            for (i, &x) in chunk.iter().enumerate() {
                let want = x.exp();
                assert!(rel_err(got[i], want) <= 4.0 * f64::EPSILON, "exp({x})");
            }
        }
    }

    #[test]
    fn subnormal_results_are_graded() {
        let v = Vector::<f32, 4>::from_array([-90.0, -95.0, -100.0, -103.0]);
        for (got, x) in v.exp().iter().zip(v.iter()) {
            let want = (x as f64).exp() as f32;
            assert!(got > 0.0);
            assert!(((got - want) / f32::from_bits(1)).abs() <= 2.0, "exp({x})");
        }
        let w = Vector::<f64, 2>::from_array([-740.0, -744.0]);
        assert!(w.exp().iter().all(|y| y > 0.0 && y < f64::MIN_POSITIVE));
    }
}
