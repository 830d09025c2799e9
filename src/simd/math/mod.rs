//! Vectorized transcendental functions.
//!
//! Every function here is written once over [`Vector<T, N, B>`] and works for both
//! float widths on every backend: range reduction, a polynomial evaluated with
//! [`fmuladd`](SimdVector::fmuladd), and reconstruction through the IEEE 754 bit layout.
//! The per-width constants live in [`Polynomials`].
//!
//! # Accuracy
//!
//! | Function | Domain tested        | f32 error      | f64 error       |
//! |----------|----------------------|----------------|-----------------|
//! | `exp`    | normal results       | ≤ 4 ε relative | ≤ 4 ε relative  |
//! | `ln`     | positive normals     | ≤ 4 ε relative | ≤ 4 ε relative  |
//! | `sin`    | \|x\| ≤ 8192 (f32)   | ≤ 1e-6 abs     | ≤ 1e-14 abs     |
//! | `cos`    | \|x\| ≤ 8192 (f32)   | ≤ 1e-6 abs     | ≤ 1e-14 abs     |
//!
//! Past `TRIG_MAX` (`8192` for f32, `2^30` for f64) the vector reduction runs out of
//! precision, so those lanes are computed with the scalar `sin`/`cos`; every finite
//! input gives a result in `[-1, 1]`.

use crate::simd::backend::Backend;
use crate::simd::element::{FloatElement, IntElement};
use crate::simd::traits::{FloatVector, SimdVector};
use crate::simd::vector::Vector;

mod exp;
mod ln;
mod trig;

pub(crate) use exp::exp;
pub(crate) use ln::ln;
pub(crate) use trig::{cos, sin, sincos};

/// Per-width constants of the approximations.
///
/// Coefficient slices are ordered from the highest power down, the order Horner's
/// scheme consumes them in.
pub trait Polynomials: Sized + 'static {
    /// `ln 2` split so that `k * LN2_HI` is exact for every reachable exponent `k`.
    const LN2_HI: Self;
    const LN2_LO: Self;
    /// Inputs above this overflow `exp` to infinity.
    const EXP_MAX: Self;
    /// Inputs below this underflow `exp` to zero.
    const EXP_MIN: Self;
    /// Taylor coefficients of `e^r` on `|r| <= ln 2 / 2`.
    const EXP_POLY: &'static [Self];
    /// `1 / (2k + 1)`: `ln m = 2s * P(s^2)` with `s = (m - 1) / (m + 1)`.
    const LN_POLY: &'static [Self];
    /// `pi / 4` in three pieces for Cody-Waite reduction.
    const PIO4: [Self; 3];
    /// Largest `|x|` the three-piece reduction handles.
    const TRIG_MAX: Self;
    /// `sin r = r + r^3 * P(r^2)` on `|r| <= pi / 4`.
    const SIN_POLY: &'static [Self];
    /// `cos r = 1 - r^2 / 2 + r^4 * P(r^2)` on `|r| <= pi / 4`.
    const COS_POLY: &'static [Self];
}

#[allow(clippy::excessive_precision)]
impl Polynomials for f32 {
    const LN2_HI: f32 = 0.693359375;
    const LN2_LO: f32 = -2.12194440e-4;
    const EXP_MAX: f32 = 88.7228391;
    const EXP_MIN: f32 = -103.972084;
    const EXP_POLY: &'static [f32] = &[
        1.0 / 5040.0,
        1.0 / 720.0,
        1.0 / 120.0,
        1.0 / 24.0,
        1.0 / 6.0,
        0.5,
        1.0,
        1.0,
    ];
    const LN_POLY: &'static [f32] = &[
        1.0 / 11.0,
        1.0 / 9.0,
        1.0 / 7.0,
        1.0 / 5.0,
        1.0 / 3.0,
        1.0,
    ];
    const PIO4: [f32; 3] = [0.78515625, 2.4187564849853515625e-4, 3.77489497744594108e-8];
    const TRIG_MAX: f32 = 8192.0;
    const SIN_POLY: &'static [f32] = &[-1.9515295891e-4, 8.3321608736e-3, -1.6666654611e-1];
    const COS_POLY: &'static [f32] = &[2.443315711809948e-5, -1.388731625493765e-3, 4.166664568298827e-2];
}

#[allow(clippy::excessive_precision)]
impl Polynomials for f64 {
    const LN2_HI: f64 = 6.93145751953125e-1;
    const LN2_LO: f64 = 1.42860682030941723212e-6;
    const EXP_MAX: f64 = 709.782712893384;
    const EXP_MIN: f64 = -745.1332191019412;
    const EXP_POLY: &'static [f64] = &[
        1.0 / 6227020800.0,
        1.0 / 479001600.0,
        1.0 / 39916800.0,
        1.0 / 3628800.0,
        1.0 / 362880.0,
        1.0 / 40320.0,
        1.0 / 5040.0,
        1.0 / 720.0,
        1.0 / 120.0,
        1.0 / 24.0,
        1.0 / 6.0,
        0.5,
        1.0,
        1.0,
    ];
    const LN_POLY: &'static [f64] = &[
        1.0 / 23.0,
        1.0 / 21.0,
        1.0 / 19.0,
        1.0 / 17.0,
        1.0 / 15.0,
        1.0 / 13.0,
        1.0 / 11.0,
        1.0 / 9.0,
        1.0 / 7.0,
        1.0 / 5.0,
        1.0 / 3.0,
        1.0,
    ];
    const PIO4: [f64; 3] = [
        7.85398125648498535156e-1,
        3.77489470793079817668e-8,
        2.69515142907905952645e-15,
    ];
    const TRIG_MAX: f64 = 1073741824.0;
    const SIN_POLY: &'static [f64] = &[
        1.58962301576546568060e-10,
        -2.50507477628578072866e-8,
        2.75573136213857245213e-6,
        -1.98412698295895385996e-4,
        8.33333333332211858878e-3,
        -1.66666666666666307295e-1,
    ];
    const COS_POLY: &'static [f64] = &[
        -1.13585365213876817300e-11,
        2.08757008419747316778e-9,
        -2.75573141792967388112e-7,
        2.48015872888517045348e-5,
        -1.38888888888730564116e-3,
        4.16666666666665929218e-2,
    ];
}

/// Signed integer lanes matching the float lanes of `T`.
pub(crate) type IntLanes<T, const N: usize, B> = Vector<<T as FloatElement>::Int, N, B>;

/// Evaluates the polynomial with coefficients `coeffs` (highest power first) at `x`.
#[inline(always)]
pub(crate) fn horner<T: FloatElement, const N: usize, B: Backend>(
    x: Vector<T, N, B>,
    coeffs: &[T],
) -> Vector<T, N, B> {
    let mut coeffs = coeffs.iter();
    let Some(&leading) = coeffs.next() else {
        return Vector::zero();
    };
    coeffs.fold(Vector::splat(leading), |acc, &c| acc.fmuladd(x, Vector::splat(c)))
}

#[inline(always)]
pub(crate) fn int_splat<T: FloatElement, const N: usize, B: Backend>(value: i64) -> IntLanes<T, N, B> {
    Vector::splat(<T::Int as IntElement>::from_i64_wrapping(value))
}

/// `2^k` for every lane, for `k` inside the normal exponent range.
#[inline(always)]
pub(crate) fn pow2<T: FloatElement, const N: usize, B: Backend>(k: IntLanes<T, N, B>) -> Vector<T, N, B> {
    let biased = (k + int_splat::<T, N, B>(T::EXPONENT_BIAS)) << T::MANTISSA_BITS;
    Vector::from_int_bits(biased)
}
