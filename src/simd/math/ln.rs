use num::Float;

use super::{horner, int_splat, pow2, IntLanes};
use crate::simd::backend::Backend;
use crate::simd::element::FloatElement;
use crate::simd::traits::{FloatVector, SimdVector};
use crate::simd::vector::Vector;

/// Natural logarithm.
///
/// # Algorithm
///
/// 1. Subnormal inputs are scaled by `2^MANTISSA_BITS` into the normal range and the
///    exponent is corrected afterwards.
/// 2. The bit pattern splits `x = 2^e * m` with `m` in `[1, 2)`; `m` above `sqrt 2` is
///    halved so that `m` lies in `[sqrt(1/2), sqrt 2)`.
/// 3. `ln m = 2s * (1 + s^2/3 + s^4/5 + ...)` with `s = (m - 1) / (m + 1)`, which
///    converges fast because `|s| < 0.172`.
/// 4. `ln x = e * ln 2 + ln m`, with `ln 2` in two pieces.
///
/// `ln(±0) = -inf`, `ln(+inf) = +inf`, negative inputs and NaN give NaN.
#[inline(always)]
pub(crate) fn ln<T: FloatElement, const N: usize, B: Backend>(x: Vector<T, N, B>) -> Vector<T, N, B> {
    let splat = Vector::<T, N, B>::splat;
    let mantissa_bits = T::MANTISSA_BITS as i64;

    let tiny = x.cmp_lt(splat(<T as Float>::min_positive_value()));
    let scale = pow2::<T, N, B>(int_splat::<T, N, B>(mantissa_bits));
    let normal = Vector::select(tiny, x * scale, x);

    let bits: IntLanes<T, N, B> = normal.to_int_bits();
    let mut exponent = (bits >> T::MANTISSA_BITS) - int_splat::<T, N, B>(T::EXPONENT_BIAS);
    exponent.sub_assign_masked(tiny, int_splat::<T, N, B>(mantissa_bits));

    let fraction = bits & int_splat::<T, N, B>((1 << mantissa_bits) - 1);
    let m = Vector::<T, N, B>::from_int_bits(fraction | int_splat::<T, N, B>(T::EXPONENT_BIAS << mantissa_bits));

    let high = m.cmp_gt(splat(T::from_f64(std::f64::consts::SQRT_2)));
    let m = m.mul_masked(high, T::from_f64(0.5));
    exponent.add_assign_masked(high, int_splat::<T, N, B>(1));

    let one = splat(T::one());
    let s = (m - one) / (m + one);
    let ln_m = (s + s) * horner(s * s, T::LN_POLY);

    let e = Vector::<T, N, B>::from_int(exponent);
    let result = e.fmuladd(splat(T::LN2_LO), ln_m);
    let result = e.fmuladd(splat(T::LN2_HI), result);

    let result = Vector::select(
        x.cmp_eq(splat(<T as Float>::infinity())),
        x,
        result,
    );
    let invalid = x.cmp_lt(Vector::zero()) | x.is_nan();
    let result = Vector::select(invalid, splat(<T as Float>::nan()), result);
    Vector::select(x.is_zero(), splat(<T as Float>::neg_infinity()), result)
}
