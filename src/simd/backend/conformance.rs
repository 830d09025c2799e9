//! Lane-by-lane agreement between a native limb and the scalar lane functions.
//!
//! Every check runs each operation on every ordered pair drawn from a pool of
//! representative values (extremes, zeros, small numbers and, for floats, NaN,
//! infinities and subnormals) and compares bit patterns. Any NaN matches any NaN.
//! Fused multiply-add and float reductions are not checked: they may legitimately
//! round differently.

use num::{Float, NumCast};

use crate::simd::element::{FloatElement, IntElement, SignedElement, SignedIntElement, SimdElement};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

fn same<T: SimdElement>(a: T, b: T) -> bool {
    #[allow(clippy::eq_op)]
    let both_nan = a != a && b != b;
    T::bits_eq(a, b) || both_nan
}

fn load<T: SimdElement, L: Limb<T>>(values: &[T]) -> L {
    assert!(values.len() >= L::LANES);
    // SAFETY: checked above.
    unsafe { L::load(values.as_ptr()) }
}

fn lanes<T: SimdElement, L: Limb<T>>(limb: L) -> Vec<T> {
    let mut out = vec![T::zero(); L::LANES];
    // SAFETY: `out` holds LANES elements.
    unsafe { limb.store(out.as_mut_ptr()) };
    out
}

/// Rows of `(a, b)` operands covering every ordered pair of the pool.
fn pairs<T: SimdElement, L: Limb<T>>(pool: &[T]) -> Vec<(Vec<T>, Vec<T>)> {
    let len = pool.len().div_ceil(L::LANES) * L::LANES;
    (0..pool.len())
        .map(|shift| {
            let a = (0..len).map(|i| pool[i % pool.len()]).collect();
            let b = (0..len).map(|i| pool[(i + shift) % pool.len()]).collect();
            (a, b)
        })
        .collect()
}

fn check_unary<T: SimdElement, L: Limb<T>>(
    name: &str,
    pool: &[T],
    limb: impl Fn(L) -> L,
    lane: impl Fn(T) -> T,
) {
    for (a, _) in pairs::<T, L>(pool).iter().take(1) {
        for chunk in a.chunks_exact(L::LANES) {
            let got = lanes::<T, L>(limb(load(chunk)));
            for (&x, &g) in chunk.iter().zip(&got) {
                assert!(same(g, lane(x)), "{name}({x:?}) = {g:?}, want {:?}", lane(x));
            }
        }
    }
}

fn check_binary<T: SimdElement, L: Limb<T>>(
    name: &str,
    pool: &[T],
    limb: impl Fn(L, L) -> L,
    lane: impl Fn(T, T) -> T,
) {
    for (a, b) in pairs::<T, L>(pool) {
        for (x, y) in a.chunks_exact(L::LANES).zip(b.chunks_exact(L::LANES)) {
            let got = lanes::<T, L>(limb(load(x), load(y)));
            for ((&x, &y), &g) in x.iter().zip(y).zip(&got) {
                let want = lane(x, y);
                assert!(same(g, want), "{name}({x:?}, {y:?}) = {g:?}, want {want:?}");
            }
        }
    }
}

fn check_compare<T: SimdElement, L: Limb<T>>(
    name: &str,
    pool: &[T],
    limb: impl Fn(L, L, &mut [bool]),
    lane: impl Fn(T, T) -> bool,
) {
    for (a, b) in pairs::<T, L>(pool) {
        for (x, y) in a.chunks_exact(L::LANES).zip(b.chunks_exact(L::LANES)) {
            let mut got = vec![false; L::LANES];
            limb(load(x), load(y), &mut got);
            for ((&x, &y), &g) in x.iter().zip(y).zip(&got) {
                assert_eq!(g, lane(x, y), "{name}({x:?}, {y:?})");
            }
        }
    }
}

fn check_limb<T: SimdElement, L: Limb<T>>(pool: &[T]) {
    check_binary::<T, L>("add", pool, L::add, T::lane_add);
    check_binary::<T, L>("sub", pool, L::sub, T::lane_sub);
    check_binary::<T, L>("mul", pool, L::mul, T::lane_mul);
    check_binary::<T, L>("min", pool, L::min, T::lane_min);
    check_binary::<T, L>("max", pool, L::max, T::lane_max);

    check_compare::<T, L>("eq", pool, L::eq, |a, b| a == b);
    check_compare::<T, L>("ne", pool, L::ne, |a, b| a != b);
    check_compare::<T, L>("lt", pool, L::lt, |a, b| a < b);
    check_compare::<T, L>("le", pool, L::le, |a, b| a <= b);
    check_compare::<T, L>("gt", pool, L::gt, |a, b| a > b);
    check_compare::<T, L>("ge", pool, L::ge, |a, b| a >= b);

    let (a, b) = &pairs::<T, L>(pool)[1];
    for pattern in [
        0u64,
        u64::MAX,
        0x5555_5555_5555_5555,
        0x0f0f_0f0f_0f0f_0f0f,
        0x8000_0000_0000_0001,
        0x0123_4567_89ab_cdef,
    ] {
        let mask: Vec<bool> = (0..L::LANES).map(|i| (pattern >> (i % 64)) & 1 != 0).collect();
        let got = lanes::<T, L>(L::select(&mask, load(a), load(b)));
        for i in 0..L::LANES {
            let want = if mask[i] { a[i] } else { b[i] };
            assert!(same(got[i], want), "select lane {i}");
        }
        assert_eq!(lanes::<T, L>(L::splat(a[3 % a.len()])), vec![a[3 % a.len()]; L::LANES]);
    }
}

fn int_pool<T: IntElement>() -> Vec<T> {
    let mut pool = vec![T::min_value(), T::max_value(), T::zero(), T::one()];
    for v in [-1i64, 2, 3, -7, 100, -128, 255, 1000, -40_000, 1 << 20, i64::MIN / 3] {
        if let Some(x) = <T as NumCast>::from(v) {
            pool.push(x);
        }
    }
    pool.push(T::lane_sub(T::max_value(), T::one()));
    pool.push(T::lane_add(T::min_value(), T::one()));
    pool
}

fn float_pool<T: FloatElement>() -> Vec<T> {
    let mut pool = vec![
        T::zero(),
        <T as Float>::neg_zero(),
        T::one(),
        -T::one(),
        <T as Float>::nan(),
        <T as Float>::infinity(),
        <T as Float>::neg_infinity(),
        <T as Float>::max_value(),
        <T as Float>::min_value(),
        <T as Float>::min_positive_value(),
        <T as Float>::min_positive_value() / T::from_f64(8.0),
        <T as Float>::epsilon(),
    ];
    for v in [0.5, -0.5, 1.5, 2.5, -2.5, 3.7, -1e10, 1e-3, 12345.678] {
        pool.push(T::from_f64(v));
    }
    pool
}

fn check_int<T: IntElement, L: IntLimb<T>>(pool: &[T]) {
    // division and remainder by zero panic; keep divisors nonzero
    let divisors: Vec<T> = pool.iter().map(|&x| if x == T::zero() { T::one() } else { x }).collect();
    for (a, b) in pairs::<T, L>(pool).iter().zip(pairs::<T, L>(&divisors)) {
        for (x, y) in a.0.chunks_exact(L::LANES).zip(b.1.chunks_exact(L::LANES)) {
            let q = lanes::<T, L>(load::<T, L>(x).div(load(y)));
            let r = lanes::<T, L>(load::<T, L>(x).rem(load(y)));
            for i in 0..L::LANES {
                assert_eq!(q[i], T::lane_div(x[i], y[i]));
                assert_eq!(r[i], T::lane_rem(x[i], y[i]));
            }
        }
    }

    check_binary::<T, L>("and", pool, L::and, T::lane_and);
    check_binary::<T, L>("or", pool, L::or, T::lane_or);
    check_binary::<T, L>("xor", pool, L::xor, T::lane_xor);
    check_unary::<T, L>("not", pool, L::not, T::lane_not);
    check_binary::<T, L>("saturating_add", pool, L::saturating_add, T::lane_saturating_add);
    check_binary::<T, L>("saturating_sub", pool, L::saturating_sub, T::lane_saturating_sub);
    check_binary::<T, L>("shlv", pool, L::shlv, T::lane_shlv);
    check_binary::<T, L>("shrv", pool, L::shrv, T::lane_shrv);

    let counts: Vec<T> = [0i64, 1, 3, 7, 15, 31, 63]
        .iter()
        .filter_map(|&c| <T as NumCast>::from(c))
        .filter(|&c| c.shift_count() < T::BITS)
        .collect();
    check_binary::<T, L>("shlv in range", &counts, L::shlv, T::lane_shlv);

    for count in [0, 1, 3, T::BITS - 1, T::BITS, T::BITS + 5, 1000, u32::MAX] {
        check_unary::<T, L>("shl", pool, |a| a.shl(count), |a| T::lane_shl(a, count));
        check_unary::<T, L>("shr", pool, |a| a.shr(count), |a| T::lane_shr(a, count));
    }

    let (a, _) = &pairs::<T, L>(pool)[0];
    for chunk in a.chunks_exact(L::LANES) {
        let limb: L = load(chunk);
        let fold = |f: fn(T, T) -> T| chunk[1..].iter().fold(chunk[0], |acc, &x| f(acc, x));
        assert_eq!(limb.reduce_add(), fold(T::lane_add));
        assert_eq!(limb.reduce_mul(), fold(T::lane_mul));
        assert_eq!(limb.reduce_min(), fold(T::lane_min));
        assert_eq!(limb.reduce_max(), fold(T::lane_max));
        assert_eq!(limb.reduce_and(), fold(T::lane_and));
        assert_eq!(limb.reduce_or(), fold(T::lane_or));
        assert_eq!(limb.reduce_xor(), fold(T::lane_xor));
    }
}

fn check_signed<T: SignedElement, L: SignedLimb<T>>(pool: &[T]) {
    check_unary::<T, L>("neg", pool, L::neg, T::lane_neg);
    check_unary::<T, L>("abs", pool, L::abs, T::lane_abs);
}

/// Unsigned integer limbs.
pub(crate) fn int_limb<T: IntElement, L: IntLimb<T>>() {
    let pool = int_pool::<T>();
    check_limb::<T, L>(&pool);
    check_int::<T, L>(&pool);
}

/// Signed integer limbs.
pub(crate) fn signed_int_limb<T: SignedIntElement, L: IntLimb<T> + SignedLimb<T>>() {
    let pool = int_pool::<T>();
    check_limb::<T, L>(&pool);
    check_int::<T, L>(&pool);
    check_signed::<T, L>(&pool);
}

pub(crate) fn float_limb<T: FloatElement, L: FloatLimb<T>>() {
    let pool = float_pool::<T>();
    check_limb::<T, L>(&pool);
    check_binary::<T, L>("div", &pool, L::div, T::lane_div);
    check_signed::<T, L>(&pool);
    check_unary::<T, L>("sqrt", &pool, L::sqrt, T::lane_sqrt);
    check_unary::<T, L>("round", &pool, L::round, T::lane_round);
    check_unary::<T, L>("trunc", &pool, L::trunc, T::lane_trunc);
    check_unary::<T, L>("floor", &pool, L::floor, T::lane_floor);
    check_unary::<T, L>("ceil", &pool, L::ceil, T::lane_ceil);
    check_conversions::<T, L>(&pool);
}

/// Bit casts and `as` conversions against the scalar casts, including NaN, infinities
/// and lanes outside the integer range.
fn check_conversions<T: FloatElement, L: FloatLimb<T>>(pool: &[T]) {
    let mut pool = pool.to_vec();
    for v in [2147483520.0, 2147483648.0, -2147483648.0, -2147483904.0, 9.3e18, -9.3e18] {
        pool.push(T::from_f64(v));
    }
    let (a, _) = &pairs::<T, L>(&pool)[0];
    for chunk in a.chunks_exact(L::LANES) {
        let limb: L = load(chunk);
        let ints = lanes::<T::Int, L::Bits>(limb.trunc_to_int());
        let bits = lanes::<T::Int, L::Bits>(limb.to_int_bits());
        for ((&x, &i), &b) in chunk.iter().zip(&ints).zip(&bits) {
            assert_eq!(i, T::to_int(x), "trunc_to_int({x:?})");
            assert_eq!(b, T::to_int_bits(x), "to_int_bits({x:?})");
        }

        let back = lanes::<T, L>(L::from_int_bits(load(&bits)));
        for (&x, &y) in chunk.iter().zip(&back) {
            assert!(T::bits_eq(x, y), "from_int_bits(to_int_bits({x:?}))");
        }
        let floats = lanes::<T, L>(L::from_int(load(&ints)));
        for (&i, &f) in ints.iter().zip(&floats) {
            assert!(same(f, T::from_int(i)), "from_int({i:?})");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::backend::emulation::Emulated;

    #[test]
    fn emulation_agrees_with_itself() {
        float_limb::<f32, Emulated<f32>>();
        signed_int_limb::<i16, Emulated<i16>>();
        int_limb::<u64, Emulated<u64>>();
    }

    #[test]
    fn pools_cover_the_edges() {
        let pool = int_pool::<u8>();
        assert!(pool.contains(&u8::MAX) && pool.contains(&0) && pool.contains(&255));
        let pool = float_pool::<f64>();
        assert!(pool.iter().any(|x| x.is_nan()));
        assert!(pool.iter().any(|x| x.is_subnormal()));
    }
}
