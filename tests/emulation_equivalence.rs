//! `Vector<T, N, Native>` and `Vector<T, N, Emulation>` must agree bit for bit.
//!
//! Inputs are drawn from a seeded generator mixed with the awkward values of each
//! type (extremes, signed zeros, subnormals, infinities, NaN). Fused multiply-add,
//! float horizontal reductions and the polynomial transcendentals may round
//! differently and are checked elsewhere against error bounds.

use num::{Float, NumCast};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::prelude::*;

const ROUNDS: usize = 64;

fn specials_int<T: IntElement>() -> Vec<T> {
    let mut v = vec![T::min_value(), T::max_value(), T::zero(), T::one()];
    for x in [-1i64, 2, 7, -128, 255, 1 << 15, -(1 << 31)] {
        if let Some(x) = <T as NumCast>::from(x) {
            v.push(x);
        }
    }
    v
}

fn specials_float<T: FloatElement>() -> Vec<T> {
    vec![
        T::zero(),
        <T as Float>::neg_zero(),
        <T as Float>::nan(),
        <T as Float>::infinity(),
        <T as Float>::neg_infinity(),
        <T as Float>::min_positive_value() / T::from_f64(4.0),
        <T as Float>::max_value(),
        <T as Float>::min_value(),
        T::from_f64(0.5),
        T::from_f64(-2.5),
        // edges of the i32 and i64 conversion ranges
        T::from_f64(2147483648.0),
        T::from_f64(-2147483904.0),
        T::from_f64(3e9),
        T::from_f64(9.3e18),
        T::from_f64(-9.3e18),
    ]
}

fn random_int<T: IntElement, const N: usize>(rng: &mut StdRng, specials: &[T]) -> [T; N] {
    std::array::from_fn(|_| {
        if rng.random_bool(0.25) {
            specials[rng.random_range(0..specials.len())]
        } else {
            T::from_i64_wrapping(rng.random::<i64>())
        }
    })
}

fn random_float<T: FloatElement, const N: usize>(rng: &mut StdRng, specials: &[T]) -> [T; N] {
    std::array::from_fn(|_| {
        if rng.random_bool(0.25) {
            specials[rng.random_range(0..specials.len())]
        } else {
            T::from_f64(rng.random_range(-1e6..1e6))
        }
    })
}

fn random_mask<const N: usize>(rng: &mut StdRng) -> Mask<N> {
    Mask::from_array(std::array::from_fn(|_| rng.random_bool(0.5)))
}

macro_rules! assert_same {
    ($name:expr, $native:expr, $emulated:expr) => {{
        let native = $native;
        let emulated = $emulated;
        assert!(
            native.to_backend::<Emulation>().bits_eq(&emulated),
            "{}: native {:?} vs emulated {:?}",
            $name,
            native,
            emulated
        );
    }};
}

fn check_common<T: SimdElement, const N: usize>(a: [T; N], b: [T; N], m: Mask<N>) {
    let (na, nb) = (Vector::<T, N, Native>::from_array(a), Vector::<T, N, Native>::from_array(b));
    let (ea, eb) = (
        Vector::<T, N, Emulation>::from_array(a),
        Vector::<T, N, Emulation>::from_array(b),
    );

    assert_same!("add", na + nb, ea + eb);
    assert_same!("sub", na - nb, ea - eb);
    assert_same!("mul", na * nb, ea * eb);
    assert_same!("min", na.min(nb), ea.min(eb));
    assert_same!("max", na.max(nb), ea.max(eb));
    assert_same!("add_masked", na.add_masked(m, nb), ea.add_masked(m, eb));
    assert_same!("max_masked", na.max_masked(m, nb), ea.max_masked(m, eb));
    assert_same!("select", Vector::select(m, na, nb), Vector::select(m, ea, eb));

    assert_eq!(na.cmp_eq(nb), ea.cmp_eq(eb));
    assert_eq!(na.cmp_ne(nb), ea.cmp_ne(eb));
    assert_eq!(na.cmp_lt(nb), ea.cmp_lt(eb));
    assert_eq!(na.cmp_le(nb), ea.cmp_le(eb));
    assert_eq!(na.cmp_gt(nb), ea.cmp_gt(eb));
    assert_eq!(na.cmp_ge(nb), ea.cmp_ge(eb));
}

fn check_int<T: IntElement, const N: usize>(rng: &mut StdRng) {
    let specials = specials_int::<T>();
    for _ in 0..ROUNDS {
        let a = random_int::<T, N>(rng, &specials);
        let b = random_int::<T, N>(rng, &specials);
        let m = random_mask::<N>(rng);
        check_common(a, b, m);

        let (na, nb) = (Vector::<T, N, Native>::from_array(a), Vector::<T, N, Native>::from_array(b));
        let (ea, eb) = (
            Vector::<T, N, Emulation>::from_array(a),
            Vector::<T, N, Emulation>::from_array(b),
        );
        assert_same!("and", na & nb, ea & eb);
        assert_same!("or", na | nb, ea | eb);
        assert_same!("xor", na ^ nb, ea ^ eb);
        assert_same!("not", !na, !ea);
        assert_same!("saturating_add", na.saturating_add(nb), ea.saturating_add(eb));
        assert_same!("saturating_sub", na.saturating_sub(nb), ea.saturating_sub(eb));
        assert_same!("shlv", na.shlv(nb), ea.shlv(eb));
        assert_same!("shrv", na.shrv(nb), ea.shrv(eb));
        assert_same!("bnot_masked", na.bnot_masked(m), ea.bnot_masked(m));

        let count = rng.random_range(0..T::BITS + 4);
        assert_same!("shl", na << count, ea << count);
        assert_same!("shr", na >> count, ea >> count);

        assert_eq!(na.hadd(), ea.hadd());
        assert_eq!(na.hmul(), ea.hmul());
        assert_eq!(na.hmin(), ea.hmin());
        assert_eq!(na.hmax(), ea.hmax());
        assert_eq!(na.hband(), ea.hband());
        assert_eq!(na.hbor(), ea.hbor());
        assert_eq!(na.hbxor(), ea.hbxor());
    }
}

fn check_signed_int<T: SignedIntElement, const N: usize>(rng: &mut StdRng) {
    check_int::<T, N>(rng);
    let specials = specials_int::<T>();
    for _ in 0..ROUNDS {
        let a = random_int::<T, N>(rng, &specials);
        let na = Vector::<T, N, Native>::from_array(a);
        let ea = Vector::<T, N, Emulation>::from_array(a);
        assert_same!("neg", -na, -ea);
        assert_same!("abs", na.abs(), ea.abs());
    }
}

fn check_float<T: FloatElement, const N: usize>(rng: &mut StdRng) {
    let specials = specials_float::<T>();
    for _ in 0..ROUNDS {
        let a = random_float::<T, N>(rng, &specials);
        let b = random_float::<T, N>(rng, &specials);
        let m = random_mask::<N>(rng);
        check_common(a, b, m);

        let (na, nb) = (Vector::<T, N, Native>::from_array(a), Vector::<T, N, Native>::from_array(b));
        let (ea, eb) = (
            Vector::<T, N, Emulation>::from_array(a),
            Vector::<T, N, Emulation>::from_array(b),
        );
        assert_same!("div", na / nb, ea / eb);
        assert_same!("neg", -na, -ea);
        assert_same!("abs", na.abs(), ea.abs());
        assert_same!("sqrt", na.sqrt(), ea.sqrt());
        assert_same!("sqrt_masked", na.sqrt_masked(m), ea.sqrt_masked(m));
        assert_same!("round", na.round(), ea.round());
        assert_same!("trunc", na.trunc(), ea.trunc());
        assert_same!("floor", na.floor(), ea.floor());
        assert_same!("ceil", na.ceil(), ea.ceil());
        assert_same!("rcp", na.rcp(), ea.rcp());
        assert_same!("round_to_int", na.round_to_int(), ea.round_to_int());
        assert_same!("trunc_to_int", na.trunc_to_int(), ea.trunc_to_int());
        assert_same!("to_int_bits", na.to_int_bits(), ea.to_int_bits());
        assert_same!(
            "from_int_bits",
            Vector::<T, N, Native>::from_int_bits(na.to_int_bits()),
            ea
        );
        assert_same!(
            "from_int",
            Vector::<T, N, Native>::from_int(na.trunc_to_int()),
            Vector::<T, N, Emulation>::from_int(ea.trunc_to_int())
        );
        assert_eq!(na.is_nan(), ea.is_nan());
        assert_eq!(na.is_subnormal(), ea.is_subnormal());
    }
}

#[test]
fn signed_integers() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    check_signed_int::<i8, 64>(&mut rng);
    check_signed_int::<i8, 3>(&mut rng);
    check_signed_int::<i16, 32>(&mut rng);
    check_signed_int::<i32, 16>(&mut rng);
    check_signed_int::<i32, 5>(&mut rng);
    check_signed_int::<i64, 8>(&mut rng);
    check_signed_int::<i64, 1>(&mut rng);
}

#[test]
fn unsigned_integers() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);
    check_int::<u8, 128>(&mut rng);
    check_int::<u16, 16>(&mut rng);
    check_int::<u32, 8>(&mut rng);
    check_int::<u32, 12>(&mut rng);
    check_int::<u64, 4>(&mut rng);
}

#[test]
fn floats() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0003);
    check_float::<f32, 16>(&mut rng);
    check_float::<f32, 7>(&mut rng);
    check_float::<f32, 64>(&mut rng);
    check_float::<f64, 8>(&mut rng);
    check_float::<f64, 3>(&mut rng);
}

#[test]
fn transcendentals_stay_close() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);
    for _ in 0..ROUNDS {
        let x: [f32; 16] = std::array::from_fn(|_| rng.random_range(-80.0..80.0));
        let native = Vector::<f32, 16>::from_array(x);
        let emulated = native.to_backend::<Emulation>();
        for (n, e) in native.exp().iter().zip(emulated.exp().iter()) {
            assert!((n - e).abs() <= 8.0 * f32::EPSILON * e.abs(), "exp {n} vs {e}");
        }
        for (n, e) in native.sin().iter().zip(emulated.sin().iter()) {
            assert!((n - e).abs() <= 2e-6, "sin {n} vs {e}");
        }
    }
}
