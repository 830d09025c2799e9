//! Every masked operation equals its unmasked form where the mask is set and leaves
//! the receiver untouched elsewhere.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::prelude::*;

const N: usize = 24;

fn merged<T: SimdElement>(a: Vector<T, N>, m: Mask<N>, full: Vector<T, N>) -> Vector<T, N> {
    Vector::from_array(std::array::from_fn(|i| if m[i] { full[i] } else { a[i] }))
}

fn masks(rng: &mut StdRng) -> Vec<Mask<N>> {
    let mut out = vec![Mask::splat(false), Mask::splat(true), Mask::first_n(N - 3)];
    out.extend((0..8).map(|_| Mask::from_array(std::array::from_fn(|_| rng.random_bool(0.5)))));
    out
}

#[test]
fn arithmetic_and_min_max() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = Vector::<i32, N>::from_array(std::array::from_fn(|_| rng.random()));
    let b = Vector::<i32, N>::from_array(std::array::from_fn(|_| rng.random_range(1..1000)));

    for m in masks(&mut rng) {
        assert_eq!(a.add_masked(m, b), merged(a, m, a + b));
        assert_eq!(a.sub_masked(m, b), merged(a, m, a - b));
        assert_eq!(a.mul_masked(m, b), merged(a, m, a * b));
        assert_eq!(a.div_masked(m, b), merged(a, m, a / b));
        assert_eq!(a.min_masked(m, b), merged(a, m, a.min(b)));
        assert_eq!(a.max_masked(m, b), merged(a, m, a.max(b)));
        assert_eq!(a.fmuladd_masked(m, b, a), merged(a, m, a.fmuladd(b, a)));

        let mut c = a;
        c.add_assign_masked(m, 5);
        assert_eq!(c, merged(a, m, a + 5));
    }
}

#[test]
fn masked_division_skips_zero_divisors() {
    let a = Vector::<u16, N>::splat(100);
    let b = Vector::<u16, N>::from_array(std::array::from_fn(|i| (i % 3) as u16));
    let m = b.cmp_ne(Vector::zero());
    // lanes with a zero divisor are masked off and must not trap
    let q = a.div_masked(m, b);
    for i in 0..N {
        assert_eq!(q[i], if b[i] == 0 { 100 } else { 100 / b[i] });
    }
    let r = a.rem_masked(m, b);
    for i in 0..N {
        assert_eq!(r[i], if b[i] == 0 { 100 } else { 100 % b[i] });
    }
}

#[test]
fn bitwise_and_shifts() {
    let mut rng = StdRng::seed_from_u64(12);
    let a = Vector::<u32, N>::from_array(std::array::from_fn(|_| rng.random()));
    let b = Vector::<u32, N>::from_array(std::array::from_fn(|_| rng.random()));

    for m in masks(&mut rng) {
        assert_eq!(a.band_masked(m, b), merged(a, m, a & b));
        assert_eq!(a.bor_masked(m, b), merged(a, m, a | b));
        assert_eq!(a.bxor_masked(m, b), merged(a, m, a ^ b));
        assert_eq!(a.bnot_masked(m), merged(a, m, !a));
        assert_eq!(a.shl_masked(m, 7), merged(a, m, a << 7));
        assert_eq!(a.shr_masked(m, 31), merged(a, m, a >> 31));
    }
}

#[test]
fn sign_and_float_operations() {
    let mut rng = StdRng::seed_from_u64(13);
    let a = Vector::<f64, N>::from_array(std::array::from_fn(|_| rng.random_range(-50.0..50.0)));
    let b = Vector::<f64, N>::from_array(std::array::from_fn(|_| rng.random_range(0.5..2.0)));

    for m in masks(&mut rng) {
        assert!(a.abs_masked(m).bits_eq(&merged(a, m, a.abs())));
        assert!(a.neg_masked(m).bits_eq(&merged(a, m, -a)));
        assert!(a.div_masked(m, b).bits_eq(&merged(a, m, a / b)));
        assert!(a.rcp_masked(m).bits_eq(&merged(a, m, a.rcp())));
        assert!(a.round_masked(m).bits_eq(&merged(a, m, a.round())));
        assert!(a.trunc_masked(m).bits_eq(&merged(a, m, a.trunc())));
        assert!(a.floor_masked(m).bits_eq(&merged(a, m, a.floor())));
        assert!(a.ceil_masked(m).bits_eq(&merged(a, m, a.ceil())));
        // negative lanes give NaN when selected; bits_eq treats them as raw bits
        assert!(a.sqrt_masked(m).bits_eq(&merged(a, m, a.sqrt())));
    }
}

#[test]
fn masked_reductions_use_identities() {
    let a = Vector::<i64, N>::from_array(std::array::from_fn(|i| i as i64 + 1));
    let none = Mask::splat(false);
    assert_eq!(a.hadd_masked(none), 0);
    assert_eq!(a.hmul_masked(none), 1);

    let evens = Mask::from_array(std::array::from_fn(|i| i % 2 == 0));
    let want: i64 = (0..N as i64).filter(|i| i % 2 == 0).map(|i| i + 1).sum();
    assert_eq!(a.hadd_masked(evens), want);
    assert_eq!(a.hmul_masked(Mask::first_n(5)), 120);
}

#[test]
fn masked_memory_access() {
    let src: Vec<f32> = (0..N).map(|i| i as f32).collect();
    let m = Mask::from_array(std::array::from_fn(|i| i % 3 == 0));
    let base = Vector::<f32, N>::splat(-1.0);
    // SAFETY: `src` holds N elements.
    let loaded = unsafe { base.load_masked(m, src.as_ptr()) };
    for i in 0..N {
        assert_eq!(loaded[i], if m[i] { i as f32 } else { -1.0 });
    }

    let mut dst = vec![7.0f32; N];
    // SAFETY: `dst` holds N elements.
    unsafe { loaded.store_masked_at(m, dst.as_mut_ptr()) };
    for i in 0..N {
        assert_eq!(dst[i], if m[i] { i as f32 } else { 7.0 });
    }
}
