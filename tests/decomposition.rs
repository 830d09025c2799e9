//! Splitting a vector into halves, operating on each and packing the results back
//! gives the same lanes as operating on the whole vector.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use simdvec::prelude::*;

#[test]
fn integer_ops_commute_with_unpack() {
    let mut rng = StdRng::seed_from_u64(21);
    let a = Vector::<i16, 64>::from_array(std::array::from_fn(|_| rng.random()));
    let b = Vector::<i16, 64>::from_array(std::array::from_fn(|_| rng.random()));
    let (alo, ahi) = a.unpack();
    let (blo, bhi) = b.unpack();

    assert_eq!(a + b, Vector::<i16, 64>::pack(alo + blo, ahi + bhi));
    assert_eq!(a * b, Vector::<i16, 64>::pack(alo * blo, ahi * bhi));
    assert_eq!(a.max(b), Vector::<i16, 64>::pack(alo.max(blo), ahi.max(bhi)));
    assert_eq!(
        a.saturating_sub(b),
        Vector::<i16, 64>::pack(alo.saturating_sub(blo), ahi.saturating_sub(bhi))
    );
    assert_eq!(a >> 3, Vector::<i16, 64>::pack(alo >> 3, ahi >> 3));
    assert_eq!(a.cmp_lt(b), Mask::<64>::pack(alo.cmp_lt(blo), ahi.cmp_lt(bhi)));
    assert_eq!(a.hadd(), alo.hadd().wrapping_add(ahi.hadd()));
    assert_eq!(a.hmax(), alo.hmax().max(ahi.hmax()));
}

#[test]
fn float_ops_commute_with_unpack() {
    let mut rng = StdRng::seed_from_u64(22);
    let a = Vector::<f32, 32>::from_array(std::array::from_fn(|_| rng.random_range(-9.0..9.0)));
    let b = Vector::<f32, 32>::from_array(std::array::from_fn(|_| rng.random_range(0.1..9.0)));
    let (alo, ahi) = a.unpack();
    let (blo, bhi) = b.unpack();

    assert!((a / b).bits_eq(&Vector::<f32, 32>::pack(alo / blo, ahi / bhi)));
    assert!(a.sqrt().bits_eq(&Vector::<f32, 32>::pack(alo.sqrt(), ahi.sqrt())));
    assert!(a.floor().bits_eq(&Vector::<f32, 32>::pack(alo.floor(), ahi.floor())));
    assert!(a.sin().bits_eq(&Vector::<f32, 32>::pack(alo.sin(), ahi.sin())));
    assert!(a.exp().bits_eq(&Vector::<f32, 32>::pack(alo.exp(), ahi.exp())));
}

#[test]
fn odd_widths_agree_with_power_of_two_widths() {
    // 13 lanes decompose into whole registers plus a scalar tail; the answer must not
    // depend on where the tail starts
    let a: [u32; 16] = std::array::from_fn(|i| (i as u32).wrapping_mul(0x9e37_79b9));
    let b: [u32; 16] = std::array::from_fn(|i| (i as u32 + 3).wrapping_mul(0x85eb_ca6b));
    let wide = Vector::<u32, 16>::from_array(a) ^ Vector::from_array(b);
    let narrow = Vector::<u32, 13>::from_slice(&a[..13]).unwrap()
        ^ Vector::<u32, 13>::from_slice(&b[..13]).unwrap();
    assert_eq!(&wide.to_array()[..13], narrow.as_array());
}

#[test]
fn halves_round_trip() {
    let v = Vector::<u8, 128>::from_array(std::array::from_fn(|i| i as u8));
    let (lo, hi) = v.unpack();
    assert_eq!(lo.extract(0), 0);
    assert_eq!(hi.extract(0), 64);
    assert_eq!(v.pack_lo(), lo);
    assert_eq!(v.pack_hi(), hi);
    assert_eq!(Vector::<u8, 128>::pack(lo, hi), v);
}
