//! Width and element-type conversions.
//!
//! [`Packable`] links a vector of `N` lanes to the vector of `N / 2` lanes of the same
//! element type, so wide vectors can be split into halves and rebuilt.
//! [`PromoteElement`] and [`DegradeElement`] widen and narrow the element type at a
//! fixed lane count.

use crate::simd::backend::Backend;
use crate::simd::element::SimdElement;
use crate::simd::mask::Mask;
use crate::simd::vector::Vector;

/// An element type with a wider counterpart that holds every value exactly.
pub trait PromoteElement: SimdElement {
    type Wide: SimdElement + DegradeElement<Narrow = Self>;

    fn promote(self) -> Self::Wide;
}

/// An element type with a narrower counterpart.
///
/// Integers keep their low bits (wrapping truncation, the inverse of the sign or zero
/// extension done by [`PromoteElement::promote`]); `f64` rounds to the nearest `f32`.
pub trait DegradeElement: SimdElement {
    type Narrow: SimdElement;

    fn degrade(self) -> Self::Narrow;
}

macro_rules! impl_promote {
    ($($narrow:ty => $wide:ty),* $(,)?) => {$(
        impl PromoteElement for $narrow {
            type Wide = $wide;

            #[inline(always)]
            fn promote(self) -> $wide {
                self as $wide
            }
        }

        impl DegradeElement for $wide {
            type Narrow = $narrow;

            #[inline(always)]
            fn degrade(self) -> $narrow {
                self as $narrow
            }
        }
    )*};
}

impl_promote! {
    i8 => i16,
    i16 => i32,
    i32 => i64,
    u8 => u16,
    u16 => u32,
    u32 => u64,
    f32 => f64,
}

impl<T: PromoteElement, const N: usize, B: Backend> Vector<T, N, B> {
    /// Widens every lane; the value is preserved exactly.
    #[inline(always)]
    pub fn promote(self) -> Vector<T::Wide, N, B> {
        Vector::from_array(self.to_array().map(T::promote))
    }
}

impl<T: DegradeElement, const N: usize, B: Backend> Vector<T, N, B> {
    /// Narrows every lane. Integers wrap, `f64` rounds to nearest even.
    #[inline(always)]
    pub fn degrade(self) -> Vector<T::Narrow, N, B> {
        Vector::from_array(self.to_array().map(T::degrade))
    }
}

/// A lane container that splits into two halves of equal width.
///
/// Lane `i` of the low half is lane `i` of the whole; lane `i` of the high half is
/// lane `i + N / 2`.
pub trait Packable: Sized {
    type Half;

    fn unpack(self) -> (Self::Half, Self::Half);
    fn pack(lo: Self::Half, hi: Self::Half) -> Self;

    #[inline(always)]
    fn pack_lo(self) -> Self::Half {
        self.unpack().0
    }

    #[inline(always)]
    fn pack_hi(self) -> Self::Half {
        self.unpack().1
    }
}

#[inline(always)]
fn split<E: Copy + Default, const N: usize, const H: usize>(lanes: &[E; N]) -> ([E; H], [E; H]) {
    debug_assert_eq!(2 * H, N);
    let mut lo = [E::default(); H];
    let mut hi = [E::default(); H];
    lo.copy_from_slice(&lanes[..H]);
    hi.copy_from_slice(&lanes[H..]);
    (lo, hi)
}

#[inline(always)]
fn join<E: Copy + Default, const N: usize, const H: usize>(lo: &[E; H], hi: &[E; H]) -> [E; N] {
    debug_assert_eq!(2 * H, N);
    let mut lanes = [E::default(); N];
    lanes[..H].copy_from_slice(lo);
    lanes[H..].copy_from_slice(hi);
    lanes
}

macro_rules! impl_packable {
    ($($n:literal => $h:literal),* $(,)?) => {$(
        impl<T: SimdElement, B: Backend> Packable for Vector<T, $n, B> {
            type Half = Vector<T, $h, B>;

            #[inline(always)]
            fn unpack(self) -> (Self::Half, Self::Half) {
                let (lo, hi) = split::<T, $n, $h>(self.as_array());
                (Vector::from_array(lo), Vector::from_array(hi))
            }

            #[inline(always)]
            fn pack(lo: Self::Half, hi: Self::Half) -> Self {
                Self::from_array(join::<T, $n, $h>(lo.as_array(), hi.as_array()))
            }
        }

        impl Packable for Mask<$n> {
            type Half = Mask<$h>;

            #[inline(always)]
            fn unpack(self) -> (Self::Half, Self::Half) {
                let (lo, hi) = split::<bool, $n, $h>(self.as_array());
                (Mask::from_array(lo), Mask::from_array(hi))
            }

            #[inline(always)]
            fn pack(lo: Self::Half, hi: Self::Half) -> Self {
                Self::from_array(join::<bool, $n, $h>(lo.as_array(), hi.as_array()))
            }
        }
    )*};
}

impl_packable! {
    2 => 1,
    4 => 2,
    8 => 4,
    16 => 8,
    32 => 16,
    64 => 32,
    128 => 64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::traits::{IntegerVector, MaskVector, SimdVector};

    mod promote_degrade {
        use super::*;

        #[test]
        fn widening_keeps_values() {
            let v = Vector::<i8, 4>::from_array([i8::MIN, -1, 0, i8::MAX]);
            assert_eq!(v.promote().to_array(), [-128i16, -1, 0, 127]);

            let u = Vector::<u32, 2>::from_array([u32::MAX, 7]);
            assert_eq!(u.promote().to_array(), [u32::MAX as u64, 7]);

            let f = Vector::<f32, 2>::from_array([0.1, f32::INFINITY]);
            assert_eq!(f.promote().to_array(), [0.1f32 as f64, f64::INFINITY]);
        }

        #[test]
        fn round_trip_for_representable_values() {
            let v = Vector::<i16, 8>::from_array([-300, -2, -1, 0, 1, 2, 300, i16::MAX]);
            assert_eq!(v.promote().degrade(), v);

            let f = Vector::<f32, 4>::from_array([1.5, -0.0, 3.25e-20, f32::MAX]);
            assert!(f.promote().degrade().bits_eq(&f));
        }

        #[test]
        fn narrowing_wraps() {
            let v = Vector::<i32, 4>::from_array([0x1_0005, -1, 0x8000, 0x7fff]);
            assert_eq!(v.degrade().to_array(), [5i16, -1, i16::MIN, i16::MAX]);

            let u = Vector::<u16, 2>::from_array([0x1ff, 0x100]);
            assert_eq!(u.degrade().to_array(), [0xffu8, 0]);
        }

        #[test]
        fn f64_rounds_to_nearest() {
            let v = Vector::<f64, 4>::from_array([0.1, 1e300, 1e-50, f64::NAN]);
            let d = v.degrade().to_array();
            assert_eq!(d[0], 0.1f32);
            assert_eq!(d[1], f32::INFINITY);
            assert_eq!(d[2], 0.0);
            assert!(d[3].is_nan());
        }
    }

    mod packing {
        use super::*;

        #[test]
        fn halves_follow_lane_order() {
            let v = Vector::<u16, 8>::from_array([0, 1, 2, 3, 4, 5, 6, 7]);
            let (lo, hi) = v.unpack();
            assert_eq!(lo.to_array(), [0, 1, 2, 3]);
            assert_eq!(hi.to_array(), [4, 5, 6, 7]);
            assert_eq!(v.pack_lo(), lo);
            assert_eq!(v.pack_hi(), hi);
            assert_eq!(Vector::<u16, 8>::pack(lo, hi), v);
        }

        #[test]
        fn widest_pair() {
            let v = Vector::<u8, 128>::from_array(core::array::from_fn(|i| i as u8));
            let (lo, hi) = v.unpack();
            assert_eq!(lo.extract(63), 63);
            assert_eq!(hi.extract(0), 64);
            assert_eq!(Vector::<u8, 128>::pack(lo, hi), v);
        }

        #[test]
        fn ops_commute_with_unpack() {
            let a = Vector::<i32, 16>::from_array(core::array::from_fn(|i| i as i32 * 3 - 20));
            let b = Vector::<i32, 16>::splat(5);
            let (alo, ahi) = a.unpack();
            let (blo, bhi) = b.unpack();
            assert_eq!(Vector::<i32, 16>::pack(alo.saturating_sub(blo), ahi.saturating_sub(bhi)), a.saturating_sub(b));
            assert_eq!(alo.hadd().wrapping_add(ahi.hadd()), a.hadd());
        }

        #[test]
        fn masks_split_too() {
            let m = Mask::<4>::from_array([true, false, false, true]);
            let (lo, hi) = m.unpack();
            assert_eq!(lo.to_array(), [true, false]);
            assert_eq!(hi.to_array(), [false, true]);
            assert_eq!(Mask::<4>::pack(lo, hi), m);
            assert_eq!(Mask::<2>::splat(true).pack_hi().count_true(), 1);
        }
    }
}
