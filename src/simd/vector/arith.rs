//! Arithmetic, comparison and reduction shared by every element type.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use crate::simd::backend::Backend;
use crate::simd::element::SimdElement;
use crate::simd::limb::Limb;
use crate::simd::mask::Mask;
use crate::simd::traits::SimdVector;
use crate::simd::vector::Vector;

macro_rules! binary_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $lane:ident) => {
        impl<T, const N: usize, B, R> $op<R> for Vector<T, N, B>
        where
            T: SimdElement,
            B: Backend,
            R: Into<Vector<T, N, B>>,
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: R) -> Self {
                self.zip_limbs::<T::Reg<B>>(rhs.into(), |a, b| a.$method(b), T::$lane)
            }
        }

        impl<T, const N: usize, B, R> $assign<R> for Vector<T, N, B>
        where
            T: SimdElement,
            B: Backend,
            R: Into<Vector<T, N, B>>,
        {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: R) {
                *self = $op::$method(*self, rhs);
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, lane_add);
binary_op!(Sub, sub, SubAssign, sub_assign, lane_sub);
binary_op!(Mul, mul, MulAssign, mul_assign, lane_mul);
binary_op!(Div, div, DivAssign, div_assign, lane_div);

impl<T: SimdElement, const N: usize, B: Backend> SimdVector for Vector<T, N, B> {
    type Elem = T;
    type Mask = Mask<N>;

    const LANES: usize = N;

    #[inline(always)]
    fn zero() -> Self {
        Self::from_array([T::zero(); N])
    }

    #[inline(always)]
    fn splat(value: T) -> Self {
        Self::from_array([value; N])
    }

    #[inline(always)]
    fn extract(&self, index: usize) -> T {
        self.as_array()[index]
    }

    #[inline(always)]
    fn insert(&mut self, index: usize, value: T) {
        self.as_mut_array()[index] = value;
    }

    #[inline(always)]
    fn add_masked(self, mask: Mask<N>, rhs: impl Into<Self>) -> Self {
        let rhs: Self = rhs.into();
        self.blend(mask, self + rhs)
    }

    #[inline(always)]
    fn sub_masked(self, mask: Mask<N>, rhs: impl Into<Self>) -> Self {
        let rhs: Self = rhs.into();
        self.blend(mask, self - rhs)
    }

    #[inline(always)]
    fn mul_masked(self, mask: Mask<N>, rhs: impl Into<Self>) -> Self {
        let rhs: Self = rhs.into();
        self.blend(mask, self * rhs)
    }

    /// Clear lanes divide by one, so a zero divisor only panics where selected.
    #[inline(always)]
    fn div_masked(self, mask: Mask<N>, rhs: impl Into<Self>) -> Self {
        let rhs = Self::select(mask, rhs.into(), Self::splat(T::one()));
        self.blend(mask, self / rhs)
    }

    #[inline(always)]
    fn rcp(self) -> Self {
        Self::splat(T::one()) / self
    }

    #[inline(always)]
    fn rcp_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.rcp())
    }

    #[inline(always)]
    fn rcp_scalar(self, scalar: T) -> Self {
        Self::splat(scalar) / self
    }

    #[inline(always)]
    fn fmuladd(self, b: Self, c: Self) -> Self {
        self.zip3_limbs::<T::Reg<B>>(b, c, |x, y, z| x.mul_add(y, z), T::lane_mul_add)
    }

    #[inline(always)]
    fn fmulsub(self, b: Self, c: Self) -> Self {
        self.zip3_limbs::<T::Reg<B>>(b, c, |x, y, z| x.mul_sub(y, z), T::lane_mul_sub)
    }

    #[inline(always)]
    fn faddmul(self, b: Self, c: Self) -> Self {
        (self + b) * c
    }

    #[inline(always)]
    fn fsubmul(self, b: Self, c: Self) -> Self {
        (self - b) * c
    }

    #[inline(always)]
    fn fmuladd_masked(self, mask: Mask<N>, b: Self, c: Self) -> Self {
        self.blend(mask, self.fmuladd(b, c))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_limbs::<T::Reg<B>>(rhs, |a, b| a.min(b), T::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_limbs::<T::Reg<B>>(rhs, |a, b| a.max(b), T::lane_max)
    }

    #[inline(always)]
    fn min_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        self.blend(mask, self.min(rhs))
    }

    #[inline(always)]
    fn max_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        self.blend(mask, self.max(rhs))
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.eq(b, out), |a, b| a == b)
    }

    #[inline(always)]
    fn cmp_ne(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.ne(b, out), |a, b| a != b)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.lt(b, out), |a, b| a < b)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.le(b, out), |a, b| a <= b)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.gt(b, out), |a, b| a > b)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask<N> {
        self.compare_limbs(rhs, |a, b, out| a.ge(b, out), |a, b| a >= b)
    }

    #[inline(always)]
    fn select(mask: Mask<N>, on_true: Self, on_false: Self) -> Self {
        on_true.select_lanes(mask, on_true, on_false)
    }

    #[inline(always)]
    fn hadd(self) -> T {
        self.fold_limbs::<T::Reg<B>>(|a| a.reduce_add(), T::lane_add, T::zero())
    }

    #[inline(always)]
    fn hmul(self) -> T {
        self.fold_limbs::<T::Reg<B>>(|a| a.reduce_mul(), T::lane_mul, T::one())
    }

    #[inline(always)]
    fn hmin(self) -> T {
        let identity = <T as num::Bounded>::max_value();
        self.fold_limbs::<T::Reg<B>>(|a| a.reduce_min(), T::lane_min, identity)
    }

    #[inline(always)]
    fn hmax(self) -> T {
        let identity = <T as num::Bounded>::min_value();
        self.fold_limbs::<T::Reg<B>>(|a| a.reduce_max(), T::lane_max, identity)
    }

    #[inline(always)]
    fn hadd_masked(self, mask: Mask<N>) -> T {
        Self::select(mask, self, Self::zero()).hadd()
    }

    #[inline(always)]
    fn hmul_masked(self, mask: Mask<N>) -> T {
        Self::select(mask, self, Self::splat(T::one())).hmul()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::backend::{Emulation, Native};
    use crate::simd::traits::MaskVector;

    type I32x16 = Vector<i32, 16>;

    fn iota<T: SimdElement, const N: usize>() -> Vector<T, N> {
        Vector::from_array(core::array::from_fn(|i| {
            <T as num::NumCast>::from(i).unwrap_or_else(T::zero)
        }))
    }

    mod operators {
        use super::*;

        #[test]
        fn vector_and_scalar_operands() {
            let a = iota::<i32, 16>();
            let b = I32x16::splat(3);
            assert_eq!((a + b).extract(15), 18);
            assert_eq!((a - 3).extract(0), -3);
            assert_eq!((a * b).extract(4), 12);
            assert_eq!((a / 2).extract(7), 3);

            let mut c = a;
            c += 1;
            c *= I32x16::splat(2);
            c -= 2;
            c /= 2;
            assert_eq!(c, a);
        }

        #[test]
        fn integer_overflow_wraps() {
            let v = Vector::<u8, 32>::splat(250) + 10u8;
            assert_eq!(v.extract(31), 4);
            let w = Vector::<i16, 8>::splat(i16::MIN) - 1i16;
            assert_eq!(w.extract(0), i16::MAX);
        }

        #[test]
        #[should_panic]
        fn integer_division_by_zero_panics() {
            let _ = iota::<i32, 8>() / Vector::<i32, 8>::zero();
        }

        #[test]
        fn float_division_follows_ieee() {
            let v = Vector::<f32, 4>::from_array([1.0, -1.0, 0.0, 2.0]) / 0.0f32;
            let lanes = v.to_array();
            assert_eq!(lanes[0], f32::INFINITY);
            assert_eq!(lanes[1], f32::NEG_INFINITY);
            assert!(lanes[2].is_nan());
        }
    }

    mod masked {
        use super::*;

        #[test]
        fn masked_ops_merge_with_self() {
            let a = iota::<i32, 16>();
            let mask = Mask::from_bitmask(0b1010_1010_1010_1010);
            let r = a.add_masked(mask, 100);
            for i in 0..16 {
                let expected = if mask[i] { a[i] + 100 } else { a[i] };
                assert_eq!(r[i], expected);
            }

            let mut s = a;
            s.mul_assign_masked(mask, 2);
            s.sub_assign_masked(!mask, 1);
            assert_eq!(s.extract(1), 2);
            assert_eq!(s.extract(2), 1);
        }

        #[test]
        fn reciprocals() {
            let v = Vector::<f64, 4>::from_array([1.0, 2.0, 4.0, 0.5]);
            assert_eq!(v.rcp().to_array(), [1.0, 0.5, 0.25, 2.0]);
            assert_eq!(v.rcp_scalar(8.0).to_array(), [8.0, 4.0, 2.0, 16.0]);
            let m = Mask::from_array([false, true, false, true]);
            assert_eq!(v.rcp_masked(m).to_array(), [1.0, 0.5, 4.0, 2.0]);
        }

        #[test]
        fn div_assign_masked() {
            let mut v = Vector::<f32, 4>::splat(8.0);
            v.div_assign_masked(Mask::first_n(2), 2.0f32);
            assert_eq!(v.to_array(), [4.0, 4.0, 8.0, 8.0]);
        }
    }

    mod fused {
        use super::*;

        #[test]
        fn fma_family_on_exact_inputs() {
            let a = Vector::<f32, 8>::splat(3.0);
            let b = Vector::<f32, 8>::splat(4.0);
            let c = Vector::<f32, 8>::splat(5.0);
            assert_eq!(a.fmuladd(b, c).extract(0), 17.0);
            assert_eq!(a.fmulsub(b, c).extract(7), 7.0);
            assert_eq!(a.faddmul(b, c).extract(3), 35.0);
            assert_eq!(a.fsubmul(b, c).extract(3), -5.0);

            let m = Mask::first_n(4);
            let r = a.fmuladd_masked(m, b, c);
            assert_eq!(r.extract(3), 17.0);
            assert_eq!(r.extract(4), 3.0);
        }

        #[test]
        fn integer_fma_wraps() {
            let a = Vector::<u16, 8>::splat(300);
            let r = a.fmuladd(a, Vector::splat(1));
            assert_eq!(r.extract(0), 300u16.wrapping_mul(300).wrapping_add(1));
        }
    }

    mod compare {
        use super::*;

        #[test]
        fn integer_compares() {
            let a = Vector::<i64, 4>::from_array([-2, 0, 5, i64::MAX]);
            let b = Vector::<i64, 4>::splat(0);
            assert_eq!(a.cmp_lt(b).to_array(), [true, false, false, false]);
            assert_eq!(a.cmp_le(b).to_array(), [true, true, false, false]);
            assert_eq!(a.cmp_gt(b).to_array(), [false, false, true, true]);
            assert_eq!(a.cmp_ge(b).to_array(), [false, true, true, true]);
            assert_eq!(a.cmp_eq(b).to_array(), [false, true, false, false]);
            assert_eq!(a.cmp_ne(b).to_array(), [true, false, true, true]);
        }

        #[test]
        fn unsigned_compares_use_unsigned_order() {
            let a = Vector::<u32, 8>::splat(u32::MAX);
            let b = Vector::<u32, 8>::splat(1);
            assert!(a.cmp_gt(b).hland());
            let c = Vector::<u8, 16>::splat(200);
            assert!(c.cmp_gt(Vector::splat(100)).hland());
        }

        #[test]
        fn nan_is_unordered() {
            let a = Vector::<f32, 4>::from_array([f32::NAN, 1.0, -0.0, f32::INFINITY]);
            let b = Vector::<f32, 4>::from_array([f32::NAN, f32::NAN, 0.0, f32::INFINITY]);
            assert_eq!(a.cmp_eq(b).to_array(), [false, false, true, true]);
            assert_eq!(a.cmp_ne(b).to_array(), [true, true, false, false]);
            assert_eq!(a.cmp_lt(b).to_array(), [false; 4]);
            assert_eq!(a.cmp_ge(b).to_array(), [false, false, true, true]);
        }

        #[test]
        fn select_and_blend() {
            let a = Vector::<i8, 4>::splat(1);
            let b = Vector::<i8, 4>::splat(2);
            let m = Mask::from_array([true, false, true, false]);
            assert_eq!(Vector::select(m, a, b).to_array(), [1, 2, 1, 2]);
            assert_eq!(a.blend(m, b).to_array(), [2, 1, 2, 1]);
        }
    }

    mod min_max {
        use super::*;

        #[test]
        fn scenario_i32x16() {
            let a = iota::<i32, 16>();
            let b = I32x16::from_array([
                -1, 2, -3, 4, -5, 5, 6, 12, 6, 7, 14, -3121412, 85, 18, 12, 0,
            ]);
            assert_eq!(
                a.max(b).to_array(),
                [0, 2, 2, 4, 4, 5, 6, 12, 8, 9, 14, 11, 85, 18, 14, 15]
            );

            const T: bool = true;
            const F: bool = false;
            let mask = Mask::from_array([T, F, F, F, T, T, F, T, T, T, T, T, F, T, T, T]);
            assert_eq!(
                a.max_masked(mask, b).to_array(),
                [0, 1, 2, 3, 4, 5, 6, 12, 8, 9, 14, 11, 12, 18, 14, 15]
            );
        }

        #[test]
        fn float_min_max_prefer_second_operand() {
            let a = Vector::<f64, 4>::from_array([f64::NAN, 1.0, 0.0, -0.0]);
            let b = Vector::<f64, 4>::from_array([2.0, f64::NAN, -0.0, 0.0]);
            let lo = a.min(b).to_array();
            assert_eq!(lo[0], 2.0);
            assert!(lo[1].is_nan());
            assert!(lo[2].is_sign_negative());
            assert!(lo[3].is_sign_positive());

            let m = Mask::first_n(1);
            assert_eq!(a.min_masked(m, b).extract(0), 2.0);
            assert!(a.max_masked(m, b).extract(1) == 1.0);
        }
    }

    mod reductions {
        use super::*;

        #[test]
        fn base_cases() {
            assert_eq!(I32x16::zero().hadd(), 0);
            assert_eq!(Vector::<f32, 8>::splat(1.0).hmul(), 1.0);
            assert_eq!(Vector::<u64, 3>::splat(1).hmul(), 1);
        }

        #[test]
        fn integer_reductions_are_exact() {
            let a = iota::<i32, 16>();
            assert_eq!(a.hadd(), 120);
            assert_eq!(a.hmin(), 0);
            assert_eq!(a.hmax(), 15);
            assert_eq!((a + 1).hmul(), (1..=16).fold(1i32, |p, x| p.wrapping_mul(x)));

            let m = Mask::from_array(core::array::from_fn(|i| i % 2 == 0));
            assert_eq!(a.hadd_masked(m), 56);
            assert_eq!(a.hmul_masked(Mask::splat(false)), 1);
            assert_eq!((a + 1).hmul_masked(Mask::first_n(4)), 24);
        }

        #[test]
        fn float_reductions() {
            let a = Vector::<f64, 8>::from_array([1.0, -2.0, 3.0, 4.0, 5.5, 0.5, -7.0, 8.0]);
            assert_eq!(a.hadd(), 13.0);
            assert_eq!(a.hmin(), -7.0);
            assert_eq!(a.hmax(), 8.0);
        }

        #[test]
        fn wide_and_odd_widths() {
            let a = iota::<u8, 64>();
            assert_eq!(a.hmax(), 63);
            let b = Vector::<i16, 5>::from_array([3, -9, 4, 1, 7]);
            assert_eq!(b.hmin(), -9);
            assert_eq!(b.hadd(), 6);
        }
    }

    #[test]
    fn native_agrees_with_emulation_on_a_sample() {
        let a = iota::<i32, 16>() * 7919 - 50_000;
        let b = I32x16::splat(-17);
        let e = a.to_backend::<Emulation>();
        let f = b.to_backend::<Emulation>();
        assert_eq!((a * b).to_array(), (e * f).to_array());
        assert_eq!(a.cmp_gt(b), e.cmp_gt(f));
        assert_eq!(a.max(b).to_backend::<Native>(), a.max(b));
        assert_eq!(a.hadd(), e.hadd());
    }
}
