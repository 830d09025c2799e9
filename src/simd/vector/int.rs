//! Integer and sign capabilities.

use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Neg, Not, Rem, RemAssign, Shl,
    ShlAssign, Shr, ShrAssign,
};

use crate::simd::backend::Backend;
use crate::simd::element::{IntElement, SignedElement, SignedIntElement, UnsignedElement};
use crate::simd::limb::{IntLimb, SignedLimb};
use crate::simd::mask::Mask;
use crate::simd::traits::{
    IntegerVector, SignedIntegerVector, SignedVector, SimdVector, UnsignedVector,
};
use crate::simd::vector::Vector;

macro_rules! bitwise_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $limb:ident, $lane:ident) => {
        impl<T, const N: usize, B, R> $op<R> for Vector<T, N, B>
        where
            T: IntElement,
            B: Backend,
            R: Into<Vector<T, N, B>>,
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: R) -> Self {
                self.zip_limbs::<T::IntReg<B>>(rhs.into(), |a, b| a.$limb(b), T::$lane)
            }
        }

        impl<T, const N: usize, B, R> $assign<R> for Vector<T, N, B>
        where
            T: IntElement,
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

bitwise_op!(BitAnd, bitand, BitAndAssign, bitand_assign, and, lane_and);
bitwise_op!(BitOr, bitor, BitOrAssign, bitor_assign, or, lane_or);
bitwise_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, xor, lane_xor);
bitwise_op!(Rem, rem, RemAssign, rem_assign, rem, lane_rem);

macro_rules! shift_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $lane:ident) => {
        /// Shifts every lane by the same count.
        impl<T: IntElement, const N: usize, B: Backend> $op<u32> for Vector<T, N, B> {
            type Output = Self;

            #[inline(always)]
            fn $method(self, count: u32) -> Self {
                self.map_limbs::<T::IntReg<B>>(|a| a.$method(count), |a| T::$lane(a, count))
            }
        }

        impl<T: IntElement, const N: usize, B: Backend> $assign<u32> for Vector<T, N, B> {
            #[inline(always)]
            fn $assign_method(&mut self, count: u32) {
                *self = $op::$method(*self, count);
            }
        }
    };
}

shift_op!(Shl, shl, ShlAssign, shl_assign, lane_shl);
shift_op!(Shr, shr, ShrAssign, shr_assign, lane_shr);

impl<T: IntElement, const N: usize, B: Backend> Not for Vector<T, N, B> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map_limbs::<T::IntReg<B>>(|a| a.not(), T::lane_not)
    }
}

impl<T: SignedElement, const N: usize, B: Backend> Neg for Vector<T, N, B> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map_limbs::<T::SignedReg<B>>(|a| a.neg(), T::lane_neg)
    }
}

impl<T: IntElement, const N: usize, B: Backend> IntegerVector for Vector<T, N, B> {
    #[inline(always)]
    fn band_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        self.blend(mask, self & rhs)
    }

    #[inline(always)]
    fn bor_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        self.blend(mask, self | rhs)
    }

    #[inline(always)]
    fn bxor_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        self.blend(mask, self ^ rhs)
    }

    #[inline(always)]
    fn bnot_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, !self)
    }

    #[inline(always)]
    fn shl_masked(self, mask: Mask<N>, count: u32) -> Self {
        self.blend(mask, self << count)
    }

    #[inline(always)]
    fn shr_masked(self, mask: Mask<N>, count: u32) -> Self {
        self.blend(mask, self >> count)
    }

    #[inline(always)]
    fn rem_masked(self, mask: Mask<N>, rhs: Self) -> Self {
        let rhs = Self::select(mask, rhs, Self::splat(T::one()));
        self.blend(mask, self % rhs)
    }

    #[inline(always)]
    fn shlv(self, counts: Self) -> Self {
        self.zip_limbs::<T::IntReg<B>>(counts, |a, c| a.shlv(c), T::lane_shlv)
    }

    #[inline(always)]
    fn shrv(self, counts: Self) -> Self {
        self.zip_limbs::<T::IntReg<B>>(counts, |a, c| a.shrv(c), T::lane_shrv)
    }

    #[inline(always)]
    fn saturating_add(self, rhs: Self) -> Self {
        self.zip_limbs::<T::IntReg<B>>(rhs, |a, b| a.saturating_add(b), T::lane_saturating_add)
    }

    #[inline(always)]
    fn saturating_sub(self, rhs: Self) -> Self {
        self.zip_limbs::<T::IntReg<B>>(rhs, |a, b| a.saturating_sub(b), T::lane_saturating_sub)
    }

    #[inline(always)]
    fn hband(self) -> T {
        let ones = T::lane_not(T::zero());
        self.fold_limbs::<T::IntReg<B>>(|a| a.reduce_and(), T::lane_and, ones)
    }

    #[inline(always)]
    fn hbor(self) -> T {
        self.fold_limbs::<T::IntReg<B>>(|a| a.reduce_or(), T::lane_or, T::zero())
    }

    #[inline(always)]
    fn hbxor(self) -> T {
        self.fold_limbs::<T::IntReg<B>>(|a| a.reduce_xor(), T::lane_xor, T::zero())
    }
}

impl<T: UnsignedElement, const N: usize, B: Backend> UnsignedVector for Vector<T, N, B> {
    type Signed = Vector<T::Signed, N, B>;

    #[inline(always)]
    fn to_signed(self) -> Self::Signed {
        Vector::from_array(self.to_array().map(T::to_signed_bits))
    }
}

impl<T: SignedElement, const N: usize, B: Backend> SignedVector for Vector<T, N, B> {
    #[inline(always)]
    fn abs(self) -> Self {
        self.map_limbs::<T::SignedReg<B>>(|a| a.abs(), T::lane_abs)
    }

    #[inline(always)]
    fn abs_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.abs())
    }

    #[inline(always)]
    fn neg_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, -self)
    }
}

impl<T: SignedIntElement, const N: usize, B: Backend> SignedIntegerVector for Vector<T, N, B> {
    type Unsigned = Vector<T::Unsigned, N, B>;

    #[inline(always)]
    fn to_unsigned(self) -> Self::Unsigned {
        Vector::from_array(self.to_array().map(T::to_unsigned_bits))
    }
}
