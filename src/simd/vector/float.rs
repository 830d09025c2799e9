//! Floating-point capabilities.

use num::Float;

use crate::simd::backend::Backend;
use crate::simd::element::FloatElement;
use crate::simd::limb::FloatLimb;
use crate::simd::mask::Mask;
use crate::simd::math;
use crate::simd::traits::{FloatVector, SignedVector, SimdVector};
use crate::simd::vector::Vector;

/// Integer register paired with the float register of `T` on `B`.
type Bits<T, B> = <<T as FloatElement>::FloatReg<B> as FloatLimb<T>>::Bits;

impl<T: FloatElement, const N: usize, B: Backend> Vector<T, N, B> {
    #[inline(always)]
    fn float_map(self, limb: impl Fn(T::FloatReg<B>) -> T::FloatReg<B>, lane: impl Fn(T) -> T) -> Self {
        self.map_limbs::<T::FloatReg<B>>(limb, lane)
    }

    /// Truncating conversion to the same-width unsigned integer; negative lanes and
    /// NaN become 0, lanes past the maximum saturate.
    pub fn to_uint(self) -> Vector<T::UInt, N, B> {
        Vector::from_array(self.to_array().map(T::to_uint))
    }
}

impl<T: FloatElement, const N: usize, B: Backend> FloatVector for Vector<T, N, B> {
    type Int = Vector<T::Int, N, B>;

    #[inline(always)]
    fn sqrt(self) -> Self {
        self.float_map(|a| a.sqrt(), T::lane_sqrt)
    }

    #[inline(always)]
    fn sqrt_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.sqrt())
    }

    /// Full-precision `1 / sqrt(x)`, not the hardware estimate.
    #[inline(always)]
    fn rsqrt(self) -> Self {
        self.sqrt().rcp()
    }

    #[inline(always)]
    fn round(self) -> Self {
        self.float_map(|a| a.round(), T::lane_round)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        self.float_map(|a| a.trunc(), T::lane_trunc)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        self.float_map(|a| a.floor(), T::lane_floor)
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        self.float_map(|a| a.ceil(), T::lane_ceil)
    }

    #[inline(always)]
    fn round_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.round())
    }

    #[inline(always)]
    fn trunc_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.trunc())
    }

    #[inline(always)]
    fn floor_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.floor())
    }

    #[inline(always)]
    fn ceil_masked(self, mask: Mask<N>) -> Self {
        self.blend(mask, self.ceil())
    }

    #[inline(always)]
    fn round_to_int(self) -> Self::Int {
        self.round().trunc_to_int()
    }

    #[inline(always)]
    fn trunc_to_int(self) -> Self::Int {
        self.convert_limbs::<T::Int, T::FloatReg<B>, Bits<T, B>>(|a| a.trunc_to_int(), T::to_int)
    }

    #[inline(always)]
    fn to_int_bits(self) -> Self::Int {
        self.convert_limbs::<T::Int, T::FloatReg<B>, Bits<T, B>>(|a| a.to_int_bits(), T::to_int_bits)
    }

    #[inline(always)]
    fn from_int_bits(bits: Self::Int) -> Self {
        bits.convert_limbs::<T, Bits<T, B>, T::FloatReg<B>>(
            <T::FloatReg<B> as FloatLimb<T>>::from_int_bits,
            T::from_int_bits,
        )
    }

    #[inline(always)]
    fn from_int(values: Self::Int) -> Self {
        values.convert_limbs::<T, Bits<T, B>, T::FloatReg<B>>(
            <T::FloatReg<B> as FloatLimb<T>>::from_int,
            T::from_int,
        )
    }

    fn exp(self) -> Self {
        math::exp(self)
    }

    fn ln(self) -> Self {
        math::ln(self)
    }

    fn sin(self) -> Self {
        math::sin(self)
    }

    fn cos(self) -> Self {
        math::cos(self)
    }

    fn sincos(self) -> (Self, Self) {
        math::sincos(self)
    }

    #[inline(always)]
    fn is_nan(self) -> Mask<N> {
        self.cmp_ne(self)
    }

    #[inline(always)]
    fn is_inf(self) -> Mask<N> {
        self.abs().cmp_eq(Self::splat(<T as Float>::infinity()))
    }

    /// Neither infinite nor NaN.
    #[inline(always)]
    fn is_finite(self) -> Mask<N> {
        self.abs().cmp_lt(Self::splat(<T as Float>::infinity()))
    }

    #[inline(always)]
    fn is_zero(self) -> Mask<N> {
        self.cmp_eq(Self::zero())
    }

    #[inline(always)]
    fn is_subnormal(self) -> Mask<N> {
        let a = self.abs();
        a.cmp_lt(Self::splat(<T as Float>::min_positive_value())) & a.cmp_gt(Self::zero())
    }
}
