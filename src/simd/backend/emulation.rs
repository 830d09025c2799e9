//! Scalar emulation backend.
//!
//! Every limb is a single lane and every operation is the element's lane function, so
//! a vector on this backend is a plain array processed in a loop. This is the
//! reference semantics for the hardware backends.

use crate::simd::backend::Backend;
use crate::simd::element::{FloatElement, IntElement, SignedElement, SimdElement};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

/// The scalar backend. Always available, whatever the build target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Emulation;

impl Backend for Emulation {
    const NAME: &'static str = "emulation";
    const VECTOR_ALIGN: usize = 1;

    type Align = ();

    type F32 = Emulated<f32>;
    type F64 = Emulated<f64>;
    type I8 = Emulated<i8>;
    type I16 = Emulated<i16>;
    type I32 = Emulated<i32>;
    type I64 = Emulated<i64>;
    type U8 = Emulated<u8>;
    type U16 = Emulated<u16>;
    type U32 = Emulated<u32>;
    type U64 = Emulated<u64>;
}

/// One-lane register.
#[derive(Clone, Copy, Debug, Default)]
#[repr(transparent)]
pub struct Emulated<T>(pub T);

impl<T: SimdElement> Limb<T> for Emulated<T> {
    const LANES: usize = 1;
    const NATIVE: bool = false;

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        Emulated(ptr.read_unaligned())
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut T) {
        ptr.write_unaligned(self.0)
    }

    #[inline(always)]
    fn splat(value: T) -> Self {
        Emulated(value)
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Emulated(T::lane_add(self.0, rhs.0))
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Emulated(T::lane_sub(self.0, rhs.0))
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Emulated(T::lane_mul(self.0, rhs.0))
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Emulated(T::lane_div(self.0, rhs.0))
    }

    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        Emulated(T::lane_mul_add(self.0, b.0, c.0))
    }

    #[inline(always)]
    fn mul_sub(self, b: Self, c: Self) -> Self {
        Emulated(T::lane_mul_sub(self.0, b.0, c.0))
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Emulated(T::lane_min(self.0, rhs.0))
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Emulated(T::lane_max(self.0, rhs.0))
    }

    #[inline(always)]
    fn eq(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 == rhs.0;
    }

    #[inline(always)]
    fn ne(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 != rhs.0;
    }

    #[inline(always)]
    fn lt(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 < rhs.0;
    }

    #[inline(always)]
    fn le(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 <= rhs.0;
    }

    #[inline(always)]
    fn gt(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 > rhs.0;
    }

    #[inline(always)]
    fn ge(self, rhs: Self, out: &mut [bool]) {
        out[0] = self.0 >= rhs.0;
    }

    #[inline(always)]
    fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
        if mask[0] {
            on_true
        } else {
            on_false
        }
    }

    #[inline(always)]
    fn reduce_add(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_mul(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_min(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_max(self) -> T {
        self.0
    }
}

impl<T: IntElement> IntLimb<T> for Emulated<T> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Emulated(T::lane_and(self.0, rhs.0))
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Emulated(T::lane_or(self.0, rhs.0))
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        Emulated(T::lane_xor(self.0, rhs.0))
    }

    #[inline(always)]
    fn not(self) -> Self {
        Emulated(T::lane_not(self.0))
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        Emulated(T::lane_shl(self.0, count))
    }

    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        Emulated(T::lane_shr(self.0, count))
    }

    #[inline(always)]
    fn shlv(self, counts: Self) -> Self {
        Emulated(T::lane_shlv(self.0, counts.0))
    }

    #[inline(always)]
    fn shrv(self, counts: Self) -> Self {
        Emulated(T::lane_shrv(self.0, counts.0))
    }

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        Emulated(T::lane_rem(self.0, rhs.0))
    }

    #[inline(always)]
    fn saturating_add(self, rhs: Self) -> Self {
        Emulated(T::lane_saturating_add(self.0, rhs.0))
    }

    #[inline(always)]
    fn saturating_sub(self, rhs: Self) -> Self {
        Emulated(T::lane_saturating_sub(self.0, rhs.0))
    }

    #[inline(always)]
    fn reduce_and(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_or(self) -> T {
        self.0
    }

    #[inline(always)]
    fn reduce_xor(self) -> T {
        self.0
    }
}

impl<T: SignedElement> SignedLimb<T> for Emulated<T> {
    #[inline(always)]
    fn neg(self) -> Self {
        Emulated(T::lane_neg(self.0))
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Emulated(T::lane_abs(self.0))
    }
}

impl<T: FloatElement> FloatLimb<T> for Emulated<T> {
    type Bits = Emulated<T::Int>;

    #[inline(always)]
    fn to_int_bits(self) -> Self::Bits {
        Emulated(T::to_int_bits(self.0))
    }

    #[inline(always)]
    fn from_int_bits(bits: Self::Bits) -> Self {
        Emulated(T::from_int_bits(bits.0))
    }

    #[inline(always)]
    fn trunc_to_int(self) -> Self::Bits {
        Emulated(T::to_int(self.0))
    }

    #[inline(always)]
    fn from_int(values: Self::Bits) -> Self {
        Emulated(T::from_int(values.0))
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Emulated(T::lane_sqrt(self.0))
    }

    #[inline(always)]
    fn round(self) -> Self {
        Emulated(T::lane_round(self.0))
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        Emulated(T::lane_trunc(self.0))
    }

    #[inline(always)]
    fn floor(self) -> Self {
        Emulated(T::lane_floor(self.0))
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        Emulated(T::lane_ceil(self.0))
    }
}
