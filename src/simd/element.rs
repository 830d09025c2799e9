//! Scalar element types and their lane semantics.
//!
//! Every vector operation is defined by what it does to a single lane. The functions in
//! this module are that definition: the emulation backend calls them directly, the
//! hardware backends call them for the lanes that do not fill a whole register, and
//! they are what the backends are tested against.
//!
//! Integer arithmetic wraps. Division and remainder by zero panic, like the scalar
//! operators. Float `min`/`max` follow the x86 convention (`if a < b { a } else { b }`),
//! so the second operand wins on ties and when either side is NaN. Shift counts at or
//! above the element width produce 0, or the sign fill for arithmetic right shifts.

use std::fmt::Debug;

use num::{Bounded, NumCast, One, Zero};

use crate::simd::backend::Backend;
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};
use crate::simd::math::Polynomials;

mod sealed {
    pub trait Sealed {}
}

/// A scalar type that can live in a vector lane.
pub trait SimdElement:
    sealed::Sealed
    + Copy
    + Default
    + Debug
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Bounded
    + NumCast
{
    /// Width of the element in bits.
    const BITS: u32;
    /// Rust name of the element type, used in diagnostics.
    const NAME: &'static str;

    /// Native register holding lanes of this type on backend `B`.
    type Reg<B: Backend>: Limb<Self>;

    fn lane_add(a: Self, b: Self) -> Self;
    fn lane_sub(a: Self, b: Self) -> Self;
    fn lane_mul(a: Self, b: Self) -> Self;
    fn lane_div(a: Self, b: Self) -> Self;

    /// `a * b + c`, rounded twice for floats.
    fn lane_mul_add(a: Self, b: Self, c: Self) -> Self;
    /// `a * b - c`, rounded twice for floats.
    fn lane_mul_sub(a: Self, b: Self, c: Self) -> Self;

    #[inline(always)]
    fn lane_min(a: Self, b: Self) -> Self {
        if a < b {
            a
        } else {
            b
        }
    }

    #[inline(always)]
    fn lane_max(a: Self, b: Self) -> Self {
        if a > b {
            a
        } else {
            b
        }
    }

    /// Raw bit pattern, zero extended.
    fn to_bits_u64(self) -> u64;

    #[inline(always)]
    fn bits_eq(a: Self, b: Self) -> bool {
        a.to_bits_u64() == b.to_bits_u64()
    }
}

/// Integer lane types.
pub trait IntElement: SimdElement + Eq + Ord {
    type IntReg<B: Backend>: IntLimb<Self>;
    /// Same-width signed integer.
    type Signed: SignedIntElement;
    /// Same-width unsigned integer.
    type Unsigned: UnsignedElement;

    fn lane_and(a: Self, b: Self) -> Self;
    fn lane_or(a: Self, b: Self) -> Self;
    fn lane_xor(a: Self, b: Self) -> Self;
    fn lane_not(a: Self) -> Self;
    fn lane_shl(a: Self, count: u32) -> Self;
    /// Logical for unsigned types, arithmetic for signed ones.
    fn lane_shr(a: Self, count: u32) -> Self;
    fn lane_rem(a: Self, b: Self) -> Self;
    fn lane_saturating_add(a: Self, b: Self) -> Self;
    fn lane_saturating_sub(a: Self, b: Self) -> Self;

    /// Per-lane shift count: the lane read as unsigned, clamped into `u32`.
    fn shift_count(self) -> u32;

    #[inline(always)]
    fn lane_shlv(a: Self, count: Self) -> Self {
        Self::lane_shl(a, count.shift_count())
    }

    #[inline(always)]
    fn lane_shrv(a: Self, count: Self) -> Self {
        Self::lane_shr(a, count.shift_count())
    }

    fn from_i64_wrapping(value: i64) -> Self;
    fn to_signed_bits(self) -> Self::Signed;
    fn to_unsigned_bits(self) -> Self::Unsigned;

    /// Lane value as a slice index; values that do not fit become `usize::MAX`.
    fn to_index(self) -> usize;
}

/// Unsigned integer lane types.
pub trait UnsignedElement: IntElement {}

/// Lane types with a sign: signed integers and floats.
pub trait SignedElement: SimdElement {
    type SignedReg<B: Backend>: SignedLimb<Self>;

    /// Wrapping for integers (`-MIN == MIN`).
    fn lane_neg(a: Self) -> Self;
    /// Wrapping for integers (`abs(MIN) == MIN`), clears the sign bit for floats.
    fn lane_abs(a: Self) -> Self;
}

/// Signed integer lane types.
pub trait SignedIntElement: IntElement + SignedElement {}

/// Floating-point lane types.
pub trait FloatElement: SignedElement + num::Float + Polynomials {
    type FloatReg<B: Backend>: FloatLimb<Self>;
    /// Same-width signed integer, the target of bit casts and rounding conversions.
    type Int: SignedIntElement;
    type UInt: UnsignedElement;

    const MANTISSA_BITS: u32;
    const EXPONENT_BIAS: i64;

    fn lane_sqrt(a: Self) -> Self;
    /// Round half to even.
    fn lane_round(a: Self) -> Self;
    fn lane_trunc(a: Self) -> Self;
    fn lane_floor(a: Self) -> Self;
    fn lane_ceil(a: Self) -> Self;

    fn to_int_bits(self) -> Self::Int;
    fn from_int_bits(bits: Self::Int) -> Self;
    /// `as` conversion: truncates toward zero, saturates, NaN becomes 0.
    fn to_int(self) -> Self::Int;
    fn to_uint(self) -> Self::UInt;
    fn from_int(value: Self::Int) -> Self;
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_int_common {
    ($t:ty, $reg:ident, $unsigned:ty, $signed:ty) => {
        impl sealed::Sealed for $t {}

        impl SimdElement for $t {
            const BITS: u32 = <$t>::BITS;
            const NAME: &'static str = stringify!($t);

            type Reg<B: Backend> = B::$reg;

            #[inline(always)]
            fn lane_add(a: Self, b: Self) -> Self {
                a.wrapping_add(b)
            }

            #[inline(always)]
            fn lane_sub(a: Self, b: Self) -> Self {
                a.wrapping_sub(b)
            }

            #[inline(always)]
            fn lane_mul(a: Self, b: Self) -> Self {
                a.wrapping_mul(b)
            }

            #[inline(always)]
            fn lane_div(a: Self, b: Self) -> Self {
                a.wrapping_div(b)
            }

            #[inline(always)]
            fn lane_mul_add(a: Self, b: Self, c: Self) -> Self {
                a.wrapping_mul(b).wrapping_add(c)
            }

            #[inline(always)]
            fn lane_mul_sub(a: Self, b: Self, c: Self) -> Self {
                a.wrapping_mul(b).wrapping_sub(c)
            }

            #[inline(always)]
            fn to_bits_u64(self) -> u64 {
                self as $unsigned as u64
            }
        }

        impl IntElement for $t {
            type IntReg<B: Backend> = B::$reg;
            type Signed = $signed;
            type Unsigned = $unsigned;

            #[inline(always)]
            fn lane_and(a: Self, b: Self) -> Self {
                a & b
            }

            #[inline(always)]
            fn lane_or(a: Self, b: Self) -> Self {
                a | b
            }

            #[inline(always)]
            fn lane_xor(a: Self, b: Self) -> Self {
                a ^ b
            }

            #[inline(always)]
            fn lane_not(a: Self) -> Self {
                !a
            }

            #[inline(always)]
            fn lane_shl(a: Self, count: u32) -> Self {
                a.checked_shl(count).unwrap_or(0)
            }

            #[inline(always)]
            fn lane_shr(a: Self, count: u32) -> Self {
                if <$t>::MIN == 0 {
                    a.checked_shr(count).unwrap_or(0)
                } else {
                    a >> count.min(Self::BITS - 1)
                }
            }

            #[inline(always)]
            fn lane_rem(a: Self, b: Self) -> Self {
                a.wrapping_rem(b)
            }

            #[inline(always)]
            fn lane_saturating_add(a: Self, b: Self) -> Self {
                a.saturating_add(b)
            }

            #[inline(always)]
            fn lane_saturating_sub(a: Self, b: Self) -> Self {
                a.saturating_sub(b)
            }

            #[inline(always)]
            fn shift_count(self) -> u32 {
                u32::try_from(self as $unsigned).unwrap_or(u32::MAX)
            }

            #[inline(always)]
            fn from_i64_wrapping(value: i64) -> Self {
                value as $t
            }

            #[inline(always)]
            fn to_signed_bits(self) -> $signed {
                self as $signed
            }

            #[inline(always)]
            fn to_unsigned_bits(self) -> $unsigned {
                self as $unsigned
            }

            #[inline(always)]
            fn to_index(self) -> usize {
                usize::try_from(self).unwrap_or(usize::MAX)
            }
        }
    };
}

macro_rules! impl_signed_int {
    ($($t:ty => $reg:ident, $unsigned:ty;)*) => {$(
        impl_int_common!($t, $reg, $unsigned, $t);

        impl SignedElement for $t {
            type SignedReg<B: Backend> = B::$reg;

            #[inline(always)]
            fn lane_neg(a: Self) -> Self {
                a.wrapping_neg()
            }

            #[inline(always)]
            fn lane_abs(a: Self) -> Self {
                a.wrapping_abs()
            }
        }

        impl SignedIntElement for $t {}
    )*};
}

macro_rules! impl_unsigned_int {
    ($($t:ty => $reg:ident, $signed:ty;)*) => {$(
        impl_int_common!($t, $reg, $t, $signed);

        impl UnsignedElement for $t {}
    )*};
}

impl_signed_int! {
    i8 => I8, u8;
    i16 => I16, u16;
    i32 => I32, u32;
    i64 => I64, u64;
}

impl_unsigned_int! {
    u8 => U8, i8;
    u16 => U16, i16;
    u32 => U32, i32;
    u64 => U64, i64;
}

macro_rules! impl_float {
    ($($t:ident => $reg:ident, $int:ty, $uint:ty, mantissa: $mant:expr, bias: $bias:expr;)*) => {$(
        impl sealed::Sealed for $t {}

        impl SimdElement for $t {
            const BITS: u32 = <$uint>::BITS;
            const NAME: &'static str = stringify!($t);

            type Reg<B: Backend> = B::$reg;

            #[inline(always)]
            fn lane_add(a: Self, b: Self) -> Self {
                a + b
            }

            #[inline(always)]
            fn lane_sub(a: Self, b: Self) -> Self {
                a - b
            }

            #[inline(always)]
            fn lane_mul(a: Self, b: Self) -> Self {
                a * b
            }

            #[inline(always)]
            fn lane_div(a: Self, b: Self) -> Self {
                a / b
            }

            #[inline(always)]
            fn lane_mul_add(a: Self, b: Self, c: Self) -> Self {
                a * b + c
            }

            #[inline(always)]
            fn lane_mul_sub(a: Self, b: Self, c: Self) -> Self {
                a * b - c
            }

            #[inline(always)]
            fn to_bits_u64(self) -> u64 {
                self.to_bits() as u64
            }
        }

        impl SignedElement for $t {
            type SignedReg<B: Backend> = B::$reg;

            #[inline(always)]
            fn lane_neg(a: Self) -> Self {
                -a
            }

            #[inline(always)]
            fn lane_abs(a: Self) -> Self {
                <$t>::from_bits(a.to_bits() & !(1 << (<$uint>::BITS - 1)))
            }
        }

        impl FloatElement for $t {
            type FloatReg<B: Backend> = B::$reg;
            type Int = $int;
            type UInt = $uint;

            const MANTISSA_BITS: u32 = $mant;
            const EXPONENT_BIAS: i64 = $bias;

            #[inline(always)]
            fn lane_sqrt(a: Self) -> Self {
                a.sqrt()
            }

            #[inline(always)]
            fn lane_round(a: Self) -> Self {
                a.round_ties_even()
            }

            #[inline(always)]
            fn lane_trunc(a: Self) -> Self {
                a.trunc()
            }

            #[inline(always)]
            fn lane_floor(a: Self) -> Self {
                a.floor()
            }

            #[inline(always)]
            fn lane_ceil(a: Self) -> Self {
                a.ceil()
            }

            #[inline(always)]
            fn to_int_bits(self) -> $int {
                self.to_bits() as $int
            }

            #[inline(always)]
            fn from_int_bits(bits: $int) -> Self {
                <$t>::from_bits(bits as $uint)
            }

            #[inline(always)]
            fn to_int(self) -> $int {
                self as $int
            }

            #[inline(always)]
            fn to_uint(self) -> $uint {
                self as $uint
            }

            #[inline(always)]
            fn from_int(value: $int) -> Self {
                value as $t
            }

            #[inline(always)]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
        }
    )*};
}

impl_float! {
    f32 => F32, i32, u32, mantissa: 23, bias: 127;
    f64 => F64, i64, u64, mantissa: 52, bias: 1023;
}
