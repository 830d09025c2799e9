//! NEON backend: 128-bit AArch64 registers.
//!
//! NEON compares return all-ones lanes rather than a bitmask, so compares spill the
//! mask register and selects rebuild one. `fmin`/`fmax` propagate NaN, which the lane
//! semantics do not, so float min/max are a compare and a bit select. 64-bit lanes
//! have no multiply and no across-lane min/max and take the scalar fallback there.

use std::arch::aarch64::*;

use super::{Align16, Backend};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

/// 128-bit NEON registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Neon;

impl Backend for Neon {
    const NAME: &'static str = "neon";
    const VECTOR_ALIGN: usize = 16;

    type Align = Align16;

    type F32 = F32x4;
    type F64 = F64x2;
    type I8 = I8x16;
    type I16 = I16x8;
    type I32 = I32x4;
    type I64 = I64x2;
    type U8 = U8x16;
    type U16 = U16x8;
    type U32 = U32x4;
    type U64 = U64x2;
}

/// Lane flags widened in-register to a select mask. A `bool` is one byte holding 0
/// or 1, so zero-extending and negating gives all ones for set lanes.
trait MaskFlags {
    type Reg;

    /// # Safety
    /// `mask` must hold exactly one flag per register lane.
    unsafe fn widen(mask: &[bool]) -> Self::Reg;
}

impl MaskFlags for u8 {
    type Reg = uint8x16_t;

    #[inline(always)]
    unsafe fn widen(mask: &[bool]) -> uint8x16_t {
        vsubq_u8(vdupq_n_u8(0), vld1q_u8(mask.as_ptr() as *const u8))
    }
}

impl MaskFlags for u16 {
    type Reg = uint16x8_t;

    #[inline(always)]
    unsafe fn widen(mask: &[bool]) -> uint16x8_t {
        let bytes = vld1_u8(mask.as_ptr() as *const u8);
        vsubq_u16(vdupq_n_u16(0), vmovl_u8(bytes))
    }
}

impl MaskFlags for u32 {
    type Reg = uint32x4_t;

    #[inline(always)]
    unsafe fn widen(mask: &[bool]) -> uint32x4_t {
        let word = (mask.as_ptr() as *const u32).read_unaligned();
        let halves = vget_low_u16(vmovl_u8(vcreate_u8(word as u64)));
        vsubq_u32(vdupq_n_u32(0), vmovl_u16(halves))
    }
}

impl MaskFlags for u64 {
    type Reg = uint64x2_t;

    #[inline(always)]
    unsafe fn widen(mask: &[bool]) -> uint64x2_t {
        let pair = (mask.as_ptr() as *const u16).read_unaligned();
        let halves = vget_low_u16(vmovl_u8(vcreate_u8(pair as u64)));
        let words = vget_low_u32(vmovl_u16(halves));
        vsubq_u64(vdupq_n_u64(0), vmovl_u32(words))
    }
}

/// Compare and select plumbing shared by every limb: a mask register of unsigned
/// lanes the same width as the elements.
macro_rules! mask_plumbing {
    ($name:ident; $lanes:expr, $ut:ty, $mreg:ty, $mstore:ident) => {
        impl $name {
            #[inline(always)]
            fn flags(m: $mreg, out: &mut [bool]) {
                let mut bits = [0 as $ut; $lanes];
                // SAFETY: `bits` holds one mask lane per register lane.
                unsafe { $mstore(bits.as_mut_ptr(), m) };
                for (o, &b) in out[..$lanes].iter_mut().zip(&bits) {
                    *o = b != 0;
                }
            }

            #[inline(always)]
            fn mask_register(mask: &[bool]) -> $mreg {
                // SAFETY: one flag per register lane.
                unsafe { <$ut as MaskFlags>::widen(&mask[..$lanes]) }
            }

            #[inline(always)]
            fn invert(out: &mut [bool]) {
                for o in &mut out[..$lanes] {
                    *o = !*o;
                }
            }
        }
    };
}

macro_rules! float_limb {
    (
        $name:ident($t:ty, $reg:ty; $lanes:expr) {
            load: $load:ident, store: $store:ident, dup: $dup:ident,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            fma: $fma:ident, fms: $fms:ident,
            mask: $ut:ty, $mreg:ty, $mstore:ident,
            eq: $eq:ident, lt: $lt:ident, le: $le:ident, gt: $gt:ident, ge: $ge:ident,
            bsl: $bsl:ident, neg: $neg:ident, abs: $abs:ident, sqrt: $sqrt:ident,
            round: $round:ident, trunc: $trunc:ident, floor: $floor:ident, ceil: $ceil:ident,
            bits: $bits:ident, to_bits: $to_bits:ident, from_bits: $from_bits:ident,
            to_int: $to_int:ident, from_int: $from_int:ident,
        }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name($reg);

        mask_plumbing!($name; $lanes, $ut, $mreg, $mstore);

        impl Limb<$t> for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self($load(ptr))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                $store(ptr, self.0)
            }

            #[inline(always)]
            fn splat(value: $t) -> Self {
                Self(unsafe { $dup(value) })
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(unsafe { $add(self.0, rhs.0) })
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(unsafe { $sub(self.0, rhs.0) })
            }

            #[inline(always)]
            fn mul(self, rhs: Self) -> Self {
                Self(unsafe { $mul(self.0, rhs.0) })
            }

            #[inline(always)]
            fn div(self, rhs: Self) -> Self {
                Self(unsafe { $div(self.0, rhs.0) })
            }

            #[inline(always)]
            fn mul_add(self, b: Self, c: Self) -> Self {
                Self(unsafe { $fma(c.0, self.0, b.0) })
            }

            #[inline(always)]
            fn mul_sub(self, b: Self, c: Self) -> Self {
                // c - a*b, fused, then negated exactly
                Self(unsafe { $neg($fms(c.0, self.0, b.0)) })
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                Self(unsafe { $bsl($lt(self.0, rhs.0), self.0, rhs.0) })
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                Self(unsafe { $bsl($gt(self.0, rhs.0), self.0, rhs.0) })
            }

            #[inline(always)]
            fn eq(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $eq(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ne(self, rhs: Self, out: &mut [bool]) {
                self.eq(rhs, out);
                Self::invert(out);
            }

            #[inline(always)]
            fn lt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $lt(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn le(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $le(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn gt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $gt(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ge(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $ge(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
                Self(unsafe { $bsl(Self::mask_register(mask), on_true.0, on_false.0) })
            }
        }

        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $neg(self.0) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $abs(self.0) })
            }
        }

        // fcvtzs saturates and maps NaN to 0, exactly like `as`.
        impl FloatLimb<$t> for $name {
            type Bits = $bits;

            #[inline(always)]
            fn to_int_bits(self) -> $bits {
                $bits(unsafe { $to_bits(self.0) })
            }

            #[inline(always)]
            fn from_int_bits(bits: $bits) -> Self {
                Self(unsafe { $from_bits(bits.0) })
            }

            #[inline(always)]
            fn trunc_to_int(self) -> $bits {
                $bits(unsafe { $to_int(self.0) })
            }

            #[inline(always)]
            fn from_int(values: $bits) -> Self {
                Self(unsafe { $from_int(values.0) })
            }

            #[inline(always)]
            fn sqrt(self) -> Self {
                Self(unsafe { $sqrt(self.0) })
            }

            #[inline(always)]
            fn round(self) -> Self {
                Self(unsafe { $round(self.0) })
            }

            #[inline(always)]
            fn trunc(self) -> Self {
                Self(unsafe { $trunc(self.0) })
            }

            #[inline(always)]
            fn floor(self) -> Self {
                Self(unsafe { $floor(self.0) })
            }

            #[inline(always)]
            fn ceil(self) -> Self {
                Self(unsafe { $ceil(self.0) })
            }
        }
    };
}

float_limb! {
    F32x4(f32, float32x4_t; 4) {
        load: vld1q_f32, store: vst1q_f32, dup: vdupq_n_f32,
        add: vaddq_f32, sub: vsubq_f32, mul: vmulq_f32, div: vdivq_f32,
        fma: vfmaq_f32, fms: vfmsq_f32,
        mask: u32, uint32x4_t, vst1q_u32,
        eq: vceqq_f32, lt: vcltq_f32, le: vcleq_f32, gt: vcgtq_f32, ge: vcgeq_f32,
        bsl: vbslq_f32, neg: vnegq_f32, abs: vabsq_f32, sqrt: vsqrtq_f32,
        round: vrndnq_f32, trunc: vrndq_f32, floor: vrndmq_f32, ceil: vrndpq_f32,
        bits: I32x4, to_bits: vreinterpretq_s32_f32, from_bits: vreinterpretq_f32_s32,
        to_int: vcvtq_s32_f32, from_int: vcvtq_f32_s32,
    }
}

float_limb! {
    F64x2(f64, float64x2_t; 2) {
        load: vld1q_f64, store: vst1q_f64, dup: vdupq_n_f64,
        add: vaddq_f64, sub: vsubq_f64, mul: vmulq_f64, div: vdivq_f64,
        fma: vfmaq_f64, fms: vfmsq_f64,
        mask: u64, uint64x2_t, vst1q_u64,
        eq: vceqq_f64, lt: vcltq_f64, le: vcleq_f64, gt: vcgtq_f64, ge: vcgeq_f64,
        bsl: vbslq_f64, neg: vnegq_f64, abs: vabsq_f64, sqrt: vsqrtq_f64,
        round: vrndnq_f64, trunc: vrndq_f64, floor: vrndmq_f64, ceil: vrndpq_f64,
        bits: I64x2, to_bits: vreinterpretq_s64_f64, from_bits: vreinterpretq_f64_s64,
        to_int: vcvtq_s64_f64, from_int: vcvtq_f64_s64,
    }
}

macro_rules! int_limb {
    (
        $name:ident($t:ty, $reg:ty; $lanes:expr) {
            load: $load:ident, store: $store:ident, dup: $dup:ident,
            add: $add:ident, sub: $sub:ident,
            mask: $ut:ty, $mreg:ty, $mstore:ident,
            eq: $eq:ident, lt: $lt:ident, le: $le:ident, gt: $gt:ident, ge: $ge:ident,
            bsl: $bsl:ident, and: $and:ident, or: $or:ident, xor: $xor:ident,
            qadd: $qadd:ident, qsub: $qsub:ident,
            shl: $shl:ident, count: $count:ident as $ct:ty,
        }
        limb { $($limb:tt)* }
        int { $($int:tt)* }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name($reg);

        mask_plumbing!($name; $lanes, $ut, $mreg, $mstore);

        impl $name {
            /// NEON shifts left by positive and right by negative counts; past the
            /// width they saturate to zero or the sign fill.
            #[inline(always)]
            fn shift_by(self, count: $ct) -> Self {
                Self(unsafe { $shl(self.0, $count(count)) })
            }

            #[inline(always)]
            fn clamped(count: u32) -> $ct {
                count.min(<$t>::BITS) as $ct
            }
        }

        impl Limb<$t> for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self($load(ptr))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                $store(ptr, self.0)
            }

            #[inline(always)]
            fn splat(value: $t) -> Self {
                Self(unsafe { $dup(value) })
            }

            #[inline(always)]
            fn add(self, rhs: Self) -> Self {
                Self(unsafe { $add(self.0, rhs.0) })
            }

            #[inline(always)]
            fn sub(self, rhs: Self) -> Self {
                Self(unsafe { $sub(self.0, rhs.0) })
            }

            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                Self(unsafe { $bsl($lt(self.0, rhs.0), self.0, rhs.0) })
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                Self(unsafe { $bsl($gt(self.0, rhs.0), self.0, rhs.0) })
            }

            #[inline(always)]
            fn eq(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $eq(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ne(self, rhs: Self, out: &mut [bool]) {
                self.eq(rhs, out);
                Self::invert(out);
            }

            #[inline(always)]
            fn lt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $lt(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn le(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $le(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn gt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $gt(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ge(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $ge(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
                Self(unsafe { $bsl(Self::mask_register(mask), on_true.0, on_false.0) })
            }

            $($limb)*
        }

        impl IntLimb<$t> for $name {
            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                Self(unsafe { $and(self.0, rhs.0) })
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                Self(unsafe { $or(self.0, rhs.0) })
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                Self(unsafe { $xor(self.0, rhs.0) })
            }

            #[inline(always)]
            fn not(self) -> Self {
                Self(unsafe { $xor(self.0, $dup(!(0 as $t))) })
            }

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                self.shift_by(Self::clamped(count))
            }

            #[inline(always)]
            fn shr(self, count: u32) -> Self {
                self.shift_by(-Self::clamped(count))
            }

            #[inline(always)]
            fn saturating_add(self, rhs: Self) -> Self {
                Self(unsafe { $qadd(self.0, rhs.0) })
            }

            #[inline(always)]
            fn saturating_sub(self, rhs: Self) -> Self {
                Self(unsafe { $qsub(self.0, rhs.0) })
            }

            $($int)*
        }
    };
}

macro_rules! binary_ops {
    ($($method:ident => $intrinsic:ident),* $(,)?) => {$(
        #[inline(always)]
        fn $method(self, rhs: Self) -> Self {
            Self(unsafe { $intrinsic(self.0, rhs.0) })
        }
    )*};
}

macro_rules! reductions {
    ($t:ty { $($method:ident => $intrinsic:ident),* $(,)? }) => {$(
        #[inline(always)]
        fn $method(self) -> $t {
            unsafe { $intrinsic(self.0) }
        }
    )*};
}

/// Per-lane shift counts are read as unsigned and clamped to the width before the
/// NEON shift sees them.
macro_rules! variable_shifts {
    (
        $t:ty, signed { shl: $shl:ident, neg: $neg:ident, min: $min:ident, dup: $dup:ident,
        to_unsigned: $to_u:ident, to_signed: $to_s:ident }
    ) => {
        #[inline(always)]
        fn shlv(self, counts: Self) -> Self {
            unsafe {
                let c = $to_s($min($to_u(counts.0), $dup(<$t>::BITS as _)));
                Self($shl(self.0, c))
            }
        }

        #[inline(always)]
        fn shrv(self, counts: Self) -> Self {
            unsafe {
                let c = $to_s($min($to_u(counts.0), $dup(<$t>::BITS as _)));
                Self($shl(self.0, $neg(c)))
            }
        }
    };
    (
        $t:ty, unsigned { shl: $shl:ident, neg: $neg:ident, min: $min:ident, dup: $dup:ident,
        to_signed: $to_s:ident }
    ) => {
        #[inline(always)]
        fn shlv(self, counts: Self) -> Self {
            unsafe {
                let c = $to_s($min(counts.0, $dup(<$t>::BITS as _)));
                Self($shl(self.0, c))
            }
        }

        #[inline(always)]
        fn shrv(self, counts: Self) -> Self {
            unsafe {
                let c = $to_s($min(counts.0, $dup(<$t>::BITS as _)));
                Self($shl(self.0, $neg(c)))
            }
        }
    };
}

#[inline(always)]
unsafe fn vminq_u64(a: uint64x2_t, b: uint64x2_t) -> uint64x2_t {
    vbslq_u64(vcltq_u64(a, b), a, b)
}

macro_rules! signed_limb {
    ($name:ident($t:ty) { neg: $neg:ident, abs: $abs:ident }) => {
        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $neg(self.0) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $abs(self.0) })
            }
        }
    };
}

int_limb! {
    I8x16(i8, int8x16_t; 16) {
        load: vld1q_s8, store: vst1q_s8, dup: vdupq_n_s8, add: vaddq_s8, sub: vsubq_s8,
        mask: u8, uint8x16_t, vst1q_u8,
        eq: vceqq_s8, lt: vcltq_s8, le: vcleq_s8, gt: vcgtq_s8, ge: vcgeq_s8,
        bsl: vbslq_s8, and: vandq_s8, or: vorrq_s8, xor: veorq_s8,
        qadd: vqaddq_s8, qsub: vqsubq_s8, shl: vshlq_s8, count: vdupq_n_s8 as i8,
    }
    limb {
        binary_ops!(mul => vmulq_s8);
        reductions!(i8 { reduce_add => vaddvq_s8, reduce_min => vminvq_s8, reduce_max => vmaxvq_s8 });
    }
    int {
        variable_shifts!(i8, signed {
            shl: vshlq_s8, neg: vnegq_s8, min: vminq_u8, dup: vdupq_n_u8,
            to_unsigned: vreinterpretq_u8_s8, to_signed: vreinterpretq_s8_u8
        });
    }
}
signed_limb!(I8x16(i8) { neg: vnegq_s8, abs: vabsq_s8 });

int_limb! {
    U8x16(u8, uint8x16_t; 16) {
        load: vld1q_u8, store: vst1q_u8, dup: vdupq_n_u8, add: vaddq_u8, sub: vsubq_u8,
        mask: u8, uint8x16_t, vst1q_u8,
        eq: vceqq_u8, lt: vcltq_u8, le: vcleq_u8, gt: vcgtq_u8, ge: vcgeq_u8,
        bsl: vbslq_u8, and: vandq_u8, or: vorrq_u8, xor: veorq_u8,
        qadd: vqaddq_u8, qsub: vqsubq_u8, shl: vshlq_u8, count: vdupq_n_s8 as i8,
    }
    limb {
        binary_ops!(mul => vmulq_u8);
        reductions!(u8 { reduce_add => vaddvq_u8, reduce_min => vminvq_u8, reduce_max => vmaxvq_u8 });
    }
    int {
        variable_shifts!(u8, unsigned {
            shl: vshlq_u8, neg: vnegq_s8, min: vminq_u8, dup: vdupq_n_u8,
            to_signed: vreinterpretq_s8_u8
        });
    }
}

int_limb! {
    I16x8(i16, int16x8_t; 8) {
        load: vld1q_s16, store: vst1q_s16, dup: vdupq_n_s16, add: vaddq_s16, sub: vsubq_s16,
        mask: u16, uint16x8_t, vst1q_u16,
        eq: vceqq_s16, lt: vcltq_s16, le: vcleq_s16, gt: vcgtq_s16, ge: vcgeq_s16,
        bsl: vbslq_s16, and: vandq_s16, or: vorrq_s16, xor: veorq_s16,
        qadd: vqaddq_s16, qsub: vqsubq_s16, shl: vshlq_s16, count: vdupq_n_s16 as i16,
    }
    limb {
        binary_ops!(mul => vmulq_s16);
        reductions!(i16 { reduce_add => vaddvq_s16, reduce_min => vminvq_s16, reduce_max => vmaxvq_s16 });
    }
    int {
        variable_shifts!(i16, signed {
            shl: vshlq_s16, neg: vnegq_s16, min: vminq_u16, dup: vdupq_n_u16,
            to_unsigned: vreinterpretq_u16_s16, to_signed: vreinterpretq_s16_u16
        });
    }
}
signed_limb!(I16x8(i16) { neg: vnegq_s16, abs: vabsq_s16 });

int_limb! {
    U16x8(u16, uint16x8_t; 8) {
        load: vld1q_u16, store: vst1q_u16, dup: vdupq_n_u16, add: vaddq_u16, sub: vsubq_u16,
        mask: u16, uint16x8_t, vst1q_u16,
        eq: vceqq_u16, lt: vcltq_u16, le: vcleq_u16, gt: vcgtq_u16, ge: vcgeq_u16,
        bsl: vbslq_u16, and: vandq_u16, or: vorrq_u16, xor: veorq_u16,
        qadd: vqaddq_u16, qsub: vqsubq_u16, shl: vshlq_u16, count: vdupq_n_s16 as i16,
    }
    limb {
        binary_ops!(mul => vmulq_u16);
        reductions!(u16 { reduce_add => vaddvq_u16, reduce_min => vminvq_u16, reduce_max => vmaxvq_u16 });
    }
    int {
        variable_shifts!(u16, unsigned {
            shl: vshlq_u16, neg: vnegq_s16, min: vminq_u16, dup: vdupq_n_u16,
            to_signed: vreinterpretq_s16_u16
        });
    }
}

int_limb! {
    I32x4(i32, int32x4_t; 4) {
        load: vld1q_s32, store: vst1q_s32, dup: vdupq_n_s32, add: vaddq_s32, sub: vsubq_s32,
        mask: u32, uint32x4_t, vst1q_u32,
        eq: vceqq_s32, lt: vcltq_s32, le: vcleq_s32, gt: vcgtq_s32, ge: vcgeq_s32,
        bsl: vbslq_s32, and: vandq_s32, or: vorrq_s32, xor: veorq_s32,
        qadd: vqaddq_s32, qsub: vqsubq_s32, shl: vshlq_s32, count: vdupq_n_s32 as i32,
    }
    limb {
        binary_ops!(mul => vmulq_s32);
        reductions!(i32 { reduce_add => vaddvq_s32, reduce_min => vminvq_s32, reduce_max => vmaxvq_s32 });
    }
    int {
        variable_shifts!(i32, signed {
            shl: vshlq_s32, neg: vnegq_s32, min: vminq_u32, dup: vdupq_n_u32,
            to_unsigned: vreinterpretq_u32_s32, to_signed: vreinterpretq_s32_u32
        });
    }
}
signed_limb!(I32x4(i32) { neg: vnegq_s32, abs: vabsq_s32 });

int_limb! {
    U32x4(u32, uint32x4_t; 4) {
        load: vld1q_u32, store: vst1q_u32, dup: vdupq_n_u32, add: vaddq_u32, sub: vsubq_u32,
        mask: u32, uint32x4_t, vst1q_u32,
        eq: vceqq_u32, lt: vcltq_u32, le: vcleq_u32, gt: vcgtq_u32, ge: vcgeq_u32,
        bsl: vbslq_u32, and: vandq_u32, or: vorrq_u32, xor: veorq_u32,
        qadd: vqaddq_u32, qsub: vqsubq_u32, shl: vshlq_u32, count: vdupq_n_s32 as i32,
    }
    limb {
        binary_ops!(mul => vmulq_u32);
        reductions!(u32 { reduce_add => vaddvq_u32, reduce_min => vminvq_u32, reduce_max => vmaxvq_u32 });
    }
    int {
        variable_shifts!(u32, unsigned {
            shl: vshlq_u32, neg: vnegq_s32, min: vminq_u32, dup: vdupq_n_u32,
            to_signed: vreinterpretq_s32_u32
        });
    }
}

int_limb! {
    I64x2(i64, int64x2_t; 2) {
        load: vld1q_s64, store: vst1q_s64, dup: vdupq_n_s64, add: vaddq_s64, sub: vsubq_s64,
        mask: u64, uint64x2_t, vst1q_u64,
        eq: vceqq_s64, lt: vcltq_s64, le: vcleq_s64, gt: vcgtq_s64, ge: vcgeq_s64,
        bsl: vbslq_s64, and: vandq_s64, or: vorrq_s64, xor: veorq_s64,
        qadd: vqaddq_s64, qsub: vqsubq_s64, shl: vshlq_s64, count: vdupq_n_s64 as i64,
    }
    limb {
        reductions!(i64 { reduce_add => vaddvq_s64 });
    }
    int {
        variable_shifts!(i64, signed {
            shl: vshlq_s64, neg: vnegq_s64, min: vminq_u64, dup: vdupq_n_u64,
            to_unsigned: vreinterpretq_u64_s64, to_signed: vreinterpretq_s64_u64
        });
    }
}
signed_limb!(I64x2(i64) { neg: vnegq_s64, abs: vabsq_s64 });

int_limb! {
    U64x2(u64, uint64x2_t; 2) {
        load: vld1q_u64, store: vst1q_u64, dup: vdupq_n_u64, add: vaddq_u64, sub: vsubq_u64,
        mask: u64, uint64x2_t, vst1q_u64,
        eq: vceqq_u64, lt: vcltq_u64, le: vcleq_u64, gt: vcgtq_u64, ge: vcgeq_u64,
        bsl: vbslq_u64, and: vandq_u64, or: vorrq_u64, xor: veorq_u64,
        qadd: vqaddq_u64, qsub: vqsubq_u64, shl: vshlq_u64, count: vdupq_n_s64 as i64,
    }
    limb {
        reductions!(u64 { reduce_add => vaddvq_u64 });
    }
    int {
        variable_shifts!(u64, unsigned {
            shl: vshlq_u64, neg: vnegq_s64, min: vminq_u64, dup: vdupq_n_u64,
            to_signed: vreinterpretq_s64_u64
        });
    }
}
