//! SSE4.1 backend: 128-bit registers.
//!
//! Signed 64-bit compares, 8- and 64-bit multiplies, 64-bit min/max, arithmetic
//! 64-bit right shifts and all variable shifts have no SSE4.1 instruction and take the
//! scalar limb fallback. With the `fma` target feature enabled, `mul_add`/`mul_sub`
//! on floats are fused.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::x86::{bits_to_lanes, byte_bits_to_lanes};
use super::{Align16, Backend};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

const ROUND_NEAREST: i32 = _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC;
const ROUND_ZERO: i32 = _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC;
const ROUND_DOWN: i32 = _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC;
const ROUND_UP: i32 = _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC;


/// Blend selector for one register: every lane `width` bytes of all ones where its
/// flag is set. A `bool` is one byte holding 0 or 1, so the flags are zero-extended
/// to the lane width and negated.
#[inline(always)]
fn selector(mask: &[bool], width: usize) -> __m128i {
    debug_assert_eq!(mask.len(), 16 / width);
    let ptr = mask.as_ptr() as *const u8;
    // SAFETY: `mask` holds one flag per lane, which is exactly the bytes read.
    unsafe {
        let zero = _mm_setzero_si128();
        match width {
            1 => _mm_sub_epi8(zero, _mm_loadu_si128(ptr as *const __m128i)),
            2 => _mm_sub_epi16(zero, _mm_cvtepu8_epi16(_mm_loadl_epi64(ptr as *const __m128i))),
            4 => {
                let word = (ptr as *const i32).read_unaligned();
                _mm_sub_epi32(zero, _mm_cvtepu8_epi32(_mm_cvtsi32_si128(word)))
            }
            _ => {
                let pair = (ptr as *const u16).read_unaligned();
                _mm_sub_epi64(zero, _mm_cvtepu8_epi64(_mm_cvtsi32_si128(pair as i32)))
            }
        }
    }
}

/// 128-bit SSE4.1 registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sse41;

impl Backend for Sse41 {
    const NAME: &'static str = "sse";
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

macro_rules! float_limb {
    (
        $name:ident($t:ty, $reg:ty; $lanes:expr) {
            load: $load:ident, store: $store:ident, set1: $set1:ident,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            min: $min:ident, max: $max:ident,
            fmadd: $fmadd:ident, fmsub: $fmsub:ident,
            eq: $eq:ident, ne: $ne:ident, lt: $lt:ident, le: $le:ident, gt: $gt:ident, ge: $ge:ident,
            movemask: $movemask:ident, blendv: $blendv:ident, from_bits: $from_bits:ident,
            andnot: $andnot:ident, xor: $xor:ident,
            sqrt: $sqrt:ident, round: $round:ident,
            bits: $bits:ident, to_bits: $to_bits:ident,
        }
        convert { $($convert:tt)* }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name($reg);

        impl $name {
            #[inline(always)]
            fn sign_bits() -> $reg {
                unsafe { $set1(-0.0) }
            }

            #[inline(always)]
            fn flags(m: $reg, out: &mut [bool]) {
                bits_to_lanes(unsafe { $movemask(m) } as u32 as u64, &mut out[..$lanes]);
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
                Self(unsafe { $set1(value) })
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

            #[cfg(target_feature = "fma")]
            #[inline(always)]
            fn mul_add(self, b: Self, c: Self) -> Self {
                Self(unsafe { $fmadd(self.0, b.0, c.0) })
            }

            #[cfg(target_feature = "fma")]
            #[inline(always)]
            fn mul_sub(self, b: Self, c: Self) -> Self {
                Self(unsafe { $fmsub(self.0, b.0, c.0) })
            }

            // minps/maxps return the second operand on ties and NaN, as the lane
            // functions do.
            #[inline(always)]
            fn min(self, rhs: Self) -> Self {
                Self(unsafe { $min(self.0, rhs.0) })
            }

            #[inline(always)]
            fn max(self, rhs: Self) -> Self {
                Self(unsafe { $max(self.0, rhs.0) })
            }

            #[inline(always)]
            fn eq(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $eq(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ne(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $ne(self.0, rhs.0) }, out)
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
                let sel = selector(&mask[..$lanes], std::mem::size_of::<$t>());
                unsafe { Self($blendv(on_false.0, on_true.0, $from_bits(sel))) }
            }
        }

        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $xor(self.0, Self::sign_bits()) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $andnot(Self::sign_bits(), self.0) })
            }
        }

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

            $($convert)*

            #[inline(always)]
            fn sqrt(self) -> Self {
                Self(unsafe { $sqrt(self.0) })
            }

            #[inline(always)]
            fn round(self) -> Self {
                Self(unsafe { $round::<ROUND_NEAREST>(self.0) })
            }

            #[inline(always)]
            fn trunc(self) -> Self {
                Self(unsafe { $round::<ROUND_ZERO>(self.0) })
            }

            #[inline(always)]
            fn floor(self) -> Self {
                Self(unsafe { $round::<ROUND_DOWN>(self.0) })
            }

            #[inline(always)]
            fn ceil(self) -> Self {
                Self(unsafe { $round::<ROUND_UP>(self.0) })
            }
        }
    };
}

float_limb! {
    F32x4(f32, __m128; 4) {
        load: _mm_loadu_ps, store: _mm_storeu_ps, set1: _mm_set1_ps,
        add: _mm_add_ps, sub: _mm_sub_ps, mul: _mm_mul_ps, div: _mm_div_ps,
        min: _mm_min_ps, max: _mm_max_ps,
        fmadd: _mm_fmadd_ps, fmsub: _mm_fmsub_ps,
        eq: _mm_cmpeq_ps, ne: _mm_cmpneq_ps, lt: _mm_cmplt_ps, le: _mm_cmple_ps,
        gt: _mm_cmpgt_ps, ge: _mm_cmpge_ps,
        movemask: _mm_movemask_ps, blendv: _mm_blendv_ps, from_bits: _mm_castsi128_ps,
        andnot: _mm_andnot_ps, xor: _mm_xor_ps,
        sqrt: _mm_sqrt_ps, round: _mm_round_ps,
        bits: I32x4, to_bits: _mm_castps_si128,
    }
    convert {
        // cvttps2dq gives 0x8000_0000 for NaN and out-of-range lanes; flip the
        // positive overflows to MAX and clear NaN, as `as` does.
        #[inline(always)]
        fn trunc_to_int(self) -> I32x4 {
            unsafe {
                let raw = _mm_cvttps_epi32(self.0);
                let too_big = _mm_castps_si128(_mm_cmpge_ps(self.0, _mm_set1_ps(2147483648.0)));
                let ordered = _mm_castps_si128(_mm_cmpord_ps(self.0, self.0));
                I32x4(_mm_and_si128(_mm_xor_si128(raw, too_big), ordered))
            }
        }

        #[inline(always)]
        fn from_int(values: I32x4) -> Self {
            Self(unsafe { _mm_cvtepi32_ps(values.0) })
        }
    }
}

float_limb! {
    F64x2(f64, __m128d; 2) {
        load: _mm_loadu_pd, store: _mm_storeu_pd, set1: _mm_set1_pd,
        add: _mm_add_pd, sub: _mm_sub_pd, mul: _mm_mul_pd, div: _mm_div_pd,
        min: _mm_min_pd, max: _mm_max_pd,
        fmadd: _mm_fmadd_pd, fmsub: _mm_fmsub_pd,
        eq: _mm_cmpeq_pd, ne: _mm_cmpneq_pd, lt: _mm_cmplt_pd, le: _mm_cmple_pd,
        gt: _mm_cmpgt_pd, ge: _mm_cmpge_pd,
        movemask: _mm_movemask_pd, blendv: _mm_blendv_pd, from_bits: _mm_castsi128_pd,
        andnot: _mm_andnot_pd, xor: _mm_xor_pd,
        sqrt: _mm_sqrt_pd, round: _mm_round_pd,
        bits: I64x2, to_bits: _mm_castpd_si128,
    }
    convert {}
}

/// Integer limb: the operations every width has, plus the per-type extras passed in
/// the `limb`, `int` and `signed` blocks.
macro_rules! int_limb {
    (
        $name:ident($t:ty; $lanes:expr) {
            set1: $set1:ident as $st:ty, add: $add:ident, sub: $sub:ident, eq: $eq:ident,
        }
        limb { $($limb:tt)* }
        int { $($int:tt)* }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name(__m128i);

        impl $name {
            const WIDTH: usize = std::mem::size_of::<$t>();

            #[inline(always)]
            fn flags(m: __m128i, out: &mut [bool]) {
                let bits = unsafe { _mm_movemask_epi8(m) } as u32 as u64;
                byte_bits_to_lanes(bits, Self::WIDTH, &mut out[..$lanes]);
            }
        }

        impl Limb<$t> for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self(_mm_loadu_si128(ptr as *const __m128i))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                _mm_storeu_si128(ptr as *mut __m128i, self.0)
            }

            #[inline(always)]
            fn splat(value: $t) -> Self {
                Self(unsafe { $set1(value as $st) })
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
            fn eq(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { $eq(self.0, rhs.0) }, out)
            }

            #[inline(always)]
            fn ne(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { _mm_xor_si128($eq(self.0, rhs.0), _mm_set1_epi8(-1)) }, out)
            }

            #[inline(always)]
            fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
                let sel = selector(&mask[..$lanes], Self::WIDTH);
                unsafe { Self(_mm_blendv_epi8(on_false.0, on_true.0, sel)) }
            }

            $($limb)*
        }

        impl IntLimb<$t> for $name {
            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                Self(unsafe { _mm_and_si128(self.0, rhs.0) })
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                Self(unsafe { _mm_or_si128(self.0, rhs.0) })
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                Self(unsafe { _mm_xor_si128(self.0, rhs.0) })
            }

            #[inline(always)]
            fn not(self) -> Self {
                Self(unsafe { _mm_xor_si128(self.0, _mm_set1_epi8(-1)) })
            }

            $($int)*
        }
    };
}

/// Ordered compares from a signed `cmpgt`; unsigned lanes are biased by the sign bit
/// first so the signed compare orders them correctly.
macro_rules! ordered_compares {
    ($gt:ident, bias: $bias:expr) => {
        #[inline(always)]
        fn gt(self, rhs: Self, out: &mut [bool]) {
            Self::flags(unsafe { $gt(_mm_xor_si128(self.0, $bias), _mm_xor_si128(rhs.0, $bias)) }, out)
        }

        #[inline(always)]
        fn lt(self, rhs: Self, out: &mut [bool]) {
            rhs.gt(self, out)
        }

        #[inline(always)]
        fn le(self, rhs: Self, out: &mut [bool]) {
            self.gt(rhs, out);
            out[..Self::LANES].iter_mut().for_each(|o| *o = !*o);
        }

        #[inline(always)]
        fn ge(self, rhs: Self, out: &mut [bool]) {
            rhs.gt(self, out);
            out[..Self::LANES].iter_mut().for_each(|o| *o = !*o);
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

/// Shifts by a scalar count. The count register is read as a 64-bit unsigned value,
/// so counts at or past the width give zero (or the sign fill for `sra`).
macro_rules! scalar_shifts {
    ($($method:ident => $intrinsic:ident),* $(,)?) => {$(
        #[inline(always)]
        fn $method(self, count: u32) -> Self {
            Self(unsafe { $intrinsic(self.0, _mm_cvtsi32_si128(count as i32)) })
        }
    )*};
}

macro_rules! signed_limb {
    ($name:ident($t:ty) { abs: $abs:ident, sub: $sub:ident }) => {
        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $sub(_mm_setzero_si128(), self.0) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $abs(self.0) })
            }
        }
    };
    ($name:ident($t:ty) { sub: $sub:ident }) => {
        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $sub(_mm_setzero_si128(), self.0) })
            }
        }
    };
}

int_limb! {
    I8x16(i8; 16) { set1: _mm_set1_epi8 as i8, add: _mm_add_epi8, sub: _mm_sub_epi8, eq: _mm_cmpeq_epi8, }
    limb {
        ordered_compares!(_mm_cmpgt_epi8, bias: _mm_setzero_si128());
        binary_ops!(min => _mm_min_epi8, max => _mm_max_epi8);
    }
    int {
        binary_ops!(saturating_add => _mm_adds_epi8, saturating_sub => _mm_subs_epi8);
    }
}
signed_limb!(I8x16(i8) { abs: _mm_abs_epi8, sub: _mm_sub_epi8 });

int_limb! {
    U8x16(u8; 16) { set1: _mm_set1_epi8 as i8, add: _mm_add_epi8, sub: _mm_sub_epi8, eq: _mm_cmpeq_epi8, }
    limb {
        ordered_compares!(_mm_cmpgt_epi8, bias: _mm_set1_epi8(i8::MIN));
        binary_ops!(min => _mm_min_epu8, max => _mm_max_epu8);
    }
    int {
        binary_ops!(saturating_add => _mm_adds_epu8, saturating_sub => _mm_subs_epu8);
    }
}

int_limb! {
    I16x8(i16; 8) { set1: _mm_set1_epi16 as i16, add: _mm_add_epi16, sub: _mm_sub_epi16, eq: _mm_cmpeq_epi16, }
    limb {
        ordered_compares!(_mm_cmpgt_epi16, bias: _mm_setzero_si128());
        binary_ops!(mul => _mm_mullo_epi16, min => _mm_min_epi16, max => _mm_max_epi16);
    }
    int {
        binary_ops!(saturating_add => _mm_adds_epi16, saturating_sub => _mm_subs_epi16);
        scalar_shifts!(shl => _mm_sll_epi16, shr => _mm_sra_epi16);
    }
}
signed_limb!(I16x8(i16) { abs: _mm_abs_epi16, sub: _mm_sub_epi16 });

int_limb! {
    U16x8(u16; 8) { set1: _mm_set1_epi16 as i16, add: _mm_add_epi16, sub: _mm_sub_epi16, eq: _mm_cmpeq_epi16, }
    limb {
        ordered_compares!(_mm_cmpgt_epi16, bias: _mm_set1_epi16(i16::MIN));
        binary_ops!(mul => _mm_mullo_epi16, min => _mm_min_epu16, max => _mm_max_epu16);
    }
    int {
        binary_ops!(saturating_add => _mm_adds_epu16, saturating_sub => _mm_subs_epu16);
        scalar_shifts!(shl => _mm_sll_epi16, shr => _mm_srl_epi16);
    }
}

int_limb! {
    I32x4(i32; 4) { set1: _mm_set1_epi32 as i32, add: _mm_add_epi32, sub: _mm_sub_epi32, eq: _mm_cmpeq_epi32, }
    limb {
        ordered_compares!(_mm_cmpgt_epi32, bias: _mm_setzero_si128());
        binary_ops!(mul => _mm_mullo_epi32, min => _mm_min_epi32, max => _mm_max_epi32);
    }
    int {
        scalar_shifts!(shl => _mm_sll_epi32, shr => _mm_sra_epi32);
    }
}
signed_limb!(I32x4(i32) { abs: _mm_abs_epi32, sub: _mm_sub_epi32 });

int_limb! {
    U32x4(u32; 4) { set1: _mm_set1_epi32 as i32, add: _mm_add_epi32, sub: _mm_sub_epi32, eq: _mm_cmpeq_epi32, }
    limb {
        ordered_compares!(_mm_cmpgt_epi32, bias: _mm_set1_epi32(i32::MIN));
        binary_ops!(mul => _mm_mullo_epi32, min => _mm_min_epu32, max => _mm_max_epu32);
    }
    int {
        scalar_shifts!(shl => _mm_sll_epi32, shr => _mm_srl_epi32);
    }
}

int_limb! {
    I64x2(i64; 2) { set1: _mm_set1_epi64x as i64, add: _mm_add_epi64, sub: _mm_sub_epi64, eq: _mm_cmpeq_epi64, }
    limb {}
    int {
        scalar_shifts!(shl => _mm_sll_epi64);
    }
}
signed_limb!(I64x2(i64) { sub: _mm_sub_epi64 });

int_limb! {
    U64x2(u64; 2) { set1: _mm_set1_epi64x as i64, add: _mm_add_epi64, sub: _mm_sub_epi64, eq: _mm_cmpeq_epi64, }
    limb {}
    int {
        scalar_shifts!(shl => _mm_sll_epi64, shr => _mm_srl_epi64);
    }
}
