//! AVX2 backend: 256-bit registers.
//!
//! AVX2 adds 64-bit compares and per-lane variable shifts for 32- and 64-bit lanes
//! over SSE4.1. Multiplies of 8- and 64-bit lanes, 64-bit min/max and arithmetic
//! 64-bit right shifts still run lane by lane. The AVX-512 backend reuses the 8- and
//! 16-bit limbs defined here.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::x86::{bits_to_lanes, byte_bits_to_lanes};
use super::{Align32, Backend};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

const ROUND_NEAREST: i32 = _MM_FROUND_TO_NEAREST_INT | _MM_FROUND_NO_EXC;
const ROUND_ZERO: i32 = _MM_FROUND_TO_ZERO | _MM_FROUND_NO_EXC;
const ROUND_DOWN: i32 = _MM_FROUND_TO_NEG_INF | _MM_FROUND_NO_EXC;
const ROUND_UP: i32 = _MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC;


/// Blend selector for one register: every lane `width` bytes of all ones where its
/// flag is set. A `bool` is one byte holding 0 or 1, so the flags are zero-extended
/// to the lane width and negated.
#[inline(always)]
fn selector(mask: &[bool], width: usize) -> __m256i {
    debug_assert_eq!(mask.len(), 32 / width);
    let ptr = mask.as_ptr() as *const u8;
    // SAFETY: `mask` holds one flag per lane, which is exactly the bytes read.
    unsafe {
        let zero = _mm256_setzero_si256();
        match width {
            1 => _mm256_sub_epi8(zero, _mm256_loadu_si256(ptr as *const __m256i)),
            2 => {
                let bytes = _mm_loadu_si128(ptr as *const __m128i);
                _mm256_sub_epi16(zero, _mm256_cvtepu8_epi16(bytes))
            }
            4 => {
                let bytes = _mm_loadl_epi64(ptr as *const __m128i);
                _mm256_sub_epi32(zero, _mm256_cvtepu8_epi32(bytes))
            }
            _ => {
                let word = (ptr as *const i32).read_unaligned();
                _mm256_sub_epi64(zero, _mm256_cvtepu8_epi64(_mm_cvtsi32_si128(word)))
            }
        }
    }
}

/// 256-bit AVX2 registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Avx2;

impl Backend for Avx2 {
    const NAME: &'static str = "avx2";
    const VECTOR_ALIGN: usize = 32;

    type Align = Align32;

    type F32 = F32x8;
    type F64 = F64x4;
    type I8 = I8x32;
    type I16 = I16x16;
    type I32 = I32x8;
    type I64 = I64x4;
    type U8 = U8x32;
    type U16 = U16x16;
    type U32 = U32x8;
    type U64 = U64x4;
}

macro_rules! float_limb {
    (
        $name:ident($t:ty, $reg:ty; $lanes:expr) {
            load: $load:ident, store: $store:ident, set1: $set1:ident,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            min: $min:ident, max: $max:ident,
            fmadd: $fmadd:ident, fmsub: $fmsub:ident,
            cmp: $cmp:ident, movemask: $movemask:ident, blendv: $blendv:ident,
            from_bits: $from_bits:ident, andnot: $andnot:ident, xor: $xor:ident,
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
            fn compare<const PREDICATE: i32>(self, rhs: Self, out: &mut [bool]) {
                let bits = unsafe { $movemask($cmp::<PREDICATE>(self.0, rhs.0)) } as u32 as u64;
                bits_to_lanes(bits, &mut out[..$lanes]);
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
                self.compare::<_CMP_EQ_OQ>(rhs, out)
            }

            #[inline(always)]
            fn ne(self, rhs: Self, out: &mut [bool]) {
                self.compare::<_CMP_NEQ_UQ>(rhs, out)
            }

            #[inline(always)]
            fn lt(self, rhs: Self, out: &mut [bool]) {
                self.compare::<_CMP_LT_OQ>(rhs, out)
            }

            #[inline(always)]
            fn le(self, rhs: Self, out: &mut [bool]) {
                self.compare::<_CMP_LE_OQ>(rhs, out)
            }

            #[inline(always)]
            fn gt(self, rhs: Self, out: &mut [bool]) {
                self.compare::<_CMP_GT_OQ>(rhs, out)
            }

            #[inline(always)]
            fn ge(self, rhs: Self, out: &mut [bool]) {
                self.compare::<_CMP_GE_OQ>(rhs, out)
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
    F32x8(f32, __m256; 8) {
        load: _mm256_loadu_ps, store: _mm256_storeu_ps, set1: _mm256_set1_ps,
        add: _mm256_add_ps, sub: _mm256_sub_ps, mul: _mm256_mul_ps, div: _mm256_div_ps,
        min: _mm256_min_ps, max: _mm256_max_ps,
        fmadd: _mm256_fmadd_ps, fmsub: _mm256_fmsub_ps,
        cmp: _mm256_cmp_ps, movemask: _mm256_movemask_ps, blendv: _mm256_blendv_ps,
        from_bits: _mm256_castsi256_ps, andnot: _mm256_andnot_ps, xor: _mm256_xor_ps,
        sqrt: _mm256_sqrt_ps, round: _mm256_round_ps,
        bits: I32x8, to_bits: _mm256_castps_si256,
    }
    convert {
        // 0x8000_0000 marks NaN and out-of-range lanes; see the SSE limb.
        #[inline(always)]
        fn trunc_to_int(self) -> I32x8 {
            unsafe {
                let raw = _mm256_cvttps_epi32(self.0);
                let limit = _mm256_set1_ps(2147483648.0);
                let too_big = _mm256_castps_si256(_mm256_cmp_ps::<_CMP_GE_OQ>(self.0, limit));
                let ordered = _mm256_castps_si256(_mm256_cmp_ps::<_CMP_ORD_Q>(self.0, self.0));
                I32x8(_mm256_and_si256(_mm256_xor_si256(raw, too_big), ordered))
            }
        }

        #[inline(always)]
        fn from_int(values: I32x8) -> Self {
            Self(unsafe { _mm256_cvtepi32_ps(values.0) })
        }
    }
}

float_limb! {
    F64x4(f64, __m256d; 4) {
        load: _mm256_loadu_pd, store: _mm256_storeu_pd, set1: _mm256_set1_pd,
        add: _mm256_add_pd, sub: _mm256_sub_pd, mul: _mm256_mul_pd, div: _mm256_div_pd,
        min: _mm256_min_pd, max: _mm256_max_pd,
        fmadd: _mm256_fmadd_pd, fmsub: _mm256_fmsub_pd,
        cmp: _mm256_cmp_pd, movemask: _mm256_movemask_pd, blendv: _mm256_blendv_pd,
        from_bits: _mm256_castsi256_pd, andnot: _mm256_andnot_pd, xor: _mm256_xor_pd,
        sqrt: _mm256_sqrt_pd, round: _mm256_round_pd,
        bits: I64x4, to_bits: _mm256_castpd_si256,
    }
    convert {}
}

macro_rules! int_limb {
    (
        $name:ident($t:ty; $lanes:expr) {
            set1: $set1:ident as $st:ty, add: $add:ident, sub: $sub:ident, eq: $eq:ident,
            gt: $gt:ident, bias: $bias:expr,
        }
        limb { $($limb:tt)* }
        int { $($int:tt)* }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name(__m256i);

        impl $name {
            const WIDTH: usize = std::mem::size_of::<$t>();

            #[inline(always)]
            fn flags(m: __m256i, out: &mut [bool]) {
                let bits = unsafe { _mm256_movemask_epi8(m) } as u32 as u64;
                byte_bits_to_lanes(bits, Self::WIDTH, &mut out[..$lanes]);
            }

            #[inline(always)]
            fn greater(self, rhs: Self) -> __m256i {
                unsafe { $gt(_mm256_xor_si256(self.0, $bias), _mm256_xor_si256(rhs.0, $bias)) }
            }

            #[inline(always)]
            fn ones() -> __m256i {
                unsafe { _mm256_set1_epi8(-1) }
            }
        }

        impl Limb<$t> for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self(_mm256_loadu_si256(ptr as *const __m256i))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                _mm256_storeu_si256(ptr as *mut __m256i, self.0)
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
                Self::flags(unsafe { _mm256_xor_si256($eq(self.0, rhs.0), Self::ones()) }, out)
            }

            #[inline(always)]
            fn gt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(self.greater(rhs), out)
            }

            #[inline(always)]
            fn lt(self, rhs: Self, out: &mut [bool]) {
                Self::flags(rhs.greater(self), out)
            }

            #[inline(always)]
            fn le(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { _mm256_xor_si256(self.greater(rhs), Self::ones()) }, out)
            }

            #[inline(always)]
            fn ge(self, rhs: Self, out: &mut [bool]) {
                Self::flags(unsafe { _mm256_xor_si256(rhs.greater(self), Self::ones()) }, out)
            }

            #[inline(always)]
            fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
                let sel = selector(&mask[..$lanes], Self::WIDTH);
                unsafe { Self(_mm256_blendv_epi8(on_false.0, on_true.0, sel)) }
            }

            $($limb)*
        }

        impl IntLimb<$t> for $name {
            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                Self(unsafe { _mm256_and_si256(self.0, rhs.0) })
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                Self(unsafe { _mm256_or_si256(self.0, rhs.0) })
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                Self(unsafe { _mm256_xor_si256(self.0, rhs.0) })
            }

            #[inline(always)]
            fn not(self) -> Self {
                Self(unsafe { _mm256_xor_si256(self.0, Self::ones()) })
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

/// The count register is read as a 64-bit unsigned value, so counts at or past the
/// width give zero (or the sign fill for `sra`).
macro_rules! scalar_shifts {
    ($($method:ident => $intrinsic:ident),* $(,)?) => {$(
        #[inline(always)]
        fn $method(self, count: u32) -> Self {
            Self(unsafe { $intrinsic(self.0, _mm_cvtsi32_si128(count as i32)) })
        }
    )*};
}

macro_rules! signed_limb {
    ($name:ident($t:ty) { sub: $sub:ident $(, abs: $abs:ident)? }) => {
        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $sub(_mm256_setzero_si256(), self.0) })
            }

            $(
                #[inline(always)]
                fn abs(self) -> Self {
                    Self(unsafe { $abs(self.0) })
                }
            )?
        }
    };
}

int_limb! {
    I8x32(i8; 32) {
        set1: _mm256_set1_epi8 as i8, add: _mm256_add_epi8, sub: _mm256_sub_epi8,
        eq: _mm256_cmpeq_epi8, gt: _mm256_cmpgt_epi8, bias: _mm256_setzero_si256(),
    }
    limb {
        binary_ops!(min => _mm256_min_epi8, max => _mm256_max_epi8);
    }
    int {
        binary_ops!(saturating_add => _mm256_adds_epi8, saturating_sub => _mm256_subs_epi8);
    }
}
signed_limb!(I8x32(i8) { sub: _mm256_sub_epi8, abs: _mm256_abs_epi8 });

int_limb! {
    U8x32(u8; 32) {
        set1: _mm256_set1_epi8 as i8, add: _mm256_add_epi8, sub: _mm256_sub_epi8,
        eq: _mm256_cmpeq_epi8, gt: _mm256_cmpgt_epi8, bias: _mm256_set1_epi8(i8::MIN),
    }
    limb {
        binary_ops!(min => _mm256_min_epu8, max => _mm256_max_epu8);
    }
    int {
        binary_ops!(saturating_add => _mm256_adds_epu8, saturating_sub => _mm256_subs_epu8);
    }
}

int_limb! {
    I16x16(i16; 16) {
        set1: _mm256_set1_epi16 as i16, add: _mm256_add_epi16, sub: _mm256_sub_epi16,
        eq: _mm256_cmpeq_epi16, gt: _mm256_cmpgt_epi16, bias: _mm256_setzero_si256(),
    }
    limb {
        binary_ops!(mul => _mm256_mullo_epi16, min => _mm256_min_epi16, max => _mm256_max_epi16);
    }
    int {
        binary_ops!(saturating_add => _mm256_adds_epi16, saturating_sub => _mm256_subs_epi16);
        scalar_shifts!(shl => _mm256_sll_epi16, shr => _mm256_sra_epi16);
    }
}
signed_limb!(I16x16(i16) { sub: _mm256_sub_epi16, abs: _mm256_abs_epi16 });

int_limb! {
    U16x16(u16; 16) {
        set1: _mm256_set1_epi16 as i16, add: _mm256_add_epi16, sub: _mm256_sub_epi16,
        eq: _mm256_cmpeq_epi16, gt: _mm256_cmpgt_epi16, bias: _mm256_set1_epi16(i16::MIN),
    }
    limb {
        binary_ops!(mul => _mm256_mullo_epi16, min => _mm256_min_epu16, max => _mm256_max_epu16);
    }
    int {
        binary_ops!(saturating_add => _mm256_adds_epu16, saturating_sub => _mm256_subs_epu16);
        scalar_shifts!(shl => _mm256_sll_epi16, shr => _mm256_srl_epi16);
    }
}

int_limb! {
    I32x8(i32; 8) {
        set1: _mm256_set1_epi32 as i32, add: _mm256_add_epi32, sub: _mm256_sub_epi32,
        eq: _mm256_cmpeq_epi32, gt: _mm256_cmpgt_epi32, bias: _mm256_setzero_si256(),
    }
    limb {
        binary_ops!(mul => _mm256_mullo_epi32, min => _mm256_min_epi32, max => _mm256_max_epi32);
    }
    int {
        scalar_shifts!(shl => _mm256_sll_epi32, shr => _mm256_sra_epi32);
        // per-lane counts are unsigned: anything past 31 gives 0 or the sign fill
        binary_ops!(shlv => _mm256_sllv_epi32, shrv => _mm256_srav_epi32);
    }
}
signed_limb!(I32x8(i32) { sub: _mm256_sub_epi32, abs: _mm256_abs_epi32 });

int_limb! {
    U32x8(u32; 8) {
        set1: _mm256_set1_epi32 as i32, add: _mm256_add_epi32, sub: _mm256_sub_epi32,
        eq: _mm256_cmpeq_epi32, gt: _mm256_cmpgt_epi32, bias: _mm256_set1_epi32(i32::MIN),
    }
    limb {
        binary_ops!(mul => _mm256_mullo_epi32, min => _mm256_min_epu32, max => _mm256_max_epu32);
    }
    int {
        scalar_shifts!(shl => _mm256_sll_epi32, shr => _mm256_srl_epi32);
        binary_ops!(shlv => _mm256_sllv_epi32, shrv => _mm256_srlv_epi32);
    }
}

int_limb! {
    I64x4(i64; 4) {
        set1: _mm256_set1_epi64x as i64, add: _mm256_add_epi64, sub: _mm256_sub_epi64,
        eq: _mm256_cmpeq_epi64, gt: _mm256_cmpgt_epi64, bias: _mm256_setzero_si256(),
    }
    limb {}
    int {
        scalar_shifts!(shl => _mm256_sll_epi64);
        binary_ops!(shlv => _mm256_sllv_epi64);
    }
}
signed_limb!(I64x4(i64) { sub: _mm256_sub_epi64 });

int_limb! {
    U64x4(u64; 4) {
        set1: _mm256_set1_epi64x as i64, add: _mm256_add_epi64, sub: _mm256_sub_epi64,
        eq: _mm256_cmpeq_epi64, gt: _mm256_cmpgt_epi64, bias: _mm256_set1_epi64x(i64::MIN),
    }
    limb {}
    int {
        scalar_shifts!(shl => _mm256_sll_epi64, shr => _mm256_srl_epi64);
        binary_ops!(shlv => _mm256_sllv_epi64, shrv => _mm256_srlv_epi64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::backend::conformance;

    #[test]
    fn float_limbs_match_lane_functions() {
        conformance::float_limb::<f32, F32x8>();
        conformance::float_limb::<f64, F64x4>();
    }

    #[test]
    fn int_limbs_match_lane_functions() {
        conformance::signed_int_limb::<i8, I8x32>();
        conformance::signed_int_limb::<i16, I16x16>();
        conformance::signed_int_limb::<i32, I32x8>();
        conformance::signed_int_limb::<i64, I64x4>();
        conformance::int_limb::<u8, U8x32>();
        conformance::int_limb::<u16, U16x16>();
        conformance::int_limb::<u32, U32x8>();
        conformance::int_limb::<u64, U64x4>();
    }
}
