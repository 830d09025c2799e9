//! AVX-512 backend: 512-bit registers for 32- and 64-bit lanes.
//!
//! Compares produce k-masks and selects are mask blends. Only AVX-512F is assumed, so
//! 8- and 16-bit lanes stay on the 256-bit AVX2 limbs (AVX-512BW would be needed for
//! them) and 32/64-bit saturating arithmetic runs lane by lane.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::avx2::{I16x16, I8x32, U16x16, U8x32};
use super::x86::{bits_to_lanes, lanes_to_bits};
use super::{Align64, Backend};
use crate::simd::limb::{FloatLimb, IntLimb, Limb, SignedLimb};

// roundscale immediates: scale 0, exceptions suppressed
const ROUND_NEAREST: i32 = 0x08;
const ROUND_DOWN: i32 = 0x09;
const ROUND_UP: i32 = 0x0a;
const ROUND_ZERO: i32 = 0x0b;

/// 512-bit AVX-512F registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Avx512;

impl Backend for Avx512 {
    const NAME: &'static str = "avx512";
    const VECTOR_ALIGN: usize = 64;

    type Align = Align64;

    type F32 = F32x16;
    type F64 = F64x8;
    type I8 = I8x32;
    type I16 = I16x16;
    type I32 = I32x16;
    type I64 = I64x8;
    type U8 = U8x32;
    type U16 = U16x16;
    type U32 = U32x16;
    type U64 = U64x8;
}

macro_rules! float_limb {
    (
        $name:ident($t:ty, $reg:ty; $lanes:expr, $kmask:ty) {
            load: $load:ident, store: $store:ident, set1: $set1:ident,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, div: $div:ident,
            min: $min:ident, max: $max:ident, fmadd: $fmadd:ident, fmsub: $fmsub:ident,
            cmp: $cmp:ident, blend: $blend:ident,
            sign: $sign:expr, to_bits: $to_bits:ident, from_bits: $from_bits:ident,
            abs: $abs:ident, sqrt: $sqrt:ident, roundscale: $roundscale:ident,
            bits: $bits:ident,
        }
        convert { $($convert:tt)* }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name($reg);

        impl $name {
            #[inline(always)]
            fn compare<const PREDICATE: i32>(self, rhs: Self, out: &mut [bool]) {
                let bits = unsafe { $cmp::<PREDICATE>(self.0, rhs.0) } as u64;
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

            #[inline(always)]
            fn mul_add(self, b: Self, c: Self) -> Self {
                Self(unsafe { $fmadd(self.0, b.0, c.0) })
            }

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
                let k = lanes_to_bits(&mask[..$lanes]) as $kmask;
                Self(unsafe { $blend(k, on_false.0, on_true.0) })
            }
        }

        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                // float xor needs AVX-512DQ; flip the sign bit on the integer view
                Self(unsafe { $from_bits(_mm512_xor_si512($to_bits(self.0), $sign)) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $abs(self.0) })
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
                Self(unsafe { $roundscale::<ROUND_NEAREST>(self.0) })
            }

            #[inline(always)]
            fn trunc(self) -> Self {
                Self(unsafe { $roundscale::<ROUND_ZERO>(self.0) })
            }

            #[inline(always)]
            fn floor(self) -> Self {
                Self(unsafe { $roundscale::<ROUND_DOWN>(self.0) })
            }

            #[inline(always)]
            fn ceil(self) -> Self {
                Self(unsafe { $roundscale::<ROUND_UP>(self.0) })
            }
        }
    };
}

float_limb! {
    F32x16(f32, __m512; 16, __mmask16) {
        load: _mm512_loadu_ps, store: _mm512_storeu_ps, set1: _mm512_set1_ps,
        add: _mm512_add_ps, sub: _mm512_sub_ps, mul: _mm512_mul_ps, div: _mm512_div_ps,
        min: _mm512_min_ps, max: _mm512_max_ps, fmadd: _mm512_fmadd_ps, fmsub: _mm512_fmsub_ps,
        cmp: _mm512_cmp_ps_mask, blend: _mm512_mask_blend_ps,
        sign: _mm512_set1_epi32(i32::MIN), to_bits: _mm512_castps_si512,
        from_bits: _mm512_castsi512_ps,
        abs: _mm512_abs_ps, sqrt: _mm512_sqrt_ps, roundscale: _mm512_roundscale_ps,
        bits: I32x16,
    }
    convert {
        // vcvttps2dq gives 0x8000_0000 for NaN and out-of-range lanes.
        #[inline(always)]
        fn trunc_to_int(self) -> I32x16 {
            unsafe {
                let raw = _mm512_cvttps_epi32(self.0);
                let limit = _mm512_set1_ps(2147483648.0);
                let too_big = _mm512_cmp_ps_mask::<_CMP_GE_OQ>(self.0, limit);
                let nan = _mm512_cmp_ps_mask::<_CMP_UNORD_Q>(self.0, self.0);
                let raw = _mm512_mask_blend_epi32(too_big, raw, _mm512_set1_epi32(i32::MAX));
                I32x16(_mm512_mask_blend_epi32(nan, raw, _mm512_setzero_si512()))
            }
        }

        #[inline(always)]
        fn from_int(values: I32x16) -> Self {
            Self(unsafe { _mm512_cvtepi32_ps(values.0) })
        }
    }
}

float_limb! {
    F64x8(f64, __m512d; 8, __mmask8) {
        load: _mm512_loadu_pd, store: _mm512_storeu_pd, set1: _mm512_set1_pd,
        add: _mm512_add_pd, sub: _mm512_sub_pd, mul: _mm512_mul_pd, div: _mm512_div_pd,
        min: _mm512_min_pd, max: _mm512_max_pd, fmadd: _mm512_fmadd_pd, fmsub: _mm512_fmsub_pd,
        cmp: _mm512_cmp_pd_mask, blend: _mm512_mask_blend_pd,
        sign: _mm512_set1_epi64(i64::MIN), to_bits: _mm512_castpd_si512,
        from_bits: _mm512_castsi512_pd,
        abs: _mm512_abs_pd, sqrt: _mm512_sqrt_pd, roundscale: _mm512_roundscale_pd,
        bits: I64x8,
    }
    convert {}
}

macro_rules! int_limb {
    (
        $name:ident($t:ty; $lanes:expr, $kmask:ty) {
            load: $load:ident as $pt:ty, store: $store:ident, set1: $set1:ident as $st:ty,
            add: $add:ident, sub: $sub:ident, mul: $mul:ident, min: $min:ident, max: $max:ident,
            eq: $eq:ident, ne: $ne:ident, lt: $lt:ident, le: $le:ident, gt: $gt:ident, ge: $ge:ident,
            blend: $blend:ident,
            sll: $sll:ident, shr: $shr:ident, sllv: $sllv:ident, shrv: $shrv:ident,
            reduce_add: $radd:ident, reduce_mul: $rmul:ident,
            reduce_min: $rmin:ident, reduce_max: $rmax:ident,
            reduce_and: $rand:ident, reduce_or: $ror:ident,
        }
    ) => {
        #[derive(Clone, Copy, Debug)]
        #[repr(transparent)]
        pub struct $name(__m512i);

        impl $name {
            #[inline(always)]
            fn flags(k: $kmask, out: &mut [bool]) {
                bits_to_lanes(k as u64, &mut out[..$lanes]);
            }
        }

        impl Limb<$t> for $name {
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> Self {
                Self($load(ptr as *const $pt))
            }

            #[inline(always)]
            unsafe fn store(self, ptr: *mut $t) {
                $store(ptr as *mut $pt, self.0)
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
            fn mul(self, rhs: Self) -> Self {
                Self(unsafe { $mul(self.0, rhs.0) })
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
                let k = lanes_to_bits(&mask[..$lanes]) as $kmask;
                Self(unsafe { $blend(k, on_false.0, on_true.0) })
            }

            #[inline(always)]
            fn reduce_add(self) -> $t {
                unsafe { $radd(self.0) as $t }
            }

            #[inline(always)]
            fn reduce_mul(self) -> $t {
                unsafe { $rmul(self.0) as $t }
            }

            #[inline(always)]
            fn reduce_min(self) -> $t {
                unsafe { $rmin(self.0) as $t }
            }

            #[inline(always)]
            fn reduce_max(self) -> $t {
                unsafe { $rmax(self.0) as $t }
            }
        }

        impl IntLimb<$t> for $name {
            #[inline(always)]
            fn and(self, rhs: Self) -> Self {
                Self(unsafe { _mm512_and_si512(self.0, rhs.0) })
            }

            #[inline(always)]
            fn or(self, rhs: Self) -> Self {
                Self(unsafe { _mm512_or_si512(self.0, rhs.0) })
            }

            #[inline(always)]
            fn xor(self, rhs: Self) -> Self {
                Self(unsafe { _mm512_xor_si512(self.0, rhs.0) })
            }

            #[inline(always)]
            fn not(self) -> Self {
                Self(unsafe { _mm512_xor_si512(self.0, _mm512_set1_epi32(-1)) })
            }

            #[inline(always)]
            fn shl(self, count: u32) -> Self {
                Self(unsafe { $sll(self.0, _mm_cvtsi32_si128(count as i32)) })
            }

            #[inline(always)]
            fn shr(self, count: u32) -> Self {
                Self(unsafe { $shr(self.0, _mm_cvtsi32_si128(count as i32)) })
            }

            #[inline(always)]
            fn shlv(self, counts: Self) -> Self {
                Self(unsafe { $sllv(self.0, counts.0) })
            }

            #[inline(always)]
            fn shrv(self, counts: Self) -> Self {
                Self(unsafe { $shrv(self.0, counts.0) })
            }

            #[inline(always)]
            fn reduce_and(self) -> $t {
                unsafe { $rand(self.0) as $t }
            }

            #[inline(always)]
            fn reduce_or(self) -> $t {
                unsafe { $ror(self.0) as $t }
            }
        }
    };
}

int_limb! {
    I32x16(i32; 16, __mmask16) {
        load: _mm512_loadu_epi32 as i32, store: _mm512_storeu_epi32, set1: _mm512_set1_epi32 as i32,
        add: _mm512_add_epi32, sub: _mm512_sub_epi32, mul: _mm512_mullo_epi32,
        min: _mm512_min_epi32, max: _mm512_max_epi32,
        eq: _mm512_cmpeq_epi32_mask, ne: _mm512_cmpneq_epi32_mask,
        lt: _mm512_cmplt_epi32_mask, le: _mm512_cmple_epi32_mask,
        gt: _mm512_cmpgt_epi32_mask, ge: _mm512_cmpge_epi32_mask,
        blend: _mm512_mask_blend_epi32,
        sll: _mm512_sll_epi32, shr: _mm512_sra_epi32, sllv: _mm512_sllv_epi32, shrv: _mm512_srav_epi32,
        reduce_add: _mm512_reduce_add_epi32, reduce_mul: _mm512_reduce_mul_epi32,
        reduce_min: _mm512_reduce_min_epi32, reduce_max: _mm512_reduce_max_epi32,
        reduce_and: _mm512_reduce_and_epi32, reduce_or: _mm512_reduce_or_epi32,
    }
}

int_limb! {
    U32x16(u32; 16, __mmask16) {
        load: _mm512_loadu_epi32 as i32, store: _mm512_storeu_epi32, set1: _mm512_set1_epi32 as i32,
        add: _mm512_add_epi32, sub: _mm512_sub_epi32, mul: _mm512_mullo_epi32,
        min: _mm512_min_epu32, max: _mm512_max_epu32,
        eq: _mm512_cmpeq_epu32_mask, ne: _mm512_cmpneq_epu32_mask,
        lt: _mm512_cmplt_epu32_mask, le: _mm512_cmple_epu32_mask,
        gt: _mm512_cmpgt_epu32_mask, ge: _mm512_cmpge_epu32_mask,
        blend: _mm512_mask_blend_epi32,
        sll: _mm512_sll_epi32, shr: _mm512_srl_epi32, sllv: _mm512_sllv_epi32, shrv: _mm512_srlv_epi32,
        reduce_add: _mm512_reduce_add_epi32, reduce_mul: _mm512_reduce_mul_epi32,
        reduce_min: _mm512_reduce_min_epu32, reduce_max: _mm512_reduce_max_epu32,
        reduce_and: _mm512_reduce_and_epi32, reduce_or: _mm512_reduce_or_epi32,
    }
}

int_limb! {
    I64x8(i64; 8, __mmask8) {
        load: _mm512_loadu_epi64 as i64, store: _mm512_storeu_epi64, set1: _mm512_set1_epi64 as i64,
        add: _mm512_add_epi64, sub: _mm512_sub_epi64, mul: _mm512_mullox_epi64,
        min: _mm512_min_epi64, max: _mm512_max_epi64,
        eq: _mm512_cmpeq_epi64_mask, ne: _mm512_cmpneq_epi64_mask,
        lt: _mm512_cmplt_epi64_mask, le: _mm512_cmple_epi64_mask,
        gt: _mm512_cmpgt_epi64_mask, ge: _mm512_cmpge_epi64_mask,
        blend: _mm512_mask_blend_epi64,
        sll: _mm512_sll_epi64, shr: _mm512_sra_epi64, sllv: _mm512_sllv_epi64, shrv: _mm512_srav_epi64,
        reduce_add: _mm512_reduce_add_epi64, reduce_mul: _mm512_reduce_mul_epi64,
        reduce_min: _mm512_reduce_min_epi64, reduce_max: _mm512_reduce_max_epi64,
        reduce_and: _mm512_reduce_and_epi64, reduce_or: _mm512_reduce_or_epi64,
    }
}

int_limb! {
    U64x8(u64; 8, __mmask8) {
        load: _mm512_loadu_epi64 as i64, store: _mm512_storeu_epi64, set1: _mm512_set1_epi64 as i64,
        add: _mm512_add_epi64, sub: _mm512_sub_epi64, mul: _mm512_mullox_epi64,
        min: _mm512_min_epu64, max: _mm512_max_epu64,
        eq: _mm512_cmpeq_epu64_mask, ne: _mm512_cmpneq_epu64_mask,
        lt: _mm512_cmplt_epu64_mask, le: _mm512_cmple_epu64_mask,
        gt: _mm512_cmpgt_epu64_mask, ge: _mm512_cmpge_epu64_mask,
        blend: _mm512_mask_blend_epi64,
        sll: _mm512_sll_epi64, shr: _mm512_srl_epi64, sllv: _mm512_sllv_epi64, shrv: _mm512_srlv_epi64,
        reduce_add: _mm512_reduce_add_epi64, reduce_mul: _mm512_reduce_mul_epi64,
        reduce_min: _mm512_reduce_min_epu64, reduce_max: _mm512_reduce_max_epu64,
        reduce_and: _mm512_reduce_and_epi64, reduce_or: _mm512_reduce_or_epi64,
    }
}

macro_rules! signed_limb {
    ($name:ident($t:ty) { sub: $sub:ident, abs: $abs:ident }) => {
        impl SignedLimb<$t> for $name {
            #[inline(always)]
            fn neg(self) -> Self {
                Self(unsafe { $sub(_mm512_setzero_si512(), self.0) })
            }

            #[inline(always)]
            fn abs(self) -> Self {
                Self(unsafe { $abs(self.0) })
            }
        }
    };
}

signed_limb!(I32x16(i32) { sub: _mm512_sub_epi32, abs: _mm512_abs_epi32 });
signed_limb!(I64x8(i64) { sub: _mm512_sub_epi64, abs: _mm512_abs_epi64 });

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::backend::conformance;

    #[test]
    fn float_limbs_match_lane_functions() {
        conformance::float_limb::<f32, F32x16>();
        conformance::float_limb::<f64, F64x8>();
    }

    #[test]
    fn int_limbs_match_lane_functions() {
        conformance::signed_int_limb::<i32, I32x16>();
        conformance::signed_int_limb::<i64, I64x8>();
        conformance::int_limb::<u32, U32x16>();
        conformance::int_limb::<u64, U64x8>();
    }

    #[test]
    fn narrow_lanes_use_256_bit_limbs() {
        assert_eq!(<<Avx512 as Backend>::I8 as Limb<i8>>::LANES, 32);
        assert_eq!(<<Avx512 as Backend>::U16 as Limb<u16>>::LANES, 16);
        assert_eq!(<<Avx512 as Backend>::F32 as Limb<f32>>::LANES, 16);
    }
}
