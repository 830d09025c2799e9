//! Capability contracts.
//!
//! Operations are grouped by what the element type can do:
//!
//! | Trait                 | Element types           | Adds                                   |
//! |-----------------------|-------------------------|----------------------------------------|
//! | [`SimdVector`]        | all                     | arithmetic, compare, select, reduce    |
//! | [`IntegerVector`]     | `i*`, `u*`              | bit logic, shifts, remainder           |
//! | [`UnsignedVector`]    | `u*`                    | reinterpretation as signed             |
//! | [`SignedVector`]      | `i*`, `f*`              | negation, absolute value               |
//! | [`SignedIntegerVector`] | `i*`                  | reinterpretation as unsigned           |
//! | [`FloatVector`]       | `f32`, `f64`            | rounding, sqrt, transcendentals        |
//!
//! Every `*_masked` operation computes the full result and then keeps the original
//! value of `self` in the lanes where the mask is clear. `*_assign*` forms update
//! `self` in place; everything else returns a new value.

use std::fmt::Debug;
use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::simd::element::SimdElement;

/// Per-lane boolean algebra.
pub trait MaskVector:
    Copy
    + Debug
    + PartialEq
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    const LANES: usize;

    fn splat(value: bool) -> Self;
    fn extract(&self, index: usize) -> bool;
    fn insert(&mut self, index: usize, value: bool);

    fn land(self, rhs: Self) -> Self;
    fn lor(self, rhs: Self) -> Self;
    fn lxor(self, rhs: Self) -> Self;
    fn lnot(self) -> Self;
    fn land_assign(&mut self, rhs: Self);
    fn lor_assign(&mut self, rhs: Self);
    fn lxor_assign(&mut self, rhs: Self);
    fn lnot_assign(&mut self);

    /// True iff every lane is set.
    fn hland(&self) -> bool;
    /// True iff any lane is set.
    fn hlor(&self) -> bool;
    /// True iff an odd number of lanes is set.
    fn hlxor(&self) -> bool;
    fn count_true(&self) -> usize;

    /// Bit `i` is lane `i`.
    fn to_bitmask(&self) -> u64;
}

/// Operations every vector supports.
pub trait SimdVector:
    Copy
    + Debug
    + PartialEq
    + From<Self::Elem>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    type Elem: SimdElement;
    type Mask: MaskVector;

    const LANES: usize;

    fn zero() -> Self;
    fn splat(value: Self::Elem) -> Self;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn extract(&self, index: usize) -> Self::Elem;

    /// # Panics
    ///
    /// Panics if `index >= LANES`.
    fn insert(&mut self, index: usize, value: Self::Elem);

    fn add_masked(self, mask: Self::Mask, rhs: impl Into<Self>) -> Self;
    fn sub_masked(self, mask: Self::Mask, rhs: impl Into<Self>) -> Self;
    fn mul_masked(self, mask: Self::Mask, rhs: impl Into<Self>) -> Self;
    fn div_masked(self, mask: Self::Mask, rhs: impl Into<Self>) -> Self;

    fn add_assign_masked(&mut self, mask: Self::Mask, rhs: impl Into<Self>) {
        *self = self.add_masked(mask, rhs);
    }

    fn sub_assign_masked(&mut self, mask: Self::Mask, rhs: impl Into<Self>) {
        *self = self.sub_masked(mask, rhs);
    }

    fn mul_assign_masked(&mut self, mask: Self::Mask, rhs: impl Into<Self>) {
        *self = self.mul_masked(mask, rhs);
    }

    fn div_assign_masked(&mut self, mask: Self::Mask, rhs: impl Into<Self>) {
        *self = self.div_masked(mask, rhs);
    }

    /// `1 / self`. Integer lanes holding zero panic.
    fn rcp(self) -> Self;
    fn rcp_masked(self, mask: Self::Mask) -> Self;
    /// `scalar / self`.
    fn rcp_scalar(self, scalar: Self::Elem) -> Self;

    /// `self * b + c`. Fused when the backend has the instruction, so the last bit
    /// may differ between backends.
    fn fmuladd(self, b: Self, c: Self) -> Self;
    /// `self * b - c`, fused when available.
    fn fmulsub(self, b: Self, c: Self) -> Self;
    /// `(self + b) * c`.
    fn faddmul(self, b: Self, c: Self) -> Self;
    /// `(self - b) * c`.
    fn fsubmul(self, b: Self, c: Self) -> Self;
    fn fmuladd_masked(self, mask: Self::Mask, b: Self, c: Self) -> Self;

    /// `if self < rhs { self } else { rhs }` per lane.
    fn min(self, rhs: Self) -> Self;
    /// `if self > rhs { self } else { rhs }` per lane.
    fn max(self, rhs: Self) -> Self;
    fn min_masked(self, mask: Self::Mask, rhs: Self) -> Self;
    fn max_masked(self, mask: Self::Mask, rhs: Self) -> Self;

    fn cmp_eq(self, rhs: Self) -> Self::Mask;
    /// True for unordered float lanes.
    fn cmp_ne(self, rhs: Self) -> Self::Mask;
    fn cmp_lt(self, rhs: Self) -> Self::Mask;
    fn cmp_le(self, rhs: Self) -> Self::Mask;
    fn cmp_gt(self, rhs: Self) -> Self::Mask;
    fn cmp_ge(self, rhs: Self) -> Self::Mask;

    /// Lane `i` is `on_true[i]` where `mask[i]`, else `on_false[i]`.
    fn select(mask: Self::Mask, on_true: Self, on_false: Self) -> Self;
    /// Takes `other` where `mask` is set and keeps `self` elsewhere.
    fn blend(self, mask: Self::Mask, other: Self) -> Self {
        Self::select(mask, other, self)
    }

    fn hadd(self) -> Self::Elem;
    fn hmul(self) -> Self::Elem;
    fn hmin(self) -> Self::Elem;
    fn hmax(self) -> Self::Elem;
    /// Sum of the selected lanes (0 if none).
    fn hadd_masked(self, mask: Self::Mask) -> Self::Elem;
    /// Product of the selected lanes (1 if none).
    fn hmul_masked(self, mask: Self::Mask) -> Self::Elem;
}

/// Integer vectors.
pub trait IntegerVector:
    SimdVector
    + Eq
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + Rem<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + BitAndAssign
    + BitOrAssign
    + BitXorAssign
    + RemAssign
    + ShlAssign<u32>
    + ShrAssign<u32>
{
    fn band_masked(self, mask: Self::Mask, rhs: Self) -> Self;
    fn bor_masked(self, mask: Self::Mask, rhs: Self) -> Self;
    fn bxor_masked(self, mask: Self::Mask, rhs: Self) -> Self;
    fn bnot_masked(self, mask: Self::Mask) -> Self;
    fn shl_masked(self, mask: Self::Mask, count: u32) -> Self;
    fn shr_masked(self, mask: Self::Mask, count: u32) -> Self;
    fn rem_masked(self, mask: Self::Mask, rhs: Self) -> Self;

    /// Shifts each lane by the matching lane of `counts`, read as unsigned.
    fn shlv(self, counts: Self) -> Self;
    /// Logical for unsigned lanes, arithmetic for signed ones.
    fn shrv(self, counts: Self) -> Self;

    fn saturating_add(self, rhs: Self) -> Self;
    fn saturating_sub(self, rhs: Self) -> Self;

    fn hband(self) -> Self::Elem;
    fn hbor(self) -> Self::Elem;
    fn hbxor(self) -> Self::Elem;
}

/// Unsigned integer vectors.
pub trait UnsignedVector: IntegerVector {
    type Signed: SignedIntegerVector<Mask = Self::Mask>;

    /// Same bits, signed lanes.
    fn to_signed(self) -> Self::Signed;
}

/// Vectors whose lanes carry a sign.
pub trait SignedVector: SimdVector + Neg<Output = Self> {
    fn abs(self) -> Self;
    fn abs_masked(self, mask: Self::Mask) -> Self;
    fn neg_masked(self, mask: Self::Mask) -> Self;
}

/// Signed integer vectors.
pub trait SignedIntegerVector: IntegerVector + SignedVector {
    type Unsigned: UnsignedVector<Mask = Self::Mask>;

    /// Same bits, unsigned lanes.
    fn to_unsigned(self) -> Self::Unsigned;
}

/// Floating-point vectors.
pub trait FloatVector: SignedVector {
    /// Signed integer vector of the same lane width and count.
    type Int: SignedIntegerVector<Mask = Self::Mask>;

    /// Correctly rounded on every backend.
    fn sqrt(self) -> Self;
    fn sqrt_masked(self, mask: Self::Mask) -> Self;
    /// `1 / sqrt(self)`.
    fn rsqrt(self) -> Self;

    /// Round half to even.
    fn round(self) -> Self;
    fn trunc(self) -> Self;
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn round_masked(self, mask: Self::Mask) -> Self;
    fn trunc_masked(self, mask: Self::Mask) -> Self;
    fn floor_masked(self, mask: Self::Mask) -> Self;
    fn ceil_masked(self, mask: Self::Mask) -> Self;

    /// Rounds half to even, then converts (saturating, NaN to 0).
    fn round_to_int(self) -> Self::Int;
    /// Truncates toward zero, then converts (saturating, NaN to 0).
    fn trunc_to_int(self) -> Self::Int;

    fn to_int_bits(self) -> Self::Int;
    fn from_int_bits(bits: Self::Int) -> Self;
    fn from_int(values: Self::Int) -> Self;

    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn sincos(self) -> (Self, Self);

    fn is_nan(self) -> Self::Mask;
    fn is_inf(self) -> Self::Mask;
    fn is_finite(self) -> Self::Mask;
    /// True for `+0.0` and `-0.0`.
    fn is_zero(self) -> Self::Mask;
    fn is_subnormal(self) -> Self::Mask;
}
