//! Native register ("limb") contracts.
//!
//! A limb is one hardware register holding `LANES` elements of type `T`. Backends
//! implement these traits once per element type; a logical vector is a run of limbs
//! (see [`decompose`](crate::simd::decompose)).
//!
//! Every operation except `load`, `store` and `splat` has a default body that spills
//! the register into an aligned scratch buffer and applies the scalar lane function.
//! Backends override what their instruction set can do natively and inherit the rest,
//! so a missing instruction costs speed but never changes a result.

use std::fmt::Debug;

use crate::simd::element::{FloatElement, IntElement, SignedElement, SimdElement};

/// Widest limb of any backend, in lanes (AVX-512 with 8-bit elements).
pub(crate) const MAX_LANES: usize = 64;

/// Register spill area for the scalar fallback.
#[repr(C, align(64))]
pub(crate) struct Scratch<T>([T; MAX_LANES]);

impl<T: SimdElement> Scratch<T> {
    #[inline(always)]
    pub(crate) fn new() -> Self {
        Self([T::zero(); MAX_LANES])
    }

    #[inline(always)]
    pub(crate) fn lanes(&self, len: usize) -> &[T] {
        &self.0[..len]
    }

    #[inline(always)]
    pub(crate) fn lanes_mut(&mut self, len: usize) -> &mut [T] {
        &mut self.0[..len]
    }
}

/// Operations every limb supports.
///
/// Compares write one `bool` per lane into `out[..LANES]`; `select` reads one `bool`
/// per lane from `mask[..LANES]`. Both slices must hold at least `LANES` entries.
pub trait Limb<T: SimdElement>: Copy + Debug + Send + Sync + 'static {
    /// Lanes per register.
    const LANES: usize;
    /// `false` for the emulation backend, whose scalar loop is the intended path.
    const NATIVE: bool = true;

    /// Loads `LANES` elements from `ptr`, which need not be aligned.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `LANES` elements.
    unsafe fn load(ptr: *const T) -> Self;

    /// Stores `LANES` elements to `ptr`, which need not be aligned.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `LANES` elements.
    unsafe fn store(self, ptr: *mut T);

    fn splat(value: T) -> Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_sub)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_mul)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_div)
    }

    /// `self * b + c`, fused where the hardware has it.
    #[inline(always)]
    fn mul_add(self, b: Self, c: Self) -> Self {
        self.mul(b).add(c)
    }

    /// `self * b - c`, fused where the hardware has it.
    #[inline(always)]
    fn mul_sub(self, b: Self, c: Self) -> Self {
        self.mul(b).sub(c)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_max)
    }

    #[inline(always)]
    fn eq(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a == b)
    }

    #[inline(always)]
    fn ne(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a != b)
    }

    #[inline(always)]
    fn lt(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a < b)
    }

    #[inline(always)]
    fn le(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a <= b)
    }

    #[inline(always)]
    fn gt(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a > b)
    }

    #[inline(always)]
    fn ge(self, rhs: Self, out: &mut [bool]) {
        slow::compare(self, rhs, out, |a, b| a >= b)
    }

    /// Lane `i` of the result is `on_true[i]` where `mask[i]`, else `on_false[i]`.
    #[inline(always)]
    fn select(mask: &[bool], on_true: Self, on_false: Self) -> Self {
        slow::select(mask, on_true, on_false)
    }

    #[inline(always)]
    fn reduce_add(self) -> T {
        slow::fold(self, T::lane_add)
    }

    #[inline(always)]
    fn reduce_mul(self) -> T {
        slow::fold(self, T::lane_mul)
    }

    #[inline(always)]
    fn reduce_min(self) -> T {
        slow::fold(self, T::lane_min)
    }

    #[inline(always)]
    fn reduce_max(self) -> T {
        slow::fold(self, T::lane_max)
    }
}

/// Integer limb operations.
pub trait IntLimb<T: IntElement>: Limb<T> {
    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_and)
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_or)
    }

    #[inline(always)]
    fn xor(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_xor)
    }

    #[inline(always)]
    fn not(self) -> Self {
        slow::map(self, T::lane_not)
    }

    #[inline(always)]
    fn shl(self, count: u32) -> Self {
        slow::map(self, |a| T::lane_shl(a, count))
    }

    /// Logical shift for unsigned lanes, arithmetic for signed ones.
    #[inline(always)]
    fn shr(self, count: u32) -> Self {
        slow::map(self, |a| T::lane_shr(a, count))
    }

    #[inline(always)]
    fn shlv(self, counts: Self) -> Self {
        slow::zip(self, counts, T::lane_shlv)
    }

    #[inline(always)]
    fn shrv(self, counts: Self) -> Self {
        slow::zip(self, counts, T::lane_shrv)
    }

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_rem)
    }

    #[inline(always)]
    fn saturating_add(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_saturating_add)
    }

    #[inline(always)]
    fn saturating_sub(self, rhs: Self) -> Self {
        slow::zip(self, rhs, T::lane_saturating_sub)
    }

    #[inline(always)]
    fn reduce_and(self) -> T {
        slow::fold(self, T::lane_and)
    }

    #[inline(always)]
    fn reduce_or(self) -> T {
        slow::fold(self, T::lane_or)
    }

    #[inline(always)]
    fn reduce_xor(self) -> T {
        slow::fold(self, T::lane_xor)
    }
}

/// Operations on lanes that carry a sign.
pub trait SignedLimb<T: SignedElement>: Limb<T> {
    #[inline(always)]
    fn neg(self) -> Self {
        slow::map(self, T::lane_neg)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        slow::map(self, T::lane_abs)
    }
}

/// Floating-point limb operations.
pub trait FloatLimb<T: FloatElement>: SignedLimb<T> {
    /// The same-width signed integer register with the same number of lanes.
    type Bits: IntLimb<T::Int>;

    /// Reinterprets the lanes as integers.
    #[inline(always)]
    fn to_int_bits(self) -> Self::Bits {
        slow::convert(self, T::to_int_bits)
    }

    #[inline(always)]
    fn from_int_bits(bits: Self::Bits) -> Self {
        slow::convert(bits, T::from_int_bits)
    }

    /// `as` conversion: truncates toward zero, saturates, NaN becomes 0.
    #[inline(always)]
    fn trunc_to_int(self) -> Self::Bits {
        slow::convert(self, T::to_int)
    }

    /// `as` conversion, rounding to nearest.
    #[inline(always)]
    fn from_int(values: Self::Bits) -> Self {
        slow::convert(values, T::from_int)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        slow::map(self, T::lane_sqrt)
    }

    /// Round half to even without raising FP exceptions.
    #[inline(always)]
    fn round(self) -> Self {
        slow::map(self, T::lane_round)
    }

    #[inline(always)]
    fn trunc(self) -> Self {
        slow::map(self, T::lane_trunc)
    }

    #[inline(always)]
    fn floor(self) -> Self {
        slow::map(self, T::lane_floor)
    }

    #[inline(always)]
    fn ceil(self) -> Self {
        slow::map(self, T::lane_ceil)
    }
}

/// Scalar fallback for limb operations without a native instruction.
pub(crate) mod slow {
    use super::{Limb, Scratch, MAX_LANES};
    use crate::simd::element::SimdElement;

    #[inline(always)]
    fn note<T: SimdElement, L: Limb<T>>() {
        debug_assert!(L::LANES <= MAX_LANES);
        if L::NATIVE {
            perf_warning!(
                "{}x{} limb has no native instruction for an operation; running it lane by lane",
                T::NAME,
                L::LANES
            );
        }
    }

    #[inline(always)]
    fn spill<T: SimdElement, L: Limb<T>>(limb: L) -> Scratch<T> {
        let mut scratch = Scratch::new();
        // SAFETY: the scratch buffer holds MAX_LANES >= L::LANES elements.
        unsafe { limb.store(scratch.lanes_mut(L::LANES).as_mut_ptr()) };
        scratch
    }

    #[inline(always)]
    fn reload<T: SimdElement, L: Limb<T>>(scratch: &Scratch<T>) -> L {
        // SAFETY: as in `spill`.
        unsafe { L::load(scratch.lanes(L::LANES).as_ptr()) }
    }

    #[inline(always)]
    pub(crate) fn map<T: SimdElement, L: Limb<T>>(a: L, f: impl Fn(T) -> T) -> L {
        note::<T, L>();
        let mut a = spill(a);
        for x in a.lanes_mut(L::LANES) {
            *x = f(*x);
        }
        reload(&a)
    }

    #[inline(always)]
    pub(crate) fn zip<T: SimdElement, L: Limb<T>>(a: L, b: L, f: impl Fn(T, T) -> T) -> L {
        note::<T, L>();
        let mut a = spill(a);
        let b = spill(b);
        for (x, &y) in a.lanes_mut(L::LANES).iter_mut().zip(b.lanes(L::LANES)) {
            *x = f(*x, y);
        }
        reload(&a)
    }

    #[inline(always)]
    pub(crate) fn compare<T: SimdElement, L: Limb<T>>(
        a: L,
        b: L,
        out: &mut [bool],
        f: impl Fn(T, T) -> bool,
    ) {
        note::<T, L>();
        let a = spill(a);
        let b = spill(b);
        let lanes = a.lanes(L::LANES).iter().zip(b.lanes(L::LANES));
        for (o, (&x, &y)) in out[..L::LANES].iter_mut().zip(lanes) {
            *o = f(x, y);
        }
    }

    #[inline(always)]
    pub(crate) fn select<T: SimdElement, L: Limb<T>>(mask: &[bool], on_true: L, on_false: L) -> L {
        note::<T, L>();
        let mut a = spill(on_true);
        let b = spill(on_false);
        let lanes = a.lanes_mut(L::LANES).iter_mut().zip(b.lanes(L::LANES));
        for ((x, &y), &m) in lanes.zip(&mask[..L::LANES]) {
            if !m {
                *x = y;
            }
        }
        reload(&a)
    }

    /// Lane-wise conversion between two registers with the same lane count.
    #[inline(always)]
    pub(crate) fn convert<S, D, LS, LD>(a: LS, f: impl Fn(S) -> D) -> LD
    where
        S: SimdElement,
        D: SimdElement,
        LS: Limb<S>,
        LD: Limb<D>,
    {
        debug_assert_eq!(LS::LANES, LD::LANES);
        note::<S, LS>();
        let a = spill(a);
        let mut out = Scratch::<D>::new();
        for (o, &x) in out.lanes_mut(LD::LANES).iter_mut().zip(a.lanes(LS::LANES)) {
            *o = f(x);
        }
        reload(&out)
    }

    #[inline(always)]
    pub(crate) fn fold<T: SimdElement, L: Limb<T>>(a: L, f: impl Fn(T, T) -> T) -> T {
        note::<T, L>();
        let a = spill(a);
        let lanes = a.lanes(L::LANES);
        lanes[1..].iter().fold(lanes[0], |acc, &x| f(acc, x))
    }
}
