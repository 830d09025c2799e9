//! The generic vector type.
//!
//! [`Vector<T, N, B>`] holds `N` lanes of `T` and runs every lane-wise operation on the
//! registers of backend `B` (the build's [`Native`] backend unless named otherwise).
//! The capability traits in [`traits`](crate::simd::traits) carry the arithmetic;
//! this module holds construction, memory access and lane movement.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use num::traits::AsPrimitive;

use crate::error::{ensure_len, Result};
use crate::simd::backend::{Backend, Native};
use crate::simd::decompose;
use crate::simd::element::{IntElement, SimdElement};
use crate::simd::limb::Limb;
use crate::simd::mask::Mask;
use crate::simd::swizzle::Swizzle;

mod arith;
mod float;
mod int;

/// `N` lanes of `T` on backend `B`.
///
/// Lane 0 is the lowest address in memory. The lane array is aligned to the backend
/// register width; [`alignment`](Self::alignment) tells how aligned a pointer must be
/// for the `*_aligned` loads and stores.
#[repr(C)]
pub struct Vector<T: SimdElement, const N: usize, B: Backend = Native> {
    align: [B::Align; 0],
    lanes: [T; N],
    backend: PhantomData<B>,
}

impl<T: SimdElement, const N: usize, B: Backend> Clone for Vector<T, N, B> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SimdElement, const N: usize, B: Backend> Copy for Vector<T, N, B> {}

impl<T: SimdElement, const N: usize, B: Backend> Default for Vector<T, N, B> {
    #[inline(always)]
    fn default() -> Self {
        Self::from_array([T::zero(); N])
    }
}

impl<T: SimdElement, const N: usize, B: Backend> fmt::Debug for Vector<T, N, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}<{}>", T::NAME, N, B::NAME)?;
        f.debug_list().entries(self.lanes.iter()).finish()
    }
}

/// Lane-wise `==`: false whenever a float lane is NaN. See [`Vector::bits_eq`] for
/// bit-pattern equality.
impl<T: SimdElement, const N: usize, B: Backend> PartialEq for Vector<T, N, B> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: IntElement, const N: usize, B: Backend> Eq for Vector<T, N, B> {}

impl<T: SimdElement, const N: usize, B: Backend> From<[T; N]> for Vector<T, N, B> {
    #[inline(always)]
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

/// Broadcast.
impl<T: SimdElement, const N: usize, B: Backend> From<T> for Vector<T, N, B> {
    #[inline(always)]
    fn from(value: T) -> Self {
        Self::from_array([value; N])
    }
}

impl<T: SimdElement, const N: usize, B: Backend> From<Vector<T, N, B>> for [T; N] {
    #[inline(always)]
    fn from(v: Vector<T, N, B>) -> Self {
        v.lanes
    }
}

impl<T: SimdElement, const N: usize, B: Backend> Index<usize> for Vector<T, N, B> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: usize) -> &T {
        &self.lanes[index]
    }
}

impl<T: SimdElement, const N: usize, B: Backend> IndexMut<usize> for Vector<T, N, B> {
    #[inline(always)]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.lanes[index]
    }
}

impl<T: SimdElement, const N: usize, B: Backend> Vector<T, N, B> {
    pub const LANES: usize = N;

    #[inline(always)]
    pub const fn from_array(lanes: [T; N]) -> Self {
        Self {
            align: [],
            lanes,
            backend: PhantomData,
        }
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.lanes
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[T; N] {
        &self.lanes
    }

    #[inline(always)]
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        &mut self.lanes
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.lanes.iter().copied()
    }

    /// Minimum pointer alignment, in bytes, for the `*_aligned` loads and stores: the
    /// largest power of two dividing the vector's byte size, capped at the backend
    /// register width and never below the element's own alignment.
    pub fn alignment() -> usize {
        let natural = std::mem::align_of::<T>();
        let bytes = N * std::mem::size_of::<T>();
        if bytes == 0 {
            return natural;
        }
        let pow2 = 1usize << bytes.trailing_zeros();
        pow2.min(B::VECTOR_ALIGN).max(natural)
    }

    #[inline(always)]
    pub fn is_aligned(ptr: *const T) -> bool {
        (ptr as usize) % Self::alignment() == 0
    }

    /// The same lanes on another backend.
    #[inline(always)]
    pub fn to_backend<C: Backend>(self) -> Vector<T, N, C> {
        Vector::from_array(self.lanes)
    }

    /// Loads `N` lanes from `ptr`, taking the aligned path when `ptr` allows it.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` elements.
    #[inline(always)]
    pub unsafe fn load(ptr: *const T) -> Self {
        if Self::is_aligned(ptr) {
            Self::load_aligned(ptr)
        } else {
            Self::load_unaligned(ptr)
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` elements and aligned to
    /// [`alignment`](Self::alignment).
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const T) -> Self {
        debug_assert!(Self::is_aligned(ptr), "pointer is not {}-byte aligned", Self::alignment());
        Self::from_array(std::ptr::read(ptr as *const [T; N]))
    }

    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` elements.
    #[inline(always)]
    pub unsafe fn load_unaligned(ptr: *const T) -> Self {
        Self::from_array(std::ptr::read_unaligned(ptr as *const [T; N]))
    }

    /// Reads lane `i` from `ptr.add(i)` only where `mask[i]` is set; other lanes keep
    /// their value from `self`.
    ///
    /// # Safety
    ///
    /// `ptr.add(i)` must be valid for reading for every set lane `i`.
    #[inline(always)]
    pub unsafe fn load_masked(self, mask: Mask<N>, ptr: *const T) -> Self {
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask[i] {
                *lane = ptr.add(i).read_unaligned();
            }
        }
        Self::from_array(lanes)
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` elements.
    #[inline(always)]
    pub unsafe fn store_at(self, ptr: *mut T) {
        if Self::is_aligned(ptr) {
            self.store_aligned_at(ptr)
        } else {
            self.store_unaligned_at(ptr)
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` elements and aligned to
    /// [`alignment`](Self::alignment).
    #[inline(always)]
    pub unsafe fn store_aligned_at(self, ptr: *mut T) {
        debug_assert!(Self::is_aligned(ptr), "pointer is not {}-byte aligned", Self::alignment());
        std::ptr::write(ptr as *mut [T; N], self.lanes)
    }

    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` elements.
    #[inline(always)]
    pub unsafe fn store_unaligned_at(self, ptr: *mut T) {
        std::ptr::write_unaligned(ptr as *mut [T; N], self.lanes)
    }

    /// Writes lane `i` to `ptr.add(i)` only where `mask[i]` is set. Memory behind clear
    /// lanes is neither read nor written.
    ///
    /// # Safety
    ///
    /// `ptr.add(i)` must be valid for writing for every set lane `i`.
    #[inline(always)]
    pub unsafe fn store_masked_at(self, mask: Mask<N>, ptr: *mut T) {
        for (i, &lane) in self.lanes.iter().enumerate() {
            if mask[i] {
                ptr.add(i).write_unaligned(lane);
            }
        }
    }

    /// Reads the first `N` elements of `src`.
    pub fn from_slice(src: &[T]) -> Result<Self> {
        ensure_len("vector source slice", src.len(), N)?;
        let mut lanes = [T::zero(); N];
        lanes.copy_from_slice(&src[..N]);
        Ok(Self::from_array(lanes))
    }

    /// Reads up to `N` leading elements of `src`; missing lanes are zero.
    #[inline(always)]
    pub fn load_partial(src: &[T]) -> Self {
        let count = src.len().min(N);
        // SAFETY: only the first `count` lanes are read.
        unsafe { Self::default().load_masked(Mask::first_n(count), src.as_ptr()) }
    }

    /// Writes all lanes to the first `N` elements of `dst`.
    pub fn write_to_slice(self, dst: &mut [T]) -> Result<()> {
        ensure_len("vector destination slice", dst.len(), N)?;
        dst[..N].copy_from_slice(&self.lanes);
        Ok(())
    }

    /// Writes the leading `min(N, dst.len())` lanes to `dst`.
    #[inline(always)]
    pub fn store_partial(self, dst: &mut [T]) {
        let count = dst.len().min(N);
        // SAFETY: only the first `count` lanes are written.
        unsafe { self.store_masked_at(Mask::first_n(count), dst.as_mut_ptr()) }
    }

    pub fn to_vec(self) -> Vec<T> {
        self.lanes.to_vec()
    }

    /// # Safety
    ///
    /// `index` must be below `N`.
    #[inline(always)]
    pub unsafe fn extract_unchecked(&self, index: usize) -> T {
        *self.lanes.get_unchecked(index)
    }

    /// # Safety
    ///
    /// `index` must be below `N`.
    #[inline(always)]
    pub unsafe fn insert_unchecked(&mut self, index: usize, value: T) {
        *self.lanes.get_unchecked_mut(index) = value;
    }

    /// True when every lane has the same bit pattern in both vectors, so NaN lanes
    /// compare equal to themselves and `-0.0` differs from `0.0`.
    pub fn bits_eq(&self, other: &Self) -> bool {
        self.lanes
            .iter()
            .zip(&other.lanes)
            .all(|(&a, &b)| T::bits_eq(a, b))
    }

    /// Lane-wise `as` conversion: float to integer truncates toward zero and
    /// saturates, NaN becomes 0; integer narrowing wraps.
    pub fn cast<U>(self) -> Vector<U, N, B>
    where
        T: AsPrimitive<U>,
        U: SimdElement,
    {
        Vector::from_array(self.lanes.map(|x| x.as_()))
    }

    /// `out[i] = base[indices[i]]`.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds for `base`.
    pub fn gather(base: &[T], indices: &[usize; N]) -> Self {
        Self::from_array(indices.map(|i| base[i]))
    }

    /// [`gather`](Self::gather) with the indices held in an integer vector.
    pub fn gather_vec<I: IntElement, C: Backend>(base: &[T], indices: Vector<I, N, C>) -> Self {
        Self::gather(base, &indices.to_indices())
    }

    /// Gathers only the set lanes; clear lanes keep `self` and touch no memory.
    pub fn gather_masked(self, mask: Mask<N>, base: &[T], indices: &[usize; N]) -> Self {
        let mut lanes = self.lanes;
        for (i, lane) in lanes.iter_mut().enumerate() {
            if mask[i] {
                *lane = base[indices[i]];
            }
        }
        Self::from_array(lanes)
    }

    /// `base[indices[i]] = self[i]`, in lane order (the highest lane wins on duplicates).
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds for `base`.
    pub fn scatter(self, base: &mut [T], indices: &[usize; N]) {
        for (&lane, &i) in self.lanes.iter().zip(indices) {
            base[i] = lane;
        }
    }

    pub fn scatter_vec<I: IntElement, C: Backend>(self, base: &mut [T], indices: Vector<I, N, C>) {
        self.scatter(base, &indices.to_indices());
    }

    /// Scatters only the set lanes; memory behind clear lanes is untouched.
    pub fn scatter_masked(self, mask: Mask<N>, base: &mut [T], indices: &[usize; N]) {
        for (i, &lane) in self.lanes.iter().enumerate() {
            if mask[i] {
                base[indices[i]] = lane;
            }
        }
    }

    /// `out[i] = self[swizzle[i]]`.
    #[inline(always)]
    pub fn swizzle(self, swizzle: &Swizzle<N>) -> Self {
        Self::from_array(swizzle.apply(&self.lanes))
    }

    /// Permutes the set lanes and keeps `self` in the clear ones.
    #[inline(always)]
    pub fn swizzle_masked(self, mask: Mask<N>, swizzle: &Swizzle<N>) -> Self {
        self.select_lanes(mask, self.swizzle(swizzle), self)
    }

    #[inline(always)]
    pub fn swizzle_assign(&mut self, swizzle: &Swizzle<N>) {
        *self = self.swizzle(swizzle);
    }
}

impl<T: IntElement, const N: usize, B: Backend> Vector<T, N, B> {
    /// Lanes as slice indices; negative or oversized lanes map to `usize::MAX`.
    pub fn to_indices(self) -> [usize; N] {
        self.lanes.map(T::to_index)
    }
}

// Decomposition plumbing shared by the trait implementations.
impl<T: SimdElement, const N: usize, B: Backend> Vector<T, N, B> {
    #[inline(always)]
    pub(crate) fn map_limbs<L: Limb<T>>(self, limb: impl Fn(L) -> L, lane: impl Fn(T) -> T) -> Self {
        Self::from_array(decompose::map(&self.lanes, limb, lane))
    }

    #[inline(always)]
    pub(crate) fn convert_limbs<U: SimdElement, L: Limb<T>, M: Limb<U>>(
        self,
        limb: impl Fn(L) -> M,
        lane: impl Fn(T) -> U,
    ) -> Vector<U, N, B> {
        Vector::from_array(decompose::convert(&self.lanes, limb, lane))
    }

    #[inline(always)]
    pub(crate) fn zip_limbs<L: Limb<T>>(
        self,
        rhs: Self,
        limb: impl Fn(L, L) -> L,
        lane: impl Fn(T, T) -> T,
    ) -> Self {
        Self::from_array(decompose::zip(&self.lanes, &rhs.lanes, limb, lane))
    }

    #[inline(always)]
    pub(crate) fn zip3_limbs<L: Limb<T>>(
        self,
        b: Self,
        c: Self,
        limb: impl Fn(L, L, L) -> L,
        lane: impl Fn(T, T, T) -> T,
    ) -> Self {
        Self::from_array(decompose::zip3(&self.lanes, &b.lanes, &c.lanes, limb, lane))
    }

    #[inline(always)]
    pub(crate) fn compare_limbs(
        self,
        rhs: Self,
        limb: impl Fn(T::Reg<B>, T::Reg<B>, &mut [bool]),
        lane: impl Fn(T, T) -> bool,
    ) -> Mask<N> {
        Mask::from_array(decompose::compare(&self.lanes, &rhs.lanes, limb, lane))
    }

    #[inline(always)]
    pub(crate) fn select_lanes(self, mask: Mask<N>, on_true: Self, on_false: Self) -> Self {
        Self::from_array(decompose::select::<T, T::Reg<B>, N>(
            mask.as_array(),
            &on_true.lanes,
            &on_false.lanes,
        ))
    }

    #[inline(always)]
    pub(crate) fn fold_limbs<L: Limb<T>>(
        self,
        limb: impl Fn(L) -> T,
        lane: impl Fn(T, T) -> T,
        identity: T,
    ) -> T {
        decompose::fold(&self.lanes, limb, lane, identity)
    }
}
