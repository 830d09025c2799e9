//! Aligned heap storage for vector loads and stores.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

use crate::error::{allocation_error, layout_error, Result};
use crate::simd::backend::Backend;
use crate::simd::element::SimdElement;
use crate::simd::vector::Vector;

/// A zero-initialised, fixed-length slice of `T` whose first element sits on a
/// caller-chosen power-of-two boundary.
///
/// A plain `Vec<T>` cannot carry a stricter alignment than `T`'s own, because it frees
/// with `T`'s layout; this buffer keeps its layout and frees with it.
pub struct AlignedBuffer<T: SimdElement> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
    _owns: PhantomData<T>,
}

// SAFETY: the buffer uniquely owns its elements, which are plain numeric values.
unsafe impl<T: SimdElement> Send for AlignedBuffer<T> {}
// SAFETY: shared access only hands out `&[T]`.
unsafe impl<T: SimdElement> Sync for AlignedBuffer<T> {}

impl<T: SimdElement> AlignedBuffer<T> {
    /// Allocates `len` zeroed elements aligned to `alignment` bytes.
    ///
    /// `alignment` must be a power of two; it is raised to `align_of::<T>()` if lower.
    /// Fails with [`LayoutError`](crate::SimdError::LayoutError) for a bad alignment or
    /// an overflowing size, and with
    /// [`AllocationError`](crate::SimdError::AllocationError) if the allocator refuses.
    pub fn new(len: usize, alignment: usize) -> Result<Self> {
        if !alignment.is_power_of_two() {
            return Err(layout_error(
                len,
                alignment,
                "alignment must be a power of two",
            ));
        }
        let alignment = alignment.max(std::mem::align_of::<T>());
        let size = len.checked_mul(std::mem::size_of::<T>()).ok_or_else(|| {
            layout_error(len, alignment, "total size overflows usize")
        })?;
        let layout = Layout::from_size_align(size, alignment)
            .map_err(|e| layout_error(size, alignment, e.to_string()))?;

        if size == 0 {
            // Zero-sized allocations are not allowed; a dangling pointer with the
            // requested alignment stands in for the empty buffer.
            let dangling = NonNull::new(alignment as *mut T)
                .ok_or_else(|| layout_error(size, alignment, "zero alignment"))?;
            return Ok(Self {
                ptr: dangling,
                len,
                layout,
                _owns: PhantomData,
            });
        }

        // SAFETY: `layout` has a non-zero size. All-zero bits are a valid value of
        // every element type.
        let raw = unsafe { alloc_zeroed(layout) } as *mut T;
        let ptr = NonNull::new(raw)
            .ok_or_else(|| allocation_error(size, alignment, "allocator returned null"))?;

        log::trace!(target: "simdvec::utils", "allocated {size} bytes aligned to {alignment}");
        Ok(Self {
            ptr,
            len,
            layout,
            _owns: PhantomData,
        })
    }

    /// A buffer whose start satisfies the `*_aligned` loads and stores of
    /// `Vector<T, N, B>`.
    pub fn for_vector<const N: usize, B: Backend>(len: usize) -> Result<Self> {
        Self::new(len, Vector::<T, N, B>::alignment())
    }

    /// Copies `src` into a new buffer aligned to `alignment`.
    pub fn from_slice(src: &[T], alignment: usize) -> Result<Self> {
        let mut buf = Self::new(src.len(), alignment)?;
        buf.copy_from_slice(src);
        Ok(buf)
    }

    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T: SimdElement> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: `ptr` is valid for `len` initialised elements (or dangling and
        // aligned with `len * size_of::<T>() == 0`).
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: SimdElement> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as in `deref`, and `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: SimdElement> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            // SAFETY: `ptr` came from `alloc_zeroed` with this exact layout.
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, self.layout) }
        }
    }
}

impl<T: SimdElement> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("alignment", &self.alignment())
            .field("data", &&**self)
            .finish()
    }
}

impl<T: SimdElement> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        match Self::from_slice(self, self.alignment()) {
            Ok(buf) => buf,
            Err(_) => std::alloc::handle_alloc_error(self.layout),
        }
    }
}
