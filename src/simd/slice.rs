//! Lane-wise kernels over whole slices.
//!
//! Every kernel walks its input in blocks of [`BLOCK_LANES`] elements as
//! `Vector<T, 64>` on the native backend, and handles the last partial block with
//! masked loads and stores, so any length works and no element is read or written
//! twice. The `par_` forms split the output into rayon tasks of
//! [`PARALLEL_CHUNK_SIZE`] elements once the input is longer than
//! [`PARALLEL_SIMD_THRESHOLD`]; below that they run on the calling thread.
//!
//! ```rust
//! use simdvec::prelude::*;
//!
//! let x: Vec<f32> = (0..100).map(|i| i as f32 * 0.01).collect();
//! let y = x.simd_exp();
//! assert!((y[50] - 0.5f32.exp()).abs() < 1e-6);
//!
//! let sum = x.simd_add(&y).unwrap();
//! assert_eq!(sum.len(), 100);
//! assert!(x.simd_add(&y[..3]).is_err());
//! ```

use rayon::prelude::*;

use crate::error::{validation_error, Result};
use crate::simd::element::{FloatElement, SimdElement};
use crate::simd::limb::MAX_LANES;
use crate::simd::traits::{FloatVector, SignedVector, SimdVector};
use crate::simd::vector::Vector;
use crate::{PARALLEL_CHUNK_SIZE, PARALLEL_SIMD_THRESHOLD};

/// Lanes per block; a multiple of every native register width for every element type,
/// so full blocks never touch the scalar tail.
pub const BLOCK_LANES: usize = MAX_LANES;

type Block<T> = Vector<T, BLOCK_LANES>;

/// Chunk length for parallel work, rounded down to whole blocks.
#[inline(always)]
fn parallel_chunk() -> usize {
    ((PARALLEL_CHUNK_SIZE / BLOCK_LANES) * BLOCK_LANES).max(BLOCK_LANES)
}

fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(validation_error(format!(
            "{what} has {actual} elements, expected {expected}"
        )));
    }
    Ok(())
}

fn map_blocks<T: SimdElement>(src: &[T], dst: &mut [T], f: &impl Fn(Block<T>) -> Block<T>) {
    debug_assert_eq!(src.len(), dst.len());
    let mut src = src.chunks_exact(BLOCK_LANES);
    let mut dst = dst.chunks_exact_mut(BLOCK_LANES);
    for (s, d) in (&mut src).zip(&mut dst) {
        // SAFETY: both chunks hold exactly BLOCK_LANES elements.
        unsafe { f(Block::load_unaligned(s.as_ptr())).store_unaligned_at(d.as_mut_ptr()) }
    }
    let rest = src.remainder();
    if !rest.is_empty() {
        f(Block::load_partial(rest)).store_partial(dst.into_remainder());
    }
}

fn zip_blocks<T: SimdElement>(
    a: &[T],
    b: &[T],
    dst: &mut [T],
    f: &impl Fn(Block<T>, Block<T>) -> Block<T>,
) {
    debug_assert!(a.len() == dst.len() && b.len() == dst.len());
    let mut a = a.chunks_exact(BLOCK_LANES);
    let mut b = b.chunks_exact(BLOCK_LANES);
    let mut dst = dst.chunks_exact_mut(BLOCK_LANES);
    for ((x, y), d) in (&mut a).zip(&mut b).zip(&mut dst) {
        // SAFETY: all chunks hold exactly BLOCK_LANES elements.
        unsafe {
            let r = f(Block::load_unaligned(x.as_ptr()), Block::load_unaligned(y.as_ptr()));
            r.store_unaligned_at(d.as_mut_ptr());
        }
    }
    let rest = a.remainder();
    if !rest.is_empty() {
        let r = f(Block::load_partial(rest), Block::load_partial(b.remainder()));
        r.store_partial(dst.into_remainder());
    }
}

fn zip3_blocks<T: SimdElement>(
    a: &[T],
    b: &[T],
    c: &[T],
    dst: &mut [T],
    f: &impl Fn(Block<T>, Block<T>, Block<T>) -> Block<T>,
) {
    let mut a = a.chunks_exact(BLOCK_LANES);
    let mut b = b.chunks_exact(BLOCK_LANES);
    let mut c = c.chunks_exact(BLOCK_LANES);
    let mut dst = dst.chunks_exact_mut(BLOCK_LANES);
    for (((x, y), z), d) in (&mut a).zip(&mut b).zip(&mut c).zip(&mut dst) {
        // SAFETY: all chunks hold exactly BLOCK_LANES elements.
        unsafe {
            let r = f(
                Block::load_unaligned(x.as_ptr()),
                Block::load_unaligned(y.as_ptr()),
                Block::load_unaligned(z.as_ptr()),
            );
            r.store_unaligned_at(d.as_mut_ptr());
        }
    }
    let rest = a.remainder();
    if !rest.is_empty() {
        let r = f(
            Block::load_partial(rest),
            Block::load_partial(b.remainder()),
            Block::load_partial(c.remainder()),
        );
        r.store_partial(dst.into_remainder());
    }
}

fn map<T: SimdElement>(src: &[T], f: impl Fn(Block<T>) -> Block<T>) -> Vec<T> {
    let mut out = vec![T::zero(); src.len()];
    map_blocks(src, &mut out, &f);
    out
}

fn par_map<T: SimdElement>(src: &[T], f: impl Fn(Block<T>) -> Block<T> + Sync) -> Vec<T> {
    if src.len() <= PARALLEL_SIMD_THRESHOLD {
        return map(src, f);
    }
    let chunk = parallel_chunk();
    log::debug!(target: "simdvec::slice", "{} elements in chunks of {chunk}", src.len());
    let mut out = vec![T::zero(); src.len()];
    out.par_chunks_mut(chunk)
        .zip(src.par_chunks(chunk))
        .for_each(|(d, s)| map_blocks(s, d, &f));
    out
}

fn zip<T: SimdElement>(a: &[T], b: &[T], f: impl Fn(Block<T>, Block<T>) -> Block<T>) -> Result<Vec<T>> {
    check_len("right-hand slice", a.len(), b.len())?;
    let mut out = vec![T::zero(); a.len()];
    zip_blocks(a, b, &mut out, &f);
    Ok(out)
}

fn par_zip<T: SimdElement>(
    a: &[T],
    b: &[T],
    f: impl Fn(Block<T>, Block<T>) -> Block<T> + Sync,
) -> Result<Vec<T>> {
    if a.len() <= PARALLEL_SIMD_THRESHOLD {
        return zip(a, b, f);
    }
    check_len("right-hand slice", a.len(), b.len())?;
    let chunk = parallel_chunk();
    let mut out = vec![T::zero(); a.len()];
    out.par_chunks_mut(chunk)
        .zip(a.par_chunks(chunk).zip(b.par_chunks(chunk)))
        .for_each(|(d, (x, y))| zip_blocks(x, y, d, &f));
    Ok(out)
}

/// Element-wise transcendental and rounding kernels for float slices.
pub trait SimdSliceMath<T> {
    fn simd_exp(&self) -> Vec<T>;
    fn simd_ln(&self) -> Vec<T>;
    fn simd_sin(&self) -> Vec<T>;
    fn simd_cos(&self) -> Vec<T>;
    fn simd_sqrt(&self) -> Vec<T>;
    fn simd_abs(&self) -> Vec<T>;

    fn par_simd_exp(&self) -> Vec<T>;
    fn par_simd_ln(&self) -> Vec<T>;
    fn par_simd_sin(&self) -> Vec<T>;
    fn par_simd_cos(&self) -> Vec<T>;
    fn par_simd_sqrt(&self) -> Vec<T>;
    fn par_simd_abs(&self) -> Vec<T>;
}

macro_rules! math_kernels {
    ($($simd:ident, $par:ident => $op:ident;)*) => {
        impl<T: FloatElement> SimdSliceMath<T> for [T] {
            $(
                #[inline]
                fn $simd(&self) -> Vec<T> {
                    map(self, |v| v.$op())
                }

                #[inline]
                fn $par(&self) -> Vec<T> {
                    par_map(self, |v| v.$op())
                }
            )*
        }
    };
}

math_kernels! {
    simd_exp, par_simd_exp => exp;
    simd_ln, par_simd_ln => ln;
    simd_sin, par_simd_sin => sin;
    simd_cos, par_simd_cos => cos;
    simd_sqrt, par_simd_sqrt => sqrt;
    simd_abs, par_simd_abs => abs;
}

/// Element-wise arithmetic between slices of equal length.
///
/// Every method fails with a [`ValidationError`](crate::SimdError::ValidationError)
/// when the operands differ in length.
pub trait SimdSliceArith<T> {
    fn simd_add(&self, rhs: &[T]) -> Result<Vec<T>>;
    fn simd_sub(&self, rhs: &[T]) -> Result<Vec<T>>;
    fn simd_mul(&self, rhs: &[T]) -> Result<Vec<T>>;
    /// `self[i] * b[i] + c[i]`, fused where the hardware has it.
    fn simd_fmuladd(&self, b: &[T], c: &[T]) -> Result<Vec<T>>;

    fn par_simd_add(&self, rhs: &[T]) -> Result<Vec<T>>;
    fn par_simd_sub(&self, rhs: &[T]) -> Result<Vec<T>>;
    fn par_simd_mul(&self, rhs: &[T]) -> Result<Vec<T>>;
    fn par_simd_fmuladd(&self, b: &[T], c: &[T]) -> Result<Vec<T>>;
}

impl<T: SimdElement> SimdSliceArith<T> for [T] {
    fn simd_add(&self, rhs: &[T]) -> Result<Vec<T>> {
        zip(self, rhs, |a, b| a + b)
    }

    fn simd_sub(&self, rhs: &[T]) -> Result<Vec<T>> {
        zip(self, rhs, |a, b| a - b)
    }

    fn simd_mul(&self, rhs: &[T]) -> Result<Vec<T>> {
        zip(self, rhs, |a, b| a * b)
    }

    fn simd_fmuladd(&self, b: &[T], c: &[T]) -> Result<Vec<T>> {
        check_len("multiplier slice", self.len(), b.len())?;
        check_len("addend slice", self.len(), c.len())?;
        let mut out = vec![T::zero(); self.len()];
        zip3_blocks(self, b, c, &mut out, &|x: Block<T>, y, z| x.fmuladd(y, z));
        Ok(out)
    }

    fn par_simd_add(&self, rhs: &[T]) -> Result<Vec<T>> {
        par_zip(self, rhs, |a, b| a + b)
    }

    fn par_simd_sub(&self, rhs: &[T]) -> Result<Vec<T>> {
        par_zip(self, rhs, |a, b| a - b)
    }

    fn par_simd_mul(&self, rhs: &[T]) -> Result<Vec<T>> {
        par_zip(self, rhs, |a, b| a * b)
    }

    fn par_simd_fmuladd(&self, b: &[T], c: &[T]) -> Result<Vec<T>> {
        if self.len() <= PARALLEL_SIMD_THRESHOLD {
            return self.simd_fmuladd(b, c);
        }
        check_len("multiplier slice", self.len(), b.len())?;
        check_len("addend slice", self.len(), c.len())?;
        let chunk = parallel_chunk();
        let mut out = vec![T::zero(); self.len()];
        out.par_chunks_mut(chunk)
            .zip(self.par_chunks(chunk))
            .zip(b.par_chunks(chunk).zip(c.par_chunks(chunk)))
            .for_each(|((d, x), (y, z))| {
                zip3_blocks(x, y, z, d, &|x: Block<T>, y, z| x.fmuladd(y, z))
            });
        Ok(out)
    }
}
