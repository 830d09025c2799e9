//! Instruction-set backends.
//!
//! A backend names one native register type per element type. `build.rs` picks the
//! widest backend the compile target enables and sets exactly one of the cfgs
//! `avx512`, `avx2`, `sse`, `neon` or `fallback`; [`Native`] follows it. The
//! [`Emulation`] backend is compiled on every target and is the reference the
//! hardware backends are tested against.

use std::fmt::Debug;

use crate::simd::limb::{FloatLimb, IntLimb, SignedLimb};

pub mod emulation;

#[cfg(test)]
pub(crate) mod conformance;

#[cfg(any(sse, avx2, avx512))]
mod x86;

#[cfg(sse)]
pub mod sse;

#[cfg(any(avx2, avx512))]
pub mod avx2;

#[cfg(avx512)]
pub mod avx512;

#[cfg(neon)]
pub mod neon;

pub use emulation::Emulation;

/// The backend this build was configured for.
#[cfg(avx512)]
pub type Native = avx512::Avx512;

/// The backend this build was configured for.
#[cfg(avx2)]
pub type Native = avx2::Avx2;

/// The backend this build was configured for.
#[cfg(sse)]
pub type Native = sse::Sse41;

/// The backend this build was configured for.
#[cfg(neon)]
pub type Native = neon::Neon;

/// The backend this build was configured for.
#[cfg(fallback)]
pub type Native = Emulation;

/// A family of native registers, one per element type.
pub trait Backend: Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Short name, as accepted by `SIMDVEC_BACKEND`.
    const NAME: &'static str;

    /// Alignment in bytes that makes every limb access of a full register aligned.
    const VECTOR_ALIGN: usize;

    /// Zero-sized marker whose alignment is `VECTOR_ALIGN`; vectors embed a
    /// `[Align; 0]` so their lane storage is register aligned.
    type Align: Copy + Debug + Default + Send + Sync + 'static;

    type F32: FloatLimb<f32>;
    type F64: FloatLimb<f64>;
    type I8: IntLimb<i8> + SignedLimb<i8>;
    type I16: IntLimb<i16> + SignedLimb<i16>;
    type I32: IntLimb<i32> + SignedLimb<i32>;
    type I64: IntLimb<i64> + SignedLimb<i64>;
    type U8: IntLimb<u8>;
    type U16: IntLimb<u16>;
    type U32: IntLimb<u32>;
    type U64: IntLimb<u64>;
}

#[derive(Clone, Copy, Debug, Default)]
#[repr(align(16))]
pub struct Align16;

#[derive(Clone, Copy, Debug, Default)]
#[repr(align(32))]
pub struct Align32;

#[derive(Clone, Copy, Debug, Default)]
#[repr(align(64))]
pub struct Align64;
