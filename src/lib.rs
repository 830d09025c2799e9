#![cfg_attr(
    all(
        any(target_arch = "x86", target_arch = "x86_64"),
        rustc_channel = "nightly"
    ),
    feature(avx512_target_feature, stdarch_x86_avx512)
)]

//! # simdvec
//!
//! Portable explicit-SIMD vectors. A [`Vector<T, N>`](simd::Vector) holds `N` lanes of
//! a numeric element type and lowers every operation onto the native registers of the
//! instruction set the crate was built for (SSE4.1, AVX2, AVX-512 or NEON). Wider
//! vectors are split into several registers ("limbs"); lanes that do not fill a whole
//! register and targets without a SIMD backend run the scalar emulation, which is also
//! the reference semantics every backend agrees with.
//!
//! The backend is chosen at build time by `build.rs` from the enabled target features:
//!
//! ```text
//! RUSTFLAGS="-C target-cpu=native" cargo build --release
//! SIMDVEC_BACKEND=emulation cargo test
//! ```
//!
//! ```rust
//! use simdvec::prelude::*;
//!
//! let a = Vector::<i32, 16>::from_array(core::array::from_fn(|i| i as i32));
//! let b = Vector::<i32, 16>::splat(7);
//! let mask = a.cmp_lt(b);
//!
//! let c = a.add_masked(mask, 100);
//! assert_eq!(c.extract(0), 100);
//! assert_eq!(c.extract(7), 7);
//! assert_eq!(mask.count_true(), 7);
//! ```

#[macro_use]
mod diagnostics;

pub mod error;
pub mod simd;

pub use error::{Result, SimdError};
pub use simd::prelude;

/// Name of the backend `Native` resolves to in this build.
pub const BACKEND: &str = <simd::backend::Native as simd::backend::Backend>::NAME;

/// Slices up to this many elements are processed on the calling thread by the
/// `par_*` slice kernels.
pub const PARALLEL_SIMD_THRESHOLD: usize = 262_144;

/// Number of elements handed to each rayon task by the `par_*` slice kernels.
pub const PARALLEL_CHUNK_SIZE: usize = 16_384;
