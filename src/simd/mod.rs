//! Vector, mask and swizzle types and everything they are built from.

pub mod backend;
pub mod convert;
pub(crate) mod decompose;
pub mod element;
pub mod limb;
pub mod mask;
pub mod math;
pub mod slice;
pub mod swizzle;
pub mod traits;
pub mod utils;
pub mod vector;

pub use backend::{Backend, Emulation, Native};
pub use mask::Mask;
pub use swizzle::Swizzle;
pub use utils::AlignedBuffer;
pub use vector::Vector;

/// One import for the types and every capability trait.
///
/// ```rust
/// use simdvec::prelude::*;
///
/// let v = Vector::<f32, 8>::splat(2.0);
/// assert_eq!(v.sqrt().extract(3), 2f32.sqrt());
/// assert_eq!(v.hadd(), 16.0);
/// ```
pub mod prelude {
    pub use super::backend::{Backend, Emulation, Native};
    pub use super::convert::{DegradeElement, Packable, PromoteElement};
    pub use super::element::{
        FloatElement, IntElement, SignedElement, SignedIntElement, SimdElement, UnsignedElement,
    };
    pub use super::mask::Mask;
    pub use super::slice::{SimdSliceArith, SimdSliceMath};
    pub use super::swizzle::Swizzle;
    pub use super::traits::{
        FloatVector, IntegerVector, MaskVector, SignedIntegerVector, SignedVector, SimdVector,
        UnsignedVector,
    };
    pub use super::utils::AlignedBuffer;
    pub use super::vector::Vector;
}
