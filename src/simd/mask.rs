//! Per-lane boolean masks.
//!
//! A [`Mask<N>`] pairs with every `N`-lane vector regardless of element type. Lanes are
//! plain `bool`s, so a lane is always exactly set or clear; backends turn the mask into
//! their native selector (all-ones integer lanes, a blend register, or an AVX-512
//! k-register) inside the limb `select`.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Index, Not};

use crate::error::{ensure_len, Result};
use crate::simd::backend::Backend;
use crate::simd::element::IntElement;
use crate::simd::traits::MaskVector;
use crate::simd::vector::Vector;

/// `N` lane flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mask<const N: usize> {
    lanes: [bool; N],
}

impl<const N: usize> Default for Mask<N> {
    fn default() -> Self {
        Self::splat(false)
    }
}

impl<const N: usize> Mask<N> {
    #[inline(always)]
    pub const fn from_array(lanes: [bool; N]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub const fn to_array(self) -> [bool; N] {
        self.lanes
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[bool; N] {
        &self.lanes
    }

    /// Reads the first `N` flags of `flags`.
    pub fn from_slice(flags: &[bool]) -> Result<Self> {
        ensure_len("mask source slice", flags.len(), N)?;
        let mut lanes = [false; N];
        lanes.copy_from_slice(&flags[..N]);
        Ok(Self { lanes })
    }

    /// Loads `N` flags from `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `N` `bool`s.
    #[inline(always)]
    pub unsafe fn load(ptr: *const bool) -> Self {
        Self {
            lanes: std::ptr::read_unaligned(ptr as *const [bool; N]),
        }
    }

    /// Stores the `N` flags at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `N` `bool`s.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut bool) {
        std::ptr::write_unaligned(ptr as *mut [bool; N], self.lanes)
    }

    /// Writes the flags into the first `N` entries of `out`.
    pub fn write_to_slice(self, out: &mut [bool]) -> Result<()> {
        ensure_len("mask destination slice", out.len(), N)?;
        out[..N].copy_from_slice(&self.lanes);
        Ok(())
    }

    /// Lanes `0..count` set, the rest clear. Used to cover the tail of a slice.
    #[inline(always)]
    pub fn first_n(count: usize) -> Self {
        Self {
            lanes: core::array::from_fn(|i| i < count),
        }
    }

    /// Bit `i` set for lane `i`; bits past the N-th are ignored.
    ///
    /// # Panics
    ///
    /// Panics if `N > 64`.
    pub fn from_bitmask(bits: u64) -> Self {
        assert!(N <= 64, "a {N}-lane mask does not fit a 64-bit bitmask");
        Self {
            lanes: core::array::from_fn(|i| (bits >> i) & 1 == 1),
        }
    }

    /// Canonical integer form: all bits set for true lanes, zero for false ones.
    pub fn to_int_lanes<I: IntElement, B: Backend>(self) -> Vector<I, N, B> {
        let ones = I::lane_not(I::zero());
        Vector::from_array(self.lanes.map(|set| if set { ones } else { I::zero() }))
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.lanes.iter().copied()
    }
}

impl<const N: usize> MaskVector for Mask<N> {
    const LANES: usize = N;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self { lanes: [value; N] }
    }

    #[inline(always)]
    fn extract(&self, index: usize) -> bool {
        self.lanes[index]
    }

    #[inline(always)]
    fn insert(&mut self, index: usize, value: bool) {
        self.lanes[index] = value;
    }

    #[inline(always)]
    fn land(self, rhs: Self) -> Self {
        Self {
            lanes: core::array::from_fn(|i| self.lanes[i] & rhs.lanes[i]),
        }
    }

    #[inline(always)]
    fn lor(self, rhs: Self) -> Self {
        Self {
            lanes: core::array::from_fn(|i| self.lanes[i] | rhs.lanes[i]),
        }
    }

    #[inline(always)]
    fn lxor(self, rhs: Self) -> Self {
        Self {
            lanes: core::array::from_fn(|i| self.lanes[i] ^ rhs.lanes[i]),
        }
    }

    #[inline(always)]
    fn lnot(self) -> Self {
        Self {
            lanes: self.lanes.map(|set| !set),
        }
    }

    #[inline(always)]
    fn land_assign(&mut self, rhs: Self) {
        *self = self.land(rhs);
    }

    #[inline(always)]
    fn lor_assign(&mut self, rhs: Self) {
        *self = self.lor(rhs);
    }

    #[inline(always)]
    fn lxor_assign(&mut self, rhs: Self) {
        *self = self.lxor(rhs);
    }

    #[inline(always)]
    fn lnot_assign(&mut self) {
        *self = self.lnot();
    }

    #[inline(always)]
    fn hland(&self) -> bool {
        self.lanes.iter().all(|&set| set)
    }

    #[inline(always)]
    fn hlor(&self) -> bool {
        self.lanes.iter().any(|&set| set)
    }

    #[inline(always)]
    fn hlxor(&self) -> bool {
        self.count_true() % 2 == 1
    }

    #[inline(always)]
    fn count_true(&self) -> usize {
        self.lanes.iter().filter(|&&set| set).count()
    }

    fn to_bitmask(&self) -> u64 {
        assert!(N <= 64, "a {N}-lane mask does not fit a 64-bit bitmask");
        self.lanes
            .iter()
            .enumerate()
            .fold(0, |bits, (i, &set)| bits | ((set as u64) << i))
    }
}

impl<const N: usize> From<[bool; N]> for Mask<N> {
    fn from(lanes: [bool; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<const N: usize> From<bool> for Mask<N> {
    fn from(value: bool) -> Self {
        Self::splat(value)
    }
}

impl<const N: usize> Index<usize> for Mask<N> {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        &self.lanes[index]
    }
}

impl<const N: usize> BitAnd for Mask<N> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.land(rhs)
    }
}

impl<const N: usize> BitOr for Mask<N> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.lor(rhs)
    }
}

impl<const N: usize> BitXor for Mask<N> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.lxor(rhs)
    }
}

impl<const N: usize> Not for Mask<N> {
    type Output = Self;

    fn not(self) -> Self {
        self.lnot()
    }
}

impl<const N: usize> BitAndAssign for Mask<N> {
    fn bitand_assign(&mut self, rhs: Self) {
        self.land_assign(rhs);
    }
}

impl<const N: usize> BitOrAssign for Mask<N> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.lor_assign(rhs);
    }
}

impl<const N: usize> BitXorAssign for Mask<N> {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.lxor_assign(rhs);
    }
}
