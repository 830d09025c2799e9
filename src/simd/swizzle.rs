//! Lane permutations.
//!
//! A [`Swizzle<N>`] is a list of source lane indices: applying it to a vector yields
//! `out[i] = v[indices[i]]`. It is deliberately not a vector, so it cannot take part
//! in arithmetic.

use std::ops::Index;

use crate::error::{validation_error, Result};

/// `N` source-lane indices, each in `0..N`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Swizzle<const N: usize> {
    indices: [u32; N],
}

impl<const N: usize> Swizzle<N> {
    /// Builds a permutation from explicit indices.
    ///
    /// Indices are debug-checked here; applying a swizzle with an index `>= N` panics.
    #[inline(always)]
    pub fn new(indices: [u32; N]) -> Self {
        debug_assert!(
            indices.iter().all(|&i| (i as usize) < N),
            "swizzle index out of range for {N} lanes"
        );
        Self { indices }
    }

    /// Checked constructor.
    pub fn try_new(indices: [u32; N]) -> Result<Self> {
        match indices.iter().position(|&i| i as usize >= N) {
            Some(pos) => Err(validation_error(format!(
                "swizzle lane {pos} selects lane {} of a {N}-lane vector",
                indices[pos]
            ))),
            None => Ok(Self { indices }),
        }
    }

    pub fn identity() -> Self {
        Self {
            indices: core::array::from_fn(|i| i as u32),
        }
    }

    pub fn reverse() -> Self {
        Self {
            indices: core::array::from_fn(|i| (N - 1 - i) as u32),
        }
    }

    /// `out[i] = v[(i + by) % N]`: lanes move `by` positions toward lane 0.
    pub fn rotate(by: usize) -> Self {
        Self {
            indices: core::array::from_fn(|i| ((i + by) % N) as u32),
        }
    }

    /// Source lane selected for output lane `lane`.
    #[inline(always)]
    pub fn extract(&self, lane: usize) -> u32 {
        self.indices[lane]
    }

    #[inline(always)]
    pub fn insert(&mut self, lane: usize, source: u32) {
        debug_assert!((source as usize) < N, "swizzle index out of range for {N} lanes");
        self.indices[lane] = source;
    }

    #[inline(always)]
    pub const fn as_array(&self) -> &[u32; N] {
        &self.indices
    }

    /// Applies the permutation to any lane array.
    #[inline(always)]
    pub fn apply<T: Copy>(&self, lanes: &[T; N]) -> [T; N] {
        self.indices.map(|i| lanes[i as usize])
    }

    /// The permutation that applies `first` and then `self`.
    pub fn after(&self, first: &Self) -> Self {
        Self {
            indices: self.indices.map(|i| first.indices[i as usize]),
        }
    }
}

impl<const N: usize> Default for Swizzle<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> Index<usize> for Swizzle<N> {
    type Output = u32;

    fn index(&self, lane: usize) -> &u32 {
        &self.indices[lane]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_permutations() {
        let lanes = [10, 11, 12, 13];
        assert_eq!(Swizzle::<4>::identity().apply(&lanes), lanes);
        assert_eq!(Swizzle::<4>::reverse().apply(&lanes), [13, 12, 11, 10]);
        assert_eq!(Swizzle::<4>::rotate(1).apply(&lanes), [11, 12, 13, 10]);
        assert_eq!(Swizzle::<4>::rotate(5), Swizzle::rotate(1));
    }

    #[test]
    fn broadcast_and_duplicates_are_allowed() {
        let s = Swizzle::new([2, 2, 0, 0]);
        assert_eq!(s.apply(&['a', 'b', 'c', 'd']), ['c', 'c', 'a', 'a']);
    }

    #[test]
    fn checked_construction() {
        assert!(Swizzle::<4>::try_new([0, 1, 2, 3]).is_ok());
        let err = Swizzle::<4>::try_new([0, 4, 2, 3]).unwrap_err();
        assert!(err.to_string().contains("lane 1 selects lane 4"));
    }

    #[test]
    fn lane_access_and_composition() {
        let mut s = Swizzle::<4>::identity();
        s.insert(0, 3);
        assert_eq!(s.extract(0), 3);
        assert_eq!(s[0], 3);

        let r = Swizzle::<4>::reverse();
        let lanes = [1, 2, 3, 4];
        assert_eq!(r.after(&r).apply(&lanes), lanes);
        assert_eq!(
            Swizzle::<4>::rotate(1).after(&r).apply(&lanes),
            Swizzle::<4>::rotate(1).apply(&r.apply(&lanes))
        );
    }
}
