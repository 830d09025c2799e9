//! Width decomposition.
//!
//! A logical vector of `N` lanes is stored as a plain `[T; N]` and viewed as
//! `N / L` consecutive limbs of the backend register `L` (lane `i` lives in limb
//! `i / L::LANES` at offset `i % L::LANES`). Each function here runs the native limb
//! operation once per whole limb and the scalar lane function over whatever is left,
//! which is the whole vector on the emulation backend and the last `N % L::LANES`
//! lanes otherwise.
//!
//! Reductions fold inside each limb first and then across the limb partials and the
//! tail lanes, in ascending lane order.

use crate::simd::element::SimdElement;
use crate::simd::limb::Limb;

#[inline(always)]
fn tail_note<T: SimdElement, L: Limb<T>>(lanes: usize) {
    if L::NATIVE {
        perf_warning!(
            "{} x {lanes} does not fill whole {}-lane registers; {} trailing lanes run as scalars",
            T::NAME,
            L::LANES,
            lanes % L::LANES
        );
    }
}

/// Applies a unary operation to every lane.
#[inline(always)]
pub(crate) fn map<T: SimdElement, L: Limb<T>, const N: usize>(
    a: &[T; N],
    limb: impl Fn(L) -> L,
    lane: impl Fn(T) -> T,
) -> [T; N] {
    let mut out = [T::zero(); N];
    let mut src = a.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for (s, d) in (&mut src).zip(&mut dst) {
        // SAFETY: both chunks hold exactly L::LANES elements.
        unsafe { limb(L::load(s.as_ptr())).store(d.as_mut_ptr()) };
    }

    let rest = src.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        for (d, &s) in dst.into_remainder().iter_mut().zip(rest) {
            *d = lane(s);
        }
    }
    out
}

/// Converts every lane into another element type. `L` and `M` must have the same lane
/// count, which holds for a float register and its integer bit view.
#[inline(always)]
pub(crate) fn convert<T, U, L, M, const N: usize>(
    a: &[T; N],
    limb: impl Fn(L) -> M,
    lane: impl Fn(T) -> U,
) -> [U; N]
where
    T: SimdElement,
    U: SimdElement,
    L: Limb<T>,
    M: Limb<U>,
{
    debug_assert_eq!(L::LANES, M::LANES);
    let mut out = [U::zero(); N];
    let mut src = a.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for (s, d) in (&mut src).zip(&mut dst) {
        // SAFETY: both chunks hold exactly L::LANES == M::LANES elements.
        unsafe { limb(L::load(s.as_ptr())).store(d.as_mut_ptr()) };
    }

    let rest = src.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        for (d, &s) in dst.into_remainder().iter_mut().zip(rest) {
            *d = lane(s);
        }
    }
    out
}

/// Applies a binary operation lane by lane.
#[inline(always)]
pub(crate) fn zip<T: SimdElement, L: Limb<T>, const N: usize>(
    a: &[T; N],
    b: &[T; N],
    limb: impl Fn(L, L) -> L,
    lane: impl Fn(T, T) -> T,
) -> [T; N] {
    let mut out = [T::zero(); N];
    let mut lhs = a.chunks_exact(L::LANES);
    let mut rhs = b.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for ((x, y), d) in (&mut lhs).zip(&mut rhs).zip(&mut dst) {
        // SAFETY: all chunks hold exactly L::LANES elements.
        unsafe { limb(L::load(x.as_ptr()), L::load(y.as_ptr())).store(d.as_mut_ptr()) };
    }

    let rest = lhs.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        let lanes = rest.iter().zip(rhs.remainder());
        for (d, (&x, &y)) in dst.into_remainder().iter_mut().zip(lanes) {
            *d = lane(x, y);
        }
    }
    out
}

/// Applies a ternary operation lane by lane.
#[inline(always)]
pub(crate) fn zip3<T: SimdElement, L: Limb<T>, const N: usize>(
    a: &[T; N],
    b: &[T; N],
    c: &[T; N],
    limb: impl Fn(L, L, L) -> L,
    lane: impl Fn(T, T, T) -> T,
) -> [T; N] {
    let mut out = [T::zero(); N];
    let mut first = a.chunks_exact(L::LANES);
    let mut second = b.chunks_exact(L::LANES);
    let mut third = c.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for (((x, y), z), d) in (&mut first)
        .zip(&mut second)
        .zip(&mut third)
        .zip(&mut dst)
    {
        // SAFETY: all chunks hold exactly L::LANES elements.
        unsafe {
            let r = limb(
                L::load(x.as_ptr()),
                L::load(y.as_ptr()),
                L::load(z.as_ptr()),
            );
            r.store(d.as_mut_ptr());
        }
    }

    let rest = first.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        let lanes = rest
            .iter()
            .zip(second.remainder())
            .zip(third.remainder());
        for (d, ((&x, &y), &z)) in dst.into_remainder().iter_mut().zip(lanes) {
            *d = lane(x, y, z);
        }
    }
    out
}

/// Compares lane by lane.
#[inline(always)]
pub(crate) fn compare<T: SimdElement, L: Limb<T>, const N: usize>(
    a: &[T; N],
    b: &[T; N],
    limb: impl Fn(L, L, &mut [bool]),
    lane: impl Fn(T, T) -> bool,
) -> [bool; N] {
    let mut out = [false; N];
    let mut lhs = a.chunks_exact(L::LANES);
    let mut rhs = b.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for ((x, y), d) in (&mut lhs).zip(&mut rhs).zip(&mut dst) {
        // SAFETY: both chunks hold exactly L::LANES elements.
        let (x, y) = unsafe { (L::load(x.as_ptr()), L::load(y.as_ptr())) };
        limb(x, y, d);
    }

    let rest = lhs.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        let lanes = rest.iter().zip(rhs.remainder());
        for (d, (&x, &y)) in dst.into_remainder().iter_mut().zip(lanes) {
            *d = lane(x, y);
        }
    }
    out
}

/// Lane `i` of the result is `on_true[i]` where `mask[i]`, else `on_false[i]`.
#[inline(always)]
pub(crate) fn select<T: SimdElement, L: Limb<T>, const N: usize>(
    mask: &[bool; N],
    on_true: &[T; N],
    on_false: &[T; N],
) -> [T; N] {
    let mut out = [T::zero(); N];
    let mut sel = mask.chunks_exact(L::LANES);
    let mut yes = on_true.chunks_exact(L::LANES);
    let mut no = on_false.chunks_exact(L::LANES);
    let mut dst = out.chunks_exact_mut(L::LANES);

    for (((m, x), y), d) in (&mut sel).zip(&mut yes).zip(&mut no).zip(&mut dst) {
        // SAFETY: all chunks hold exactly L::LANES elements.
        unsafe { L::select(m, L::load(x.as_ptr()), L::load(y.as_ptr())).store(d.as_mut_ptr()) };
    }

    let rest = sel.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        let lanes = rest.iter().zip(yes.remainder()).zip(no.remainder());
        for (d, ((&m, &x), &y)) in dst.into_remainder().iter_mut().zip(lanes) {
            *d = if m { x } else { y };
        }
    }
    out
}

/// Folds all lanes with `lane`, reducing each whole limb with `limb` first.
///
/// Returns `identity` only for a zero-lane vector.
#[inline(always)]
pub(crate) fn fold<T: SimdElement, L: Limb<T>, const N: usize>(
    a: &[T; N],
    limb: impl Fn(L) -> T,
    lane: impl Fn(T, T) -> T,
    identity: T,
) -> T {
    let mut chunks = a.chunks_exact(L::LANES);
    let mut acc: Option<T> = None;

    for chunk in &mut chunks {
        // SAFETY: the chunk holds exactly L::LANES elements.
        let partial = limb(unsafe { L::load(chunk.as_ptr()) });
        acc = Some(match acc {
            Some(acc) => lane(acc, partial),
            None => partial,
        });
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        tail_note::<T, L>(N);
        for &x in rest {
            acc = Some(match acc {
                Some(acc) => lane(acc, x),
                None => x,
            });
        }
    }
    acc.unwrap_or(identity)
}
