/* ************************************************************************ **
** This file is part of rsp2, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of rsp2 is provided under this permissive license, **
** and that the project as a whole is licensed under the GPL 3.0.           **
** ************************************************************************ */

use std::cmp::Ordering;

/// A total order over `T`, carried around as a value.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a `Comparator`.  For the order given
/// by `T: Ord`, use [`Natural`].
///
/// Two elements are considered *equal* by everything in this crate iff the
/// comparator says `Ordering::Equal`; `PartialEq` is never consulted.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, a: &T, b: &T) -> Ordering;

    fn equal(&self, a: &T, b: &T) -> bool
    { self.compare(a, b) == Ordering::Equal }
}

/// The ordering defined by `Ord`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Comparator<T> for Natural {
    fn compare(&self, a: &T, b: &T) -> Ordering
    { a.cmp(b) }
}

/// Flips another comparator.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Comparator<T>> Comparator<T> for Reverse<C> {
    fn compare(&self, a: &T, b: &T) -> Ordering
    { self.0.compare(a, b).reverse() }
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering
    { self(a, b) }
}

/// Places `None` before every `Some`, and orders the `Some`s by another comparator.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct AbsentFirst<C>(pub C);

impl<T, C: Comparator<T>> Comparator<Option<T>> for AbsentFirst<C> {
    fn compare(&self, a: &Option<T>, b: &Option<T>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => self.0.compare(a, b),
        }
    }
}

/// Binary search over positions `0..len` of something sorted.
///
/// `cmp_at(k)` compares the element at `k` against the probe.
///
/// Both the sort assignment and the lookup list locate runs of equal values
/// through this one function.  The position it lands on depends only on `len`
/// and on the outcomes of `cmp_at`, so it finds the same position in any two
/// sequences that are sorted under the same order, no matter how equal
/// elements are arranged within them.
pub(crate) fn locate_by(len: usize, mut cmp_at: impl FnMut(usize) -> Ordering) -> Option<usize> {
    let (mut lo, mut hi) = (0, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp_at(mid) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
            Ordering::Equal => return Some(mid),
        }
    }
    None
}

pub(crate) fn locate<T, C>(sorted: &[T], probe: &T, order: &C) -> Option<usize>
where
    C: Comparator<T> + ?Sized,
{
    locate_by(sorted.len(), |k| order.compare(&sorted[k], probe))
}

pub(crate) fn is_sorted_by<T, C>(xs: &[T], order: &C) -> bool
where
    C: Comparator<T> + ?Sized,
{
    xs.windows(2).all(|w| order.compare(&w[0], &w[1]) != Ordering::Greater)
}
