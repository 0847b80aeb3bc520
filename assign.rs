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

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::order::{locate_by, AbsentFirst, Comparator, Natural};
use crate::ranking::Ranking;

/// Computes the [`Ranking`] that sorts a sequence, even when it has duplicates.
///
/// Sorting alone doesn't say *which* of several equal elements lands in *which*
/// sorted slot, and a ranking must send each of them somewhere different.  The
/// rule used here is:
///
/// * Binary search the sorted values for the element.  Every element of a run of
///   equal values lands on the same position, the **anchor** of the run.
/// * The occurrences of the value then claim slots in the order they appear in
///   the input: first the anchor, then each slot to its right until the run ends,
///   then each slot to its left of the anchor until the run's start.
///
/// Lookups in a [`LookupList`] rely on this rule: the first occurrence of a value
/// always sits at the anchor, and the last occurrence always sits at the final
/// slot in the claim order.
///
/// [`LookupList`]: crate::LookupList
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SortAssigner {
    reject_duplicates: bool,
    reject_absent: bool,
}

impl Default for SortAssigner {
    fn default() -> Self
    { SortAssigner::new() }
}

impl SortAssigner {
    /// Allows duplicates, rejects absent elements.
    pub fn new() -> Self
    { SortAssigner { reject_duplicates: false, reject_absent: true } }

    /// Fail with [`Error::DuplicateRejected`] on the second occurrence of any value.
    pub fn reject_duplicates(mut self, yes: bool) -> Self
    { self.reject_duplicates = yes; self }

    /// Fail with [`Error::NullElement`] when [`SortAssigner::assign_options`]
    /// meets a `None`.  When this is off, `None` sorts before everything else.
    pub fn reject_absent(mut self, yes: bool) -> Self
    { self.reject_absent = yes; self }

    pub fn rejects_duplicates(&self) -> bool
    { self.reject_duplicates }

    pub fn rejects_absent(&self) -> bool
    { self.reject_absent }

    /// Sort by `Ord`.
    pub fn assign<T: Ord>(&self, xs: &[T]) -> Result<Ranking>
    { self.assign_by(xs, &Natural) }

    /// Sort by `order`.
    pub fn assign_by<T, C>(&self, xs: &[T], order: &C) -> Result<Ranking>
    where
        C: Comparator<T> + ?Sized,
    {
        // Indices of `xs` in stable sorted order; `xs[by_value[k]]` is the kth smallest.
        let mut by_value: Vec<usize> = (0..xs.len()).collect();
        by_value.sort_by(|&a, &b| order.compare(&xs[a], &xs[b]));
        let sorted_at = |k: usize| &xs[by_value[k]];

        // Claim bookkeeping, indexed by anchor.
        let mut runs: Vec<Option<Claims>> = vec![None; xs.len()];

        let mut fwd = Vec::with_capacity(xs.len());
        for (index, x) in xs.iter().enumerate() {
            let anchor = locate_by(xs.len(), |k| order.compare(sorted_at(k), x))
                .ok_or_else(|| exhausted(index))?;

            let claims = runs[anchor].get_or_insert_with(|| Claims {
                run: Run::around(anchor, xs.len(), |k| order.equal(sorted_at(k), x)),
                claimed: 0,
            });

            if self.reject_duplicates && claims.claimed > 0 {
                debug!(index, "rejected duplicate element");
                return Err(Error::DuplicateRejected { index });
            }
            let slot = claims.run.nth_slot(claims.claimed).ok_or_else(|| exhausted(index))?;
            claims.claimed += 1;
            fwd.push(slot);
        }
        Ok(Ranking::from_vec_unchecked(fwd))
    }

    /// Sort a sequence with possibly absent elements.
    ///
    /// Fails on the first `None` if absent elements are rejected (the default).
    /// Otherwise they all sort before the present ones.
    pub fn assign_options<T, C>(&self, xs: &[Option<T>], order: C) -> Result<Ranking>
    where
        C: Comparator<T>,
    {
        self.check_present(xs)?;
        self.assign_by(xs, &AbsentFirst(order))
    }

    pub(crate) fn check_present<T>(&self, xs: &[Option<T>]) -> Result<()>
    {
        if self.reject_absent {
            if let Some(index) = xs.iter().position(Option::is_none) {
                debug!(index, "rejected absent element");
                return Err(Error::NullElement { index });
            }
        }
        Ok(())
    }
}

fn exhausted(index: usize) -> Error {
    error!(index, "sort assignment ran out of slots");
    Error::SlotExhausted { index }
}

#[derive(Debug, Copy, Clone)]
struct Claims {
    run: Run,
    claimed: usize,
}

/// A maximal run of equal values in a sorted sequence, seen from its anchor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Run {
    anchor: usize,
    start: usize,
    end: usize,
}

impl Run {
    /// Find the run containing `anchor`, where `is_equal(k)` tells whether
    /// the value at `k` equals the one at the anchor.
    pub(crate) fn around(anchor: usize, len: usize, is_equal: impl Fn(usize) -> bool) -> Run
    {
        let mut end = anchor + 1;
        while end < len && is_equal(end) {
            end += 1;
        }
        let mut start = anchor;
        while start > 0 && is_equal(start - 1) {
            start -= 1;
        }
        Run { anchor, start, end }
    }

    pub(crate) fn len(&self) -> usize
    { self.end - self.start }

    /// The slot claimed by the `k`th occurrence of the value (counting from zero).
    pub(crate) fn nth_slot(&self, k: usize) -> Option<usize>
    {
        let rightward = self.end - self.anchor;
        if k < rightward {
            Some(self.anchor + k)
        } else if k < self.len() {
            Some(self.anchor - 1 - (k - rightward))
        } else {
            None
        }
    }

    /// The slot claimed by the final occurrence.
    pub(crate) fn last_slot(&self) -> usize
    {
        if self.anchor > self.start { self.start } else { self.end - 1 }
    }

    /// All slots, in claim order.
    pub(crate) fn slots(&self) -> impl Iterator<Item = usize>
    { (self.anchor..self.end).chain((self.start..self.anchor).rev()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::Reverse;
    use proptest::{collection::vec, proptest};

    fn sorts<T: Ord + Clone + std::fmt::Debug>(xs: &[T]) {
        let ranking = SortAssigner::new().assign(xs).unwrap();
        let mut expected = xs.to_vec();
        expected.sort();
        assert_eq!(ranking.apply(xs).unwrap(), expected);
    }

    #[test]
    fn edge_cases() {
        sorts::<i32>(&[]);
        sorts(&[42]);
        sorts(&[7; 9]);
        sorts(&[3, 2, 1]);
        sorts(&[4, 6, 10, -5, 195, 33, 2]);
    }

    #[test]
    fn claims_anchor_then_right_then_left() {
        // five equal values; the binary search hits slot 2 first
        let xs = [5; 5];
        let anchor = locate_by(5, |_| std::cmp::Ordering::Equal).unwrap();
        assert_eq!(anchor, 2);

        let ranking = SortAssigner::new().assign(&xs).unwrap();
        assert_eq!(ranking.as_slice(), &[2, 3, 4, 1, 0]);
    }

    #[test]
    fn distinct_values_are_not_affected() {
        let ranking = SortAssigner::new().assign(&[30, 10, 20]).unwrap();
        assert_eq!(ranking.as_slice(), &[2, 0, 1]);
    }

    #[test]
    fn custom_order() {
        let xs = [1, 5, 3];
        let ranking = SortAssigner::new().assign_by(&xs, &Reverse(Natural)).unwrap();
        assert_eq!(ranking.apply(&xs).unwrap(), vec![5, 3, 1]);

        let by_abs = |a: &i32, b: &i32| a.abs().cmp(&b.abs());
        let xs = [-3, 1, 3, -1, 2];
        let sorted = SortAssigner::new().assign_by(&xs, &by_abs).unwrap().apply(&xs).unwrap();
        let abs: Vec<_> = sorted.iter().map(|x| x.abs()).collect();
        assert_eq!(abs, vec![1, 1, 2, 3, 3]);
    }

    #[test]
    fn duplicates_can_be_rejected() {
        let strict = SortAssigner::new().reject_duplicates(true);
        assert!(strict.assign(&[1, 2, 3]).is_ok());

        let err = strict.assign(&[8, 6, 8, 1]).unwrap_err();
        assert_eq!(err, Error::DuplicateRejected { index: 2 });
        assert!(err.is_data_error());
    }

    #[test]
    fn absent_elements() {
        let xs = [Some(3), None, Some(1)];

        let err = SortAssigner::new().assign_options(&xs, Natural).unwrap_err();
        assert_eq!(err, Error::NullElement { index: 1 });
        assert!(err.is_data_error());

        let lenient = SortAssigner::new().reject_absent(false);
        let ranking = lenient.assign_options(&xs, Natural).unwrap();
        assert_eq!(ranking.apply(&xs).unwrap(), vec![None, Some(1), Some(3)]);
    }

    #[test]
    fn run_slots() {
        let run = Run { anchor: 3, start: 1, end: 5 };
        assert_eq!(run.slots().collect::<Vec<_>>(), vec![3, 4, 2, 1]);
        assert_eq!((0..5).map(|k| run.nth_slot(k)).collect::<Vec<_>>(),
                   vec![Some(3), Some(4), Some(2), Some(1), None]);
        assert_eq!(run.last_slot(), 1);

        let run = Run { anchor: 1, start: 1, end: 3 };
        assert_eq!(run.last_slot(), 2);
    }

    proptest! {
        #[test]
        fn sorts_anything(xs in vec(0u8..6, 0..80)) {
            let ranking = SortAssigner::new().assign(&xs).unwrap();
            let mut expected = xs.clone();
            expected.sort();
            assert_eq!(ranking.apply(&xs).unwrap(), expected);
        }

        #[test]
        fn first_occurrence_takes_the_anchor(xs in vec(0u8..6, 1..80)) {
            let ranking = SortAssigner::new().assign(&xs).unwrap();
            let sorted = ranking.apply(&xs).unwrap();
            for (i, x) in xs.iter().enumerate() {
                if xs[..i].contains(x) {
                    continue;
                }
                let anchor = crate::order::locate(&sorted, x, &Natural).unwrap();
                assert_eq!(ranking.apply_index(i).unwrap(), anchor);
            }
        }
    }
}
