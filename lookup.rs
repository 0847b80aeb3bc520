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

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::ops::Index;

use tracing::trace;

use crate::assign::{Run, SortAssigner};
use crate::error::Result;
use crate::order::{is_sorted_by, locate, AbsentFirst, Comparator, Natural};
use crate::ranking::Ranking;

/// An immutable list that keeps its elements in the order they were given,
/// but answers `index_of`-style queries by binary search.
///
/// Internally, the elements are stored sorted, alongside the [`Ranking`] that
/// sorts the original order (`sort`) and its inverse (`unsort`):
///
/// ```text
/// sort.apply(original) == sorted
/// unsort.apply(sorted) == original
/// ```
///
/// Which of several equal elements goes to which sorted slot is decided by
/// [`SortAssigner`], and that choice is what lets [`LookupList::index_of`] and
/// [`LookupList::last_index_of`] find the first and last occurrences without a scan.
#[derive(Debug, Clone)]
pub struct LookupList<T, C = Natural> {
    sorted: Vec<T>,
    sort: Ranking,
    unsort: Ranking,
    order: C,
    unique: bool,
    is_sorted: bool,
}

impl<T: Ord> LookupList<T, Natural> {
    /// Take ownership of `seq`, ordered by `Ord`.
    pub fn new(seq: Vec<T>) -> Result<Self>
    { LookupList::with_order(seq, Natural) }

    /// Copy `seq`, ordered by `Ord`.
    ///
    /// Later changes to `seq` do not affect the list.
    pub fn from_slice(seq: &[T]) -> Result<Self>
    where
        T: Clone,
    { LookupList::new(seq.to_vec()) }
}

impl<T: Ord + Clone> LookupList<T, Natural> {
    /// Like [`LookupList::group`], keyed by value.
    pub fn group_map(&self) -> BTreeMap<T, Vec<usize>>
    {
        self.group().into_iter()
            .map(|(value, indices)| (value.clone(), indices))
            .collect()
    }
}

impl<T, C: Comparator<T>> LookupList<Option<T>, AbsentFirst<C>> {
    /// Take ownership of a sequence that may have holes.
    ///
    /// Fails with [`Error::NullElement`] if `assigner` rejects absent elements.
    /// Otherwise `None` is ordered before everything else.
    ///
    /// [`Error::NullElement`]: crate::Error::NullElement
    pub fn from_options(seq: Vec<Option<T>>, order: C, assigner: &SortAssigner) -> Result<Self>
    {
        assigner.check_present(&seq)?;
        LookupList::with_assigner(seq, AbsentFirst(order), assigner)
    }
}

impl<T, C: Comparator<T>> LookupList<T, C> {
    /// Take ownership of `seq`, ordered by `order`.
    pub fn with_order(seq: Vec<T>, order: C) -> Result<Self>
    { LookupList::with_assigner(seq, order, &SortAssigner::new()) }

    /// Take ownership of `seq`, with control over how duplicates are treated.
    pub fn with_assigner(seq: Vec<T>, order: C, assigner: &SortAssigner) -> Result<Self>
    {
        let is_sorted = is_sorted_by(&seq, &order);
        let sort = assigner.assign_by(&seq, &order)?;
        let sorted = sort.apply_vec(seq)?;
        let unsort = sort.inverted();
        let unique = sorted.windows(2).all(|w| !order.equal(&w[0], &w[1]));
        Ok(LookupList { sorted, sort, unsort, order, unique, is_sorted })
    }

    pub fn len(&self) -> usize
    { self.sorted.len() }

    pub fn is_empty(&self) -> bool
    { self.sorted.is_empty() }

    /// Whether no two elements are equal.  O(1).
    pub fn is_unique(&self) -> bool
    { self.unique }

    /// Whether the original order was already sorted.  O(1).
    pub fn is_sorted(&self) -> bool
    { self.is_sorted }

    pub fn order(&self) -> &C
    { &self.order }

    /// The ranking that sorts the original order.
    pub fn ranking(&self) -> &Ranking
    { &self.sort }

    /// The ranking that restores the original order from the sorted one.
    pub fn unranking(&self) -> &Ranking
    { &self.unsort }

    /// The element at index `i` of the original order.  O(1).
    pub fn get(&self, i: usize) -> Result<&T>
    { Ok(&self.sorted[self.sort.apply_index(i)?]) }

    /// Iterate in the original order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_
    { self.sort.as_slice().iter().map(move |&k| &self.sorted[k]) }

    /// Copy out the original order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    { self.iter().cloned().collect() }

    /// The smallest index holding `value`.  O(log n).
    pub fn index_of(&self, value: &T) -> Option<usize>
    {
        let anchor = locate(&self.sorted, value, &self.order)?;
        Some(self.unsort.as_slice()[anchor])
    }

    /// The largest index holding `value`.  O(log n + k) for `k` occurrences.
    pub fn last_index_of(&self, value: &T) -> Option<usize>
    {
        let run = self.run_of(value)?;
        Some(self.unsort.as_slice()[run.last_slot()])
    }

    pub fn contains(&self, value: &T) -> bool
    { self.index_of(value).is_some() }

    /// Indices holding `value`, in ascending order.
    ///
    /// With `limit: Some(n)`, at most `n` are returned: the `n` smallest ones.
    /// `None` returns all of them.
    pub fn indexes_of(&self, value: &T, limit: Option<usize>) -> Vec<usize>
    {
        if limit == Some(0) {
            return vec![];
        }
        let run = match self.run_of(value) {
            Some(run) => run,
            None => return vec![],
        };
        let unsort = self.unsort.as_slice();
        // the claim order visits occurrences in ascending index order already,
        // so truncating it keeps the smallest ones
        let mut out: Vec<_> = run.slots()
            .take(limit.unwrap_or(usize::MAX))
            .map(|k| unsort[k])
            .collect();
        out.sort_unstable();
        out
    }

    /// Every distinct value (in sorted order), with all indices holding it (ascending).
    pub fn group(&self) -> Vec<(&T, Vec<usize>)>
    {
        let unsort = self.unsort.as_slice();
        let mut groups = vec![];
        let mut start = 0;
        while start < self.sorted.len() {
            let head = &self.sorted[start];
            let end = start + self.sorted[start..].iter()
                .take_while(|x| self.order.equal(head, *x))
                .count();

            let mut indices: Vec<_> = unsort[start..end].to_vec();
            indices.sort_unstable();
            groups.push((head, indices));
            start = end;
        }
        groups
    }

    /// The elements in ascending order.  No copy.
    pub fn sorted(&self) -> &[T]
    { &self.sorted }

    /// The elements in ascending order, with duplicates collapsed.
    ///
    /// Only copies if the list actually has duplicates.
    pub fn sorted_unique(&self) -> Cow<'_, [T]>
    where
        T: Clone,
    {
        if self.unique {
            return Cow::Borrowed(&self.sorted);
        }
        let mut out: Vec<T> = Vec::with_capacity(self.sorted.len());
        for x in &self.sorted {
            let repeat = out.last().map_or(false, |last| self.order.equal(last, x));
            if !repeat {
                out.push(x.clone());
            }
        }
        Cow::Owned(out)
    }

    /// The list whose original order is the sorted order of this one.
    ///
    /// Returns `self` untouched if it is already sorted.
    pub fn into_sorted(self) -> Result<Self>
    {
        if self.is_sorted {
            return Ok(self);
        }
        if self.unique {
            let n = self.len();
            return Ok(LookupList {
                sort: Ranking::identity(n),
                unsort: Ranking::identity(n),
                is_sorted: true,
                ..self
            });
        }
        // Slot assignment among duplicates depends on the original order,
        // so the identity would place them wrong.
        LookupList::with_order(self.sorted, self.order)
    }

    /// The list whose original order is `ranking` applied to this one's.
    ///
    /// `ranking` may be shorter than the list, in which case the tail stays put.
    pub fn shuffle(&self, ranking: &Ranking) -> Result<Self>
    where
        T: Clone,
        C: Clone,
    {
        let ranking = ranking.padded(self.len())?;
        if self.unique {
            // With no duplicates, the sorted values don't care about the original order.
            trace!(len = self.len(), "shuffling unique lookup list in place of the rankings");
            let unsort = ranking.compose(&self.unsort)?;
            let sort = unsort.inverted();
            return Ok(LookupList {
                sorted: self.sorted.clone(),
                is_sorted: sort.is_identity(),
                sort,
                unsort,
                order: self.order.clone(),
                unique: true,
            });
        }
        trace!(len = self.len(), "rebuilding lookup list with duplicates for shuffle");
        let seq = ranking.apply_vec(self.to_vec())?;
        LookupList::with_order(seq, self.order.clone())
    }

    fn run_of(&self, value: &T) -> Option<Run>
    {
        let anchor = locate(&self.sorted, value, &self.order)?;
        let sorted = &self.sorted;
        let order = &self.order;
        Some(Run::around(anchor, sorted.len(), |k| order.equal(&sorted[k], value)))
    }
}

impl<T, C> Index<usize> for LookupList<T, C> {
    type Output = T;

    fn index(&self, i: usize) -> &T
    { &self.sorted[self.sort.as_slice()[i]] }
}
