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

//! Rankings (permutations of indices, in one-line notation) and a list that
//! uses them to answer lookups quickly without forgetting its original order.
//!
//! ```rust
//! use rank_lookup::{LookupList, Ranking};
//!
//! // The ranking that sorts a vector, even one with duplicates.
//! let data = vec![8, 6, 8, 1, 6];
//! let sort = Ranking::sort(&data).unwrap();
//! assert_eq!(sort.apply(&data).unwrap(), vec![1, 6, 6, 8, 8]);
//!
//! // A list that remembers the order it was given in...
//! let list = LookupList::new(data).unwrap();
//! assert_eq!(list.get(0), Ok(&8));
//!
//! // ...but finds things by binary search.
//! assert_eq!(list.index_of(&8), Some(0));
//! assert_eq!(list.last_index_of(&8), Some(2));
//! assert_eq!(list.indexes_of(&6, None), vec![1, 4]);
//! ```

mod assign;
mod cycles;
mod error;
mod lookup;
mod order;
mod ranking;

pub use crate::assign::SortAssigner;
pub use crate::cycles::{Cycles, Transpositions};
pub use crate::error::{Error, Result};
pub use crate::lookup::LookupList;
pub use crate::order::{AbsentFirst, Comparator, Natural, Reverse};
pub use crate::ranking::Ranking;

/// Trait for applying a ranking operation.
///
/// This is the unchecked counterpart of [`Ranking::apply_vec`]: a length
/// mismatch is considered a bug, and panics.
///
/// # Laws
///
/// All implementations of `Permute` must satisfy the following properties,
/// which give `Permute::permuted_by` the qualities of a group action.
/// (whose group operator is, incidentally, also `Permute::permuted_by`!)
///
/// * **Identity:**
///   ```text
///   data.permuted_by(Ranking::identity(data.len())) == data
///   ```
/// * **Compatibility:**
///   ```text
///   data.permuted_by(a).permuted_by(b) == data.permuted_by(a.permuted_by(b))
///   ```
pub trait Permute: Sized {
    // awkward name, but it makes it makes two things clear
    // beyond a shadow of a doubt:
    // - The receiver gets permuted, not the argument.
    //   (relevant when Self is Ranking)
    // - The permutation is not in-place.
    fn permuted_by(self, ranking: &Ranking) -> Self;
}

impl<T> Permute for Vec<T> {
    fn permuted_by(self, ranking: &Ranking) -> Vec<T>
    { ranking.apply_vec(self).unwrap_or_else(|e| panic!("{}", e)) }
}

// `Permute` doubles as the group operator.
impl Permute for Ranking {
    fn permuted_by(self, other: &Ranking) -> Ranking
    { self.then(other).unwrap_or_else(|e| panic!("{}", e)) }
}
