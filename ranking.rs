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

use std::fmt;
use std::str::FromStr;

use crate::assign::SortAssigner;
use crate::error::{check_index, Error, Result};
use crate::order::{Comparator, Natural};

/// A reordering operation on an array, stored in one-line notation.
///
/// The `i`th entry of a ranking is the position that the element at index `i`
/// is *pushed* to when the ranking is applied:
///
/// ```text
/// ranking.apply(&seq)?[ranking.apply_index(i)?] == seq[i]
/// ```
///
/// Rankings are immutable.  Every operation produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ranking {
    fwd: RankVec,
}

// The bare vector, with no opinion about direction.
//
// Method bodies on Ranking describe how a ranking relates to its inputs (which
// side gets inverted, which operand goes first), while method bodies on RankVec
// do the real work.
#[derive(Clone, PartialEq, Eq, Hash)]
struct RankVec( // RankVec<Src, Dest>
    Vec<usize>, // Indexed<Src, Vec<Dest>>
);

impl fmt::Debug for RankVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl Ranking {
    /// Construct the identity ranking of a given length.
    pub fn identity(n: usize) -> Ranking
    { Ranking { fwd: RankVec::eye(n) } }

    /// Construct a ranking from its one-line notation.
    ///
    /// If the `k`th element of the vector is `value`, then applying the ranking
    /// will *push* the data at index `k` over to index `value`.
    ///
    /// This performs O(n) validation on the data to verify that every index in
    /// `0..vec.len()` appears exactly once.
    pub fn from_vec(vec: Vec<usize>) -> Result<Ranking>
    { Ok(Ranking { fwd: RankVec::from_vec(vec)? }) }

    /// Construct a ranking from one-based one-line notation, as produced by `Display`.
    pub fn from_one_based(values: &[usize]) -> Result<Ranking>
    {
        let vec = values.iter()
            .map(|&x| x.checked_sub(1).ok_or(Error::InvalidRanking))
            .collect::<Result<Vec<_>>>()?;
        Ranking::from_vec(vec)
    }

    /// No-op constructor.  Still performs checking in debug builds.
    pub(crate) fn from_vec_unchecked(vec: Vec<usize>) -> Ranking
    { Ranking { fwd: RankVec(vec).debug_validated() } }

    /// The ranking of length `n` that swaps `i` and `j`.
    pub fn transposition(n: usize, i: usize, j: usize) -> Result<Ranking>
    {
        check_index(i, n)?;
        check_index(j, n)?;
        let mut vec: Vec<_> = (0..n).collect();
        vec.swap(i, j);
        Ok(Ranking::from_vec_unchecked(vec))
    }

    /// Construct a random ranking of the given length.
    pub fn random(n: usize) -> Ranking
    { Ranking::random_with(n, &mut rand::thread_rng()) }

    /// Construct a random ranking of the given length from a specific source of randomness.
    pub fn random_with<R: rand::Rng + ?Sized>(n: usize, rng: &mut R) -> Ranking
    {
        use rand::seq::SliceRandom;

        let mut vec: Vec<_> = (0..n).collect();
        vec.shuffle(rng);
        Ranking { fwd: RankVec(vec) }
    }

    /// Compute the ranking that, when applied to `xs`, would sort it.
    ///
    /// Equal elements are pushed to distinct slots.  See [`SortAssigner`] for
    /// the exact rule.
    pub fn sort<T: Ord>(xs: &[T]) -> Result<Ranking>
    { SortAssigner::new().assign_by(xs, &Natural) }

    /// Compute the ranking that, when applied to `xs`, would sort it under `order`.
    pub fn sort_by<T, C: Comparator<T>>(xs: &[T], order: &C) -> Result<Ranking>
    { SortAssigner::new().assign_by(xs, order) }

    /// Get the length of the ranking.
    pub fn len(&self) -> usize
    { self.fwd.0.len() }

    pub fn is_empty(&self) -> bool
    { self.fwd.0.is_empty() }

    pub fn is_identity(&self) -> bool
    { self.fwd.0.iter().enumerate().all(|(i, &x)| i == x) }

    /// The one-line notation.
    pub fn as_slice(&self) -> &[usize]
    { &self.fwd.0 }

    /// Recover the one-line notation.  No-op.
    pub fn into_vec(self) -> Vec<usize>
    { self.fwd.0 }

    /// Apply the ranking to an index. O(1).
    ///
    /// Calling this on the indices contained in a sparse-format data structure will
    /// produce the same indices as if the corresponding dense-format data structure
    /// were permuted.
    pub fn apply_index(&self, i: usize) -> Result<usize>
    {
        check_index(i, self.len())?;
        Ok(self.fwd.0[i])
    }

    /// Get the inverse of this ranking.
    #[must_use = "not an in-place operation"]
    pub fn inverted(&self) -> Ranking
    { Ranking { fwd: self.fwd.inverted() } }

    /// Conventional composition, `r[i] = self[other[i]]`.
    ///
    /// Applying the result is the same as applying `other` and then `self`.
    pub fn compose(&self, other: &Ranking) -> Result<Ranking>
    { Ok(Ranking { fwd: self.fwd.of(&other.fwd)? }) }

    /// Flipped composition.  `a.then(b) == b.compose(a)`.
    ///
    /// The flipped order can feel more natural when using method syntax:
    /// ```text
    /// b.apply(&a.apply(&x)?)? == a.then(&b)?.apply(&x)?
    /// ```
    pub fn then(&self, other: &Ranking) -> Result<Ranking>
    { other.compose(self) }

    /// Extend to length `len` by fixing every new index.
    ///
    /// Fails if `len` is shorter than the ranking.
    pub fn padded(&self, len: usize) -> Result<Ranking>
    { Ok(Ranking { fwd: self.fwd.padded(len)? }) }

    /// Compute the ranking that applies this ranking `exp` times in a row.
    ///
    /// This uses exponentiation by squaring to run in `O(log(exp))` compositions.
    pub fn pow_unsigned(&self, mut exp: u64) -> Ranking {
        // Exponentiation by squaring (rankings form a monoid)
        let mut acc = RankVec::eye(self.len());
        let mut base = self.fwd.clone();
        while exp > 0 {
            if (exp & 1) == 1 {
                acc = base.of_same_len(&acc);
            }
            base = base.of_same_len(&base);
            exp /= 2;
        }
        Ranking { fwd: acc }
    }

    /// Compute the ranking that applies this ranking `exp` times in a row.
    ///
    /// Negative exponents produce powers of the inverse.
    pub fn pow(&self, exp: i64) -> Ranking {
        if exp < 0 {
            self.inverted().pow_unsigned(exp.unsigned_abs())
        } else {
            self.pow_unsigned(exp as u64)
        }
    }

    /// Rearrange a sequence so that `out[self[i]] == seq[i]`.
    ///
    /// `seq` may be longer than the ranking, in which case the extra elements
    /// stay where they are.
    pub fn apply<T: Clone>(&self, seq: &[T]) -> Result<Vec<T>>
    {
        self.check_seq_len(seq.len())?;
        let mut out = seq.to_vec();
        for (i, &dest) in self.fwd.0.iter().enumerate() {
            out[dest] = seq[i].clone();
        }
        Ok(out)
    }

    /// Like [`Ranking::apply`], but moves the elements instead of cloning them.
    pub fn apply_vec<T>(&self, vec: Vec<T>) -> Result<Vec<T>>
    {
        self.check_seq_len(vec.len())?;
        Ok(unsafe_impls::push_to_new_vec(vec, &self.fwd))
    }

    fn check_seq_len(&self, actual: usize) -> Result<()>
    {
        if actual < self.len() {
            return Err(Error::LengthMismatch { expected: self.len(), actual });
        }
        Ok(())
    }
}

impl RankVec {
    fn eye(n: usize) -> RankVec
    { RankVec((0..n).collect()) }

    fn from_vec(vec: Vec<usize>) -> Result<RankVec>
    {
        if !Self::validate_data(&vec) {
            return Err(Error::InvalidRanking);
        }
        Ok(RankVec(vec))
    }

    // Checks invariants required by Ranking for unsafe code.
    #[must_use = "doesn't assert"]
    fn validate_data(xs: &[usize]) -> bool {
        let mut seen = vec![false; xs.len()];
        for &x in xs {
            match seen.get_mut(x) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    fn debug_validated(self) -> RankVec {
        debug_assert!(RankVec::validate_data(&self.0));
        self
    }

    #[must_use = "not an in-place operation"]
    fn inverted(&self) -> Self
    {
        let mut inv = vec![std::usize::MAX; self.0.len()]; // [Dest] -> Src
        for (i, &x) in self.0.iter().enumerate() { // i: Src, x: Dest
            inv[x] = i;
        }
        RankVec(inv).debug_validated()
    }

    fn padded(&self, len: usize) -> Result<Self>
    {
        if len < self.0.len() {
            return Err(Error::LengthMismatch { expected: self.0.len(), actual: len });
        }
        let mut out = self.0.clone();
        out.extend(self.0.len()..len);
        Ok(RankVec(out).debug_validated())
    }

    // Vec that applies other, then self.
    fn of(&self, other: &RankVec) -> Result<RankVec>
    {
        if self.0.len() != other.0.len() {
            return Err(Error::LengthMismatch { expected: self.0.len(), actual: other.0.len() });
        }
        Ok(self.of_same_len(other))
    }

    // Same as `of`, for callers who already know the lengths agree.
    fn of_same_len(&self, other: &RankVec) -> RankVec
    {
        assert_eq!(self.0.len(), other.0.len(), "Incorrect ranking length");
        RankVec(other.0.iter().map(|&i| self.0[i]).collect()).debug_validated()
    }
}

// (module to protect from lollipop model; the unsafety here
//  is extremely localized)
mod unsafe_impls {
    use super::*;

    pub(super) fn push_to_new_vec<T>(mut vec: Vec<T>, fwd: &RankVec) -> Vec<T> {
        assert!(
            vec.len() >= fwd.0.len(),
            "Incorrect ranking length",
        );
        let len = vec.len();
        let mut out = Vec::with_capacity(len);

        //------------------------------------------------
        // You are now entering a PANIC FREE ZONE

        { // scope ptrs so we can reason about them
            let vec_ptr = vec.as_ptr();
            let out_ptr: *mut T = out.as_mut_ptr();

            // a ranking holds indices into `out`, indexed by position in `vec`.
            for (vec_i, &out_i) in fwd.0.iter().enumerate() {
                // SAFETY:
                //
                //  * vec_i < vec.len() because:
                //    * vec_i comes from `Enumerate` and is thus `< fwd.0.len()`.
                //    * We asserted earlier that `fwd.0.len() <= vec.len()`.
                //
                //  * vec[vec_i] will not be double-dropped, because:
                //    * we perform `vec.set_len(0)` after this loop.
                //    * we cannot possibly panic before this occurs.
                let value = unsafe { vec_ptr.add(vec_i).read() };

                // SAFETY:
                //
                //  * out_i < out.capacity() because:
                //    * A privacy-protected invariant of RankVec guarantees that `out_i < fwd.0.len()`.
                //    * `fwd.0.len() <= len == out.capacity()`.
                unsafe { out_ptr.add(out_i).write(value) };
            }

            // The tail beyond the ranking stays put.
            //
            // SAFETY: `fwd.0.len()..len` is in bounds for both buffers, and
            // the two allocations are distinct.
            let n = fwd.0.len();
            unsafe {
                std::ptr::copy_nonoverlapping(vec_ptr.add(n), out_ptr.add(n), len - n);
            }
        }

        // SAFETY:
        //
        // * All elements in out[0..len] are initialized because:
        //   * A privacy-protected invariant of RankVec guarantees that, in the above `for` loop,
        //     every index from 0..fwd.0.len() will have appeared exactly once as `out_i`.
        //   * The tail was copied in full.
        // * The original items now live in `out`, so `vec` must forget them
        //   (but may still free its buffer).
        unsafe { out.set_len(len); }
        unsafe { vec.set_len(0); }

        // Thank you for flying with us. You may now PANIC!
        //------------------------------------------------
        out
    }
}

/// Renders one-based one-line notation, e.g. `[3, 1, 2]`.
impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, &x) in self.fwd.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x + 1)?;
        }
        write!(f, "]")
    }
}

/// Parses one-based one-line notation, e.g. `[3, 1, 2]`.
impl FromStr for Ranking {
    type Err = Error;

    fn from_str(s: &str) -> Result<Ranking> {
        let bad = || Error::InvalidNotation(s.to_string());

        let inner = s.trim()
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(bad)?;

        if inner.trim().is_empty() {
            return Ok(Ranking::identity(0));
        }
        let values = inner.split(',')
            .map(|word| word.trim().parse::<usize>().map_err(|_| bad()))
            .collect::<Result<Vec<_>>>()?;
        Ranking::from_one_based(&values)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    use self::drop_pusher::DropPusher;
    mod drop_pusher {
        use std::rc::Rc;
        use std::cell::RefCell;

        /// Helper for testing panic/drop safety.
        pub struct DropPusher<T: Copy>(Rc<RefCell<Vec<T>>>, T);

        impl<T: Copy + 'static> DropPusher<T> {
            /// Create a shared vector, and a `new` function which constructs
            /// `DropPushers` tied to that vector.
            pub fn new_trial() -> (Rc<RefCell<Vec<T>>>, Box<dyn Fn(T) -> DropPusher<T>>)
            {
                let history = Rc::new(RefCell::new(vec![]));
                let new = {
                    let history = history.clone();
                    Box::new(move |x| DropPusher(history.clone(), x))
                };
                (history, new)
            }
        }

        impl<T: Copy> Drop for DropPusher<T> {
            fn drop(&mut self) {
                self.0.borrow_mut().push(self.1);
            }
        }
    }

    fn r(vec: Vec<usize>) -> Ranking
    { Ranking::from_vec(vec).unwrap() }

    #[test]
    fn identity() {
        for n in 0..6 {
            let id = Ranking::identity(n);
            assert!(id.is_identity());
            for i in 0..n {
                assert_eq!(id.apply_index(i), Ok(i));
            }
        }
    }

    #[test]
    fn inverse()
    {
        let perm = Ranking::random(20);
        let inv = perm.inverted();

        assert!(perm.compose(&inv).unwrap().is_identity());
        assert!(inv.compose(&perm).unwrap().is_identity());
        assert_eq!(inv.inverted(), perm);
        assert_eq!(perm.compose(&Ranking::identity(20)).unwrap(), perm);
    }

    #[test]
    fn sorting_a_ranking_reproduces_it()
    {
        // the value at index i is exactly the sorted slot it lands in
        let perm = Ranking::random(20);
        assert_eq!(Ranking::sort(perm.as_slice()).unwrap(), perm);

        let sorter = Ranking::sort(&[40, 10, 30, 20]).unwrap();
        assert_eq!(sorter, r(vec![3, 0, 2, 1]));
        assert_eq!(sorter.inverted(), r(vec![1, 3, 2, 0]));
    }

    #[test]
    fn invalid() {
        assert_eq!(Ranking::from_vec(vec![0, 1, 3, 3]), Err(Error::InvalidRanking));
        assert_eq!(Ranking::from_vec(vec![1, 2, 3]), Err(Error::InvalidRanking));
        assert_eq!(Ranking::from_one_based(&[0, 1]), Err(Error::InvalidRanking));
        assert!(Ranking::from_vec(vec![]).unwrap().is_empty());
    }

    #[test]
    fn out_of_range() {
        let perm = r(vec![2, 0, 1]);
        assert_eq!(perm.apply_index(3), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
        assert!(Ranking::transposition(3, 0, 3).is_err());
    }

    #[test]
    fn apply_pushes() {
        let perm = r(vec![2, 0, 1]);
        let data = vec!['a', 'b', 'c'];
        let out = perm.apply(&data).unwrap();
        assert_eq!(out, vec!['b', 'c', 'a']);
        for i in 0..3 {
            assert_eq!(out[perm.apply_index(i).unwrap()], data[i]);
        }
        assert_eq!(perm.apply_vec(data).unwrap(), out);
    }

    #[test]
    fn apply_passes_tail_through() {
        let perm = r(vec![1, 0]);
        assert_eq!(perm.apply(&[10, 20, 30, 40]).unwrap(), vec![20, 10, 30, 40]);
        assert_eq!(perm.apply_vec(vec![10, 20, 30]).unwrap(), vec![20, 10, 30]);
        assert_eq!(
            perm.apply(&[10]),
            Err(Error::LengthMismatch { expected: 2, actual: 1 }),
        );
        assert!(perm.apply_vec(vec![10]).is_err());
    }

    #[test]
    fn drop_safety() {
        let (drop_history, dp) = DropPusher::new_trial();
        {
            let vec = vec![dp(0), dp(1), dp(2), dp(3), dp(4), dp(5)];

            let vec2 = r(vec![3, 1, 0, 4, 2]).apply_vec(vec).unwrap();
            assert_eq!(drop_history.borrow().len(), 0);

            drop(vec2);
            assert_eq!(drop_history.borrow().len(), 6);
        }
        assert_eq!(drop_history.borrow().len(), 6);
    }

    #[test]
    fn composition()
    {
        let a = r(vec![1, 0, 2]);
        let b = r(vec![2, 1, 0]);
        let ab = a.compose(&b).unwrap();
        assert_eq!(ab, r(vec![2, 0, 1]));
        assert_eq!(b.then(&a).unwrap(), ab);
        assert_eq!(
            ab.apply(&[0, 1, 2]).unwrap(),
            a.apply(&b.apply(&[0, 1, 2]).unwrap()).unwrap(),
        );
        assert_eq!(
            a.compose(&Ranking::identity(4)),
            Err(Error::LengthMismatch { expected: 3, actual: 4 }),
        );
    }

    #[test]
    fn associativity()
    {
        for _ in 0..10 {
            use rand::Rng;

            let mut rng = rand::thread_rng();
            let n = rng.gen_range(10..20);
            let s = b"abcdefghijklmnopqrstuvwxyz"[..n].to_vec();
            let a = Ranking::random(n);
            let b = Ranking::random(n);
            let c = Ranking::random(n);
            assert_eq!(
                a.compose(&b).unwrap().compose(&c).unwrap(),
                a.compose(&b.compose(&c).unwrap()).unwrap(),
            );
            assert_eq!(
                c.apply(&b.apply(&s).unwrap()).unwrap(),
                b.compose(&c).unwrap().apply(&s).unwrap(),
                "compatibility, for Vec",
            );
        }
    }

    #[test]
    fn pad() {
        let perm = r(vec![1, 0]);
        assert_eq!(perm.padded(4).unwrap(), r(vec![1, 0, 2, 3]));
        assert_eq!(perm.padded(2).unwrap(), perm);
        assert!(perm.padded(1).is_err());
        // no implicit padding in equality
        assert_ne!(perm.padded(3).unwrap(), perm);
    }

    #[test]
    fn pow() {
        for &len in &[0, 1, 4, 20] {
            for _ in 0..5 {
                let perm = Ranking::random(len);
                for &exp in &[0, 1, 4, 20, 21] {
                    let original = b"abcdefghijklmnopqrstuvwxyz"[..len].to_owned();

                    let mut brute_force = original.clone();
                    for _ in 0..exp {
                        brute_force = perm.apply(&brute_force).unwrap();
                    }

                    let fast = perm.pow(exp).apply(&original).unwrap();
                    assert_eq!(fast, brute_force);

                    let undone = perm.pow(-exp).apply(&fast).unwrap();
                    assert_eq!(undone, original);
                }
            }
        }
    }

    #[test]
    fn display_is_one_based() {
        let perm = r(vec![2, 0, 1]);
        assert_eq!(perm.to_string(), "[3, 1, 2]");
        assert_eq!(Ranking::identity(0).to_string(), "[]");
        assert_eq!("[3, 1, 2]".parse::<Ranking>().unwrap(), perm);
        assert_eq!(" [ 3,1 , 2 ] ".parse::<Ranking>().unwrap(), perm);
        assert_eq!("[]".parse::<Ranking>().unwrap(), Ranking::identity(0));
        assert!("3, 1, 2".parse::<Ranking>().is_err());
        assert!("[3, x, 2]".parse::<Ranking>().is_err());
        assert_eq!("[3, 3, 2]".parse::<Ranking>(), Err(Error::InvalidRanking));
    }

    #[test]
    fn transposition() {
        let t = Ranking::transposition(4, 1, 3).unwrap();
        assert_eq!(t.as_slice(), &[0, 3, 2, 1]);
        assert!(t.compose(&t).unwrap().is_identity());
        assert!(Ranking::transposition(4, 2, 2).unwrap().is_identity());
    }
}
