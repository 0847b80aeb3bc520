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

use crate::error::{Error, Result};
use crate::ranking::Ranking;

/// A ranking written as disjoint cycles.
///
/// The cycle `[a, b, c]` sends the element at `a` to `b`, the one at `b` to `c`,
/// and the one at `c` back to `a`.  Fixed points are never stored.
///
/// When computed from a ranking, each cycle starts at its smallest index and
/// the cycles are ordered by their first index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycles {
    cycles: Vec<Vec<usize>>,
    // length of the ranking this describes
    len: usize,
}

/// A sequence of swaps that, performed in order, applies a ranking in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transpositions {
    swaps: Vec<(usize, usize)>,
    len: usize,
}

impl Cycles {
    /// Decompose a ranking.  O(n).
    pub fn of(ranking: &Ranking) -> Cycles
    {
        let fwd = ranking.as_slice();
        let mut visited = vec![false; fwd.len()];
        let mut cycles = vec![];
        for start in 0..fwd.len() {
            if visited[start] || fwd[start] == start {
                continue;
            }
            let mut cycle = vec![];
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                cycle.push(i);
                i = fwd[i];
            }
            cycles.push(cycle);
        }
        Cycles { cycles, len: fwd.len() }
    }

    /// Validate a list of zero-based cycles.
    ///
    /// Fails with [`Error::InvalidRanking`] if any index appears twice.  Cycles of
    /// length one are accepted and dropped.  The described ranking has length
    /// `max(index) + 1`.
    pub fn from_vec(cycles: Vec<Vec<usize>>) -> Result<Cycles>
    {
        let len = cycles.iter()
            .flat_map(|cycle| cycle.iter())
            .max()
            .map_or(0, |&max| max + 1);

        let mut seen = vec![false; len];
        for &i in cycles.iter().flatten() {
            if std::mem::replace(&mut seen[i], true) {
                return Err(Error::InvalidRanking);
            }
        }

        let cycles = cycles.into_iter().filter(|cycle| cycle.len() > 1).collect();
        Ok(Cycles { cycles, len })
    }

    pub fn cycles(&self) -> &[Vec<usize>]
    { &self.cycles }

    pub fn into_vec(self) -> Vec<Vec<usize>>
    { self.cycles }

    /// Length of the ranking described.
    pub fn domain_len(&self) -> usize
    { self.len }

    pub fn is_identity(&self) -> bool
    { self.cycles.is_empty() }

    pub fn to_ranking(&self) -> Ranking
    {
        let mut fwd: Vec<_> = (0..self.len).collect();
        for cycle in &self.cycles {
            for (k, &i) in cycle.iter().enumerate() {
                fwd[i] = cycle[(k + 1) % cycle.len()];
            }
        }
        Ranking::from_vec_unchecked(fwd)
    }

    /// Like [`Cycles::to_ranking`], padded with fixed points up to `len`.
    pub fn to_ranking_padded(&self, len: usize) -> Result<Ranking>
    { self.to_ranking().padded(len) }

    /// Parity of the ranking: `1` if even, `-1` if odd.
    pub fn sign(&self) -> i8
    {
        let swaps: usize = self.cycles.iter().map(|c| c.len() - 1).sum();
        if swaps % 2 == 0 { 1 } else { -1 }
    }

    /// Break every cycle into swaps.
    ///
    /// A cycle `[c0, c1, ..., ck]` becomes `(c(k-1), ck), ..., (c1, c2), (c0, c1)`.
    pub fn transpositions(&self) -> Transpositions
    {
        let mut swaps = vec![];
        for cycle in &self.cycles {
            swaps.extend(cycle.windows(2).rev().map(|w| (w[0], w[1])));
        }
        Transpositions { swaps, len: self.len }
    }
}

impl Transpositions {
    pub fn swaps(&self) -> &[(usize, usize)]
    { &self.swaps }

    /// Length of the ranking described.
    pub fn domain_len(&self) -> usize
    { self.len }

    /// Apply the ranking to `buf` in place, with no allocation.
    ///
    /// Afterwards `buf` holds what [`Ranking::apply`] would have returned.
    pub fn clobber<T>(&self, buf: &mut [T]) -> Result<()>
    {
        self.check_buf_len(buf.len())?;
        for &(a, b) in &self.swaps {
            buf.swap(a, b);
        }
        Ok(())
    }

    /// Undo [`Transpositions::clobber`].
    pub fn unclobber<T>(&self, buf: &mut [T]) -> Result<()>
    {
        self.check_buf_len(buf.len())?;
        for &(a, b) in self.swaps.iter().rev() {
            buf.swap(a, b);
        }
        Ok(())
    }

    pub fn to_ranking(&self) -> Ranking
    {
        // after clobbering, position k holds the index that was pushed there
        let mut pulled: Vec<_> = (0..self.len).collect();
        for &(a, b) in &self.swaps {
            pulled.swap(a, b);
        }
        Ranking::from_vec_unchecked(pulled).inverted()
    }

    /// Each swap as a ranking of its own, in order of application.
    pub fn to_rankings(&self) -> Vec<Ranking>
    {
        self.swaps.iter()
            .map(|&(a, b)| {
                let mut fwd: Vec<_> = (0..self.len).collect();
                fwd.swap(a, b);
                Ranking::from_vec_unchecked(fwd)
            })
            .collect()
    }

    fn check_buf_len(&self, actual: usize) -> Result<()>
    {
        if actual < self.len {
            return Err(Error::LengthMismatch { expected: self.len, actual });
        }
        Ok(())
    }
}

impl Ranking {
    /// Disjoint-cycle decomposition.  See [`Cycles`].
    pub fn cycles(&self) -> Cycles
    { Cycles::of(self) }

    /// Build a ranking from zero-based disjoint cycles.
    pub fn from_cycles(cycles: Vec<Vec<usize>>) -> Result<Ranking>
    { Ok(Cycles::from_vec(cycles)?.to_ranking()) }

    /// Swaps that apply this ranking in place.  See [`Transpositions::clobber`].
    pub fn transpositions(&self) -> Transpositions
    { self.cycles().transpositions() }

    /// Parity: `1` if even, `-1` if odd.
    pub fn sign(&self) -> i8
    { self.cycles().sign() }
}

/// Renders one-based cycle notation, e.g. `(1 3)(2 5 4)`, or `()` for an identity.
impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycles.is_empty() {
            return write!(f, "()");
        }
        for cycle in &self.cycles {
            write!(f, "(")?;
            for (k, &i) in cycle.iter().enumerate() {
                if k > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", i + 1)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Parses one-based cycle notation.  Indices within a cycle may be separated
/// by whitespace or commas.
impl FromStr for Cycles {
    type Err = Error;

    fn from_str(s: &str) -> Result<Cycles> {
        let bad = || Error::InvalidNotation(s.to_string());

        let mut cycles = vec![];
        let mut rest = s.trim();
        while !rest.is_empty() {
            rest = rest.strip_prefix('(').ok_or_else(bad)?;
            let close = rest.find(')').ok_or_else(bad)?;

            let cycle = rest[..close]
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|word| !word.is_empty())
                .map(|word| {
                    word.parse::<usize>().ok()
                        .and_then(|i| i.checked_sub(1))
                        .ok_or_else(bad)
                })
                .collect::<Result<Vec<_>>>()?;
            cycles.push(cycle);

            rest = rest[close + 1..].trim_start();
        }
        Cycles::from_vec(cycles)
    }
}
