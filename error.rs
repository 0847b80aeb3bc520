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

use thiserror::Error;

/// Everything that can go wrong in this crate.
///
/// `NullElement` and `DuplicateRejected` are outcomes of validating user data,
/// and are worth matching on.  Every other variant indicates a bug in the caller
/// (or, in the case of `SlotExhausted`, in this crate).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An index vector does not contain one copy of every index in `0..len`.
    #[error("Tried to construct an invalid ranking.")]
    InvalidRanking,

    #[error("Incorrect ranking length: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("absent element at index {index}")]
    NullElement { index: usize },

    #[error("duplicate element at index {index}")]
    DuplicateRejected { index: usize },

    /// No free sorted slot was left for an element.  Can't happen.
    #[error("no free sorted slot for the element at index {index} (this is a bug)")]
    SlotExhausted { index: usize },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid notation: {0}")]
    InvalidNotation(String),
}

impl Error {
    /// Whether this error describes bad input data rather than a programming error.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::NullElement { .. } | Error::DuplicateRejected { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_index(index: usize, len: usize) -> Result<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}
