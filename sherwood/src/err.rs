//! Error types for the `sherwood` crate

/// Errors that can prevent a table from being built
///
/// Nothing in this crate fails after construction: a `StaticMap` that
/// exists is fully usable, and lookups on it are infallible. Every error
/// therefore surfaces from [`crate::StaticMap::build`] or
/// [`crate::StaticMapBuilder::build`], before any consumer can hold a
/// table.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input pair list was empty
    ///
    /// A table always holds at least one entry; the capacity rule has no
    /// meaningful answer for zero pairs.
    #[error("cannot build a table from an empty pair list")]
    Empty,

    /// Two pairs carried equal keys while [`crate::DuplicatePolicy::Reject`]
    /// was selected
    ///
    /// `index` is the input-order position of the later of the two pairs.
    #[error("duplicate key at pair index {index}")]
    Duplicate {
        /// Input-order position of the offending pair
        index: usize,
    },
}
