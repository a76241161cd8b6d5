// Copyright 2025 Nudge Contributors.
//
// SPDX-License-Identifier: AGPL-3.0-only
// Please see LICENSE in the repository root for full details.

//! Error-mapping support for type-erased repositories

/// Wraps a repository and passes every error it returns through a mapping
/// function
///
/// Backends use this to erase their native error type into
/// [`RepositoryError`](crate::RepositoryError) when handing out a boxed
/// repository.
pub struct MapErr<R, F> {
    pub(crate) inner: R,
    pub(crate) mapper: F,
}

impl<R, F> MapErr<R, F> {
    /// Wrap `inner`, mapping its errors through `mapper`
    #[must_use]
    pub fn new(inner: R, mapper: F) -> Self {
        Self { inner, mapper }
    }
}
