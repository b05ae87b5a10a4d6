// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

pub type ImagesResult<T> = Result<T, ImagesError>;

/// Errors surfaced while configuring or building an [`crate::ImagesAddon`].
/// Runtime operations on a built addon never fail; they degrade to
/// a no-op or a dismissible notice instead.
#[derive(Debug, Error)]
pub enum ImagesError {
    #[error("invalid images configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid endpoint `{endpoint}`: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("no {0} transport configured")]
    MissingTransport(&'static str),

    #[cfg(feature = "http")]
    #[error("could not create the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
