// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Serializable addon options.
//!
//! Everything that can be expressed as plain data lives in
//! [`ImagesConfig`]; behaviour overrides (transports, the payload
//! formatter, the shared enabled switch) are handed to
//! [`crate::ImagesAddonBuilder`] instead.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::media_type::ImageMediaType;
use crate::{ImagesError, ImagesResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImagesConfig {
    /// Whether images can be reordered and moved by dragging.
    pub use_drag_and_drop: bool,
    /// Endpoint receiving uploads. May be relative to `base_url`.
    pub images_upload_script: String,
    /// Endpoint receiving delete requests. May be relative to `base_url`.
    pub images_delete_script: String,
    /// Placeholder text shown in the empty link field.
    pub url_placeholder: String,
    /// Exact media types accepted for upload.
    pub accepted_types: Vec<String>,
    pub base_url: Option<String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            use_drag_and_drop: true,
            images_upload_script: "upload.php".to_owned(),
            images_delete_script: "delete.php".to_owned(),
            url_placeholder: "Paste or type a link".to_owned(),
            accepted_types: ImageMediaType::default_allow_list(),
            base_url: None,
        }
    }
}

impl ImagesConfig {
    /// Parse a (possibly partial) JSON object, falling back to the
    /// defaults for every missing key.
    pub fn from_json(json: &str) -> ImagesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Matches the declared media type exactly. `image/PNG` or
    /// `image/png; q=1` are not accepted.
    pub fn accepts(&self, media_type: &str) -> bool {
        self.accepted_types.iter().any(|t| t == media_type)
    }

    pub fn upload_endpoint(&self) -> ImagesResult<Url> {
        self.resolve(&self.images_upload_script)
    }

    pub fn delete_endpoint(&self) -> ImagesResult<Url> {
        self.resolve(&self.images_delete_script)
    }

    fn resolve(&self, endpoint: &str) -> ImagesResult<Url> {
        let invalid = |source| ImagesError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            source,
        };
        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_deref().ok_or(invalid(
                    url::ParseError::RelativeUrlWithoutBase,
                ))?;
                Url::parse(base)
                    .and_then(|base| base.join(endpoint))
                    .map_err(invalid)
            }
            Err(e) => Err(invalid(e)),
        }
    }
}
