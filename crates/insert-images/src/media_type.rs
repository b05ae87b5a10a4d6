// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The image media types accepted for upload when the configuration does
/// not override the allow-list.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter,
    EnumString,
)]
pub enum ImageMediaType {
    #[strum(serialize = "image/png")]
    Png,
    #[strum(serialize = "image/jpeg")]
    Jpeg,
    #[strum(serialize = "image/gif")]
    Gif,
}

impl ImageMediaType {
    pub fn default_allow_list() -> Vec<String> {
        use strum::IntoEnumIterator;

        Self::iter().map(|t| t.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn default_allow_list_is_png_jpeg_gif() {
        assert_eq!(
            ImageMediaType::default_allow_list(),
            vec!["image/png", "image/jpeg", "image/gif"]
        );
    }

    #[test]
    fn parses_from_mime_string() {
        assert_eq!(
            ImageMediaType::from_str("image/gif").ok(),
            Some(ImageMediaType::Gif)
        );
        assert!(ImageMediaType::from_str("image/webp").is_err());
    }
}
