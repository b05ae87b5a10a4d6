// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::BlockId;

/// Whether an image is wrapped in a link, or being given one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkState {
    Unlinked,
    /// A link-edit session is open on the block. `current` is the link it
    /// had when the session was opened.
    Editing { current: Option<String> },
    Linked(String),
}

/// One inserted image, owned by exactly one placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBlock {
    id: BlockId,
    source: String,
    link: Option<String>,
    pub(crate) hovered: bool,
    pub(crate) dragging: bool,
}

impl ImageBlock {
    pub(crate) fn new(
        id: BlockId,
        source: String,
        link: Option<String>,
    ) -> Self {
        Self {
            id,
            source,
            link,
            hovered: false,
            dragging: false,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The URL or upload handle the image is displayed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn set_link(&mut self, url: String) {
        self.link = Some(url);
    }

    pub(crate) fn take_link(&mut self) -> Option<String> {
        self.link.take()
    }
}
