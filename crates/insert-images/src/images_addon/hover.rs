// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Icons shown over a hovered block, and what clicking them does.

use strum_macros::AsRefStr;
use tracing::{debug, warn};

use super::ImagesAddon;
use crate::registry::BlockId;
use crate::AddonUpdate;

/// An icon over the hovered block. `as_ref()` gives its CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum HoverIcon {
    #[strum(serialize = "mediumInsert-imageRemove")]
    Remove,
    #[strum(serialize = "mediumInsert-imageResizeSmaller")]
    ResizeSmaller,
    #[strum(serialize = "mediumInsert-imageResizeBigger")]
    ResizeBigger,
    #[strum(serialize = "mediumInsert-imageLink")]
    Link,
    #[strum(serialize = "mediumInsert-imageUnlink")]
    Unlink,
}

impl ImagesAddon {
    /// The pointer is over `block`. Returns the icons to show, which is
    /// nothing while disabled or while something is being dragged.
    ///
    /// Every block can be removed. Only the first block of a placeholder
    /// carries the resize icon, as size belongs to the whole placeholder,
    /// and only a sole block can be linked.
    pub fn hover_enter(&mut self, block: BlockId) -> Vec<HoverIcon> {
        if !self.enabled.is_enabled() || self.drag.is_some() {
            return Vec::new();
        }
        let Some((placeholder, index)) = self.registry.locate(block) else {
            warn!(%block, "hover on unknown block");
            return Vec::new();
        };
        let Some(placeholder) = self.registry.placeholder_mut(placeholder)
        else {
            return Vec::new();
        };
        let small = placeholder.small;
        let sole = placeholder.blocks.len() == 1;
        let hovered = &mut placeholder.blocks[index];
        hovered.hovered = true;

        let mut icons = vec![HoverIcon::Remove];
        if index == 0 {
            icons.push(if small {
                HoverIcon::ResizeBigger
            } else {
                HoverIcon::ResizeSmaller
            });
        }
        if sole {
            icons.push(if hovered.is_linked() {
                HoverIcon::Unlink
            } else {
                HoverIcon::Link
            });
        }
        icons
    }

    pub fn hover_exit(&mut self, block: BlockId) {
        if let Some(block) = self.registry.block_mut(block) {
            block.hovered = false;
        }
    }

    pub fn resize_smaller(&mut self, block: BlockId) -> AddonUpdate {
        self.resize(block, true)
    }

    pub fn resize_bigger(&mut self, block: BlockId) -> AddonUpdate {
        self.resize(block, false)
    }

    fn resize(&mut self, block: BlockId, small: bool) -> AddonUpdate {
        let Some((placeholder, _)) = self.registry.locate(block) else {
            warn!(%block, "resize of unknown block");
            return AddonUpdate::keep();
        };
        self.registry.set_small(placeholder, small);
        self.hover_exit(block);
        AddonUpdate::changed().deselecting()
    }

    /// Remove `block` and ask the server to delete its image.
    pub fn remove_block(&mut self, block: BlockId) -> AddonUpdate {
        let Some(removed) = self.registry.remove_block(block) else {
            warn!(%block, "removing unknown block");
            return AddonUpdate::keep();
        };
        self.delete_transport.delete(removed.source());
        if self.drag.as_ref().is_some_and(|d| d.block() == block) {
            debug!(%block, "dragged block removed");
            self.drag = None;
        }

        let mut update = AddonUpdate::changed().deselecting();
        if let Some(session) = self.link.take_if(|s| s.block() == block) {
            update = update.merge(self.close_link_session(session));
        }
        update
    }
}
