// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Owner of placeholders and of the image blocks inside them.
//!
//! The registry is plain data: it never talks to the host, never
//! schedules anything and never logs. Operations given an id that is not
//! live report it through their return value (`None` / `false`) and leave
//! everything untouched; the caller decides what a miss means.
//!
//! Invariants held after every call:
//!
//! 1. A block id appears in at most one placeholder, at most once.
//! 2. A placeholder with no blocks is never small.
//! 3. [`Registry::move_block`] is a single step: there is no state in
//!    which the moved block is in both sequences or in neither.

mod image_block;
mod placeholder;

pub use image_block::{ImageBlock, LinkState};
pub use placeholder::{
    ErrorNotice, Placeholder, ProgressIndicator, UPLOAD_FAILED_MESSAGE,
};

pub use crate::ids::{BlockId, NoticeId, PlaceholderId};
use crate::ids::IdCounter;

#[derive(Debug, Default)]
pub struct Registry {
    placeholders: Vec<Placeholder>,
    placeholder_ids: IdCounter,
    block_ids: IdCounter,
    notice_ids: IdCounter,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_placeholder(&mut self) -> PlaceholderId {
        let id = self.placeholder_ids.next(PlaceholderId::from_raw);
        self.placeholders.push(Placeholder::new(id));
        id
    }

    /// Forget a placeholder that left the host document, with its blocks.
    pub fn remove_placeholder(
        &mut self,
        id: PlaceholderId,
    ) -> Option<Placeholder> {
        let index = self.placeholders.iter().position(|p| p.id() == id)?;
        Some(self.placeholders.remove(index))
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder(&self, id: PlaceholderId) -> Option<&Placeholder> {
        self.placeholders.iter().find(|p| p.id() == id)
    }

    pub(crate) fn placeholders_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Placeholder> {
        self.placeholders.iter_mut()
    }

    pub(crate) fn placeholder_mut(
        &mut self,
        id: PlaceholderId,
    ) -> Option<&mut Placeholder> {
        self.placeholders.iter_mut().find(|p| p.id() == id)
    }

    /// A detached block with a fresh id, ready for
    /// [`Registry::append_block`].
    pub fn new_block(
        &mut self,
        source: impl Into<String>,
        link: Option<String>,
    ) -> ImageBlock {
        let id = self.block_ids.next(BlockId::from_raw);
        ImageBlock::new(id, source.into(), link)
    }

    pub fn append_block(
        &mut self,
        placeholder: PlaceholderId,
        block: ImageBlock,
    ) -> Option<BlockId> {
        let id = block.id();
        if self.locate(id).is_some() {
            return None;
        }
        let placeholder = self.placeholder_mut(placeholder)?;
        placeholder.blocks.push(block);
        Some(id)
    }

    /// Remove a block, clearing its placeholder's small flag if it was the
    /// last one.
    pub fn remove_block(&mut self, block: BlockId) -> Option<ImageBlock> {
        let (placeholder, index) = self.locate(block)?;
        let placeholder = self.placeholder_mut(placeholder)?;
        let removed = placeholder.blocks.remove(index);
        if placeholder.blocks.is_empty() {
            placeholder.small = false;
        }
        Some(removed)
    }

    /// Move `block` from `from` to `to`, landing at `index` in the
    /// destination sequence as it is once the block has left the source.
    /// `index` is clamped to the destination's length. `from` and `to` may
    /// be the same placeholder.
    ///
    /// Returns the index the block ended up at, or `None` (nothing moved)
    /// if the block is not in `from` or `to` does not exist.
    pub fn move_block(
        &mut self,
        block: BlockId,
        from: PlaceholderId,
        to: PlaceholderId,
        index: usize,
    ) -> Option<usize> {
        let (source, source_index) = self.locate(block)?;
        if source != from {
            return None;
        }
        let target = self.position_of(to)?;
        let source = self.position_of(from)?;

        let moved = self.placeholders[source].blocks.remove(source_index);
        if self.placeholders[source].blocks.is_empty() {
            self.placeholders[source].small = false;
        }
        let blocks = &mut self.placeholders[target].blocks;
        let index = index.min(blocks.len());
        blocks.insert(index, moved);
        Some(index)
    }

    /// Setting a placeholder without blocks to small is ignored.
    pub fn set_small(
        &mut self,
        placeholder: PlaceholderId,
        small: bool,
    ) -> bool {
        let Some(placeholder) = self.placeholder_mut(placeholder) else {
            return false;
        };
        placeholder.small = small && !placeholder.blocks.is_empty();
        true
    }

    /// The placeholder holding `block` and its index among its siblings.
    pub fn locate(&self, block: BlockId) -> Option<(PlaceholderId, usize)> {
        self.placeholders.iter().find_map(|p| {
            p.index_of(block).map(|index| (p.id(), index))
        })
    }

    pub fn block(&self, block: BlockId) -> Option<&ImageBlock> {
        let (placeholder, index) = self.locate(block)?;
        self.placeholder(placeholder)?.blocks.get(index)
    }

    pub(crate) fn block_mut(
        &mut self,
        block: BlockId,
    ) -> Option<&mut ImageBlock> {
        let (placeholder, index) = self.locate(block)?;
        self.placeholder_mut(placeholder)?.blocks.get_mut(index)
    }

    pub(crate) fn blocks_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut ImageBlock> {
        self.placeholders.iter_mut().flat_map(|p| p.blocks.iter_mut())
    }

    pub(crate) fn push_notice(
        &mut self,
        placeholder: PlaceholderId,
        message: &str,
    ) -> Option<NoticeId> {
        let id = self.notice_ids.next(NoticeId::from_raw);
        let placeholder = self.placeholder_mut(placeholder)?;
        placeholder.notices.push(ErrorNotice {
            id,
            message: message.to_owned(),
        });
        Some(id)
    }

    fn position_of(&self, id: PlaceholderId) -> Option<usize> {
        self.placeholders.iter().position(|p| p.id() == id)
    }
}
