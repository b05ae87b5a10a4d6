// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The state of one in-progress drag of an image block.

use crate::registry::{BlockId, PlaceholderId};

/// What a drop at the current pointer position would do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropIntent {
    #[default]
    None,
    /// Reorder inside the origin placeholder.
    Sort,
    /// Move into another placeholder.
    Move,
    /// The drag carries files; dropping uploads them.
    FileDrop,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragSession {
    origin_placeholder: PlaceholderId,
    origin_index: usize,
    block: BlockId,
    intent: DropIntent,
}

impl DragSession {
    pub(crate) fn new(
        origin_placeholder: PlaceholderId,
        origin_index: usize,
        block: BlockId,
    ) -> Self {
        Self {
            origin_placeholder,
            origin_index,
            block,
            intent: DropIntent::None,
        }
    }

    pub fn origin_placeholder(&self) -> PlaceholderId {
        self.origin_placeholder
    }

    /// Index of the block when the drag started. Sorting uses the block's
    /// index at drop time, which differs if the placeholder changed.
    pub fn origin_index(&self) -> usize {
        self.origin_index
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    /// Drop-zone feedback for the host while dragging. Drops are decided
    /// from the payload and the drop target, never from this.
    pub fn intent(&self) -> DropIntent {
        self.intent
    }

    /// Track the drop zone under the pointer.
    pub(crate) fn entered(
        &mut self,
        placeholder: PlaceholderId,
        carries_files: bool,
    ) {
        self.intent = if carries_files {
            DropIntent::FileDrop
        } else if placeholder == self.origin_placeholder {
            DropIntent::Sort
        } else {
            DropIntent::Move
        };
    }

    pub(crate) fn left(&mut self) {
        self.intent = DropIntent::None;
    }
}

/// Where a block dropped onto a sibling goes, relative to that sibling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortPlacement {
    /// Dragged forward: lands right after the target.
    After,
    /// Dragged backward: lands right before the target.
    Before,
    Unchanged,
}

impl SortPlacement {
    pub fn resolve(origin: usize, target: usize) -> Self {
        match origin.cmp(&target) {
            std::cmp::Ordering::Less => Self::After,
            std::cmp::Ordering::Greater => Self::Before,
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }
}

/// Handed from the addon that accepted a dropped block to the `drag_end`
/// of the addon the drag started in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveReceipt {
    /// The block moved between two placeholders of one addon. The move is
    /// already complete; `drag_end` has nothing left to do.
    Transferred { block: BlockId },
    /// Another addon built `block` from the drag payload. The origin must
    /// drop its own copy.
    Adopted { block: BlockId },
}
