// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{BlockId, ImageBlock, NoticeId, PlaceholderId};
use crate::upload::TaskId;

pub const UPLOAD_FAILED_MESSAGE: &str =
    "There was a problem uploading the file.";

/// Determinate progress bar for one in-flight upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub task: TaskId,
    /// 0 to 100 inclusive.
    pub percent: u8,
}

/// Transient message left behind by a failed upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorNotice {
    pub id: NoticeId,
    pub message: String,
}

/// A drop zone bound to one insertion point in the host document.
///
/// `blocks` is kept in display order. Progress indicators and notices are
/// rendered after the blocks, in the order they were added.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    id: PlaceholderId,
    /// `id` attribute of the container in the host markup, when the
    /// placeholder was adopted from existing content.
    pub(crate) dom_id: Option<String>,
    pub(crate) blocks: Vec<ImageBlock>,
    pub(crate) small: bool,
    pub(crate) drop_hover: bool,
    pub(crate) progress: Vec<ProgressIndicator>,
    pub(crate) notices: Vec<ErrorNotice>,
}

impl Placeholder {
    pub(crate) fn new(id: PlaceholderId) -> Self {
        Self {
            id,
            dom_id: None,
            blocks: Vec::new(),
            small: false,
            drop_hover: false,
            progress: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn id(&self) -> PlaceholderId {
        self.id
    }

    /// The container's `id` in rendered markup.
    pub fn dom_id(&self) -> String {
        self.dom_id
            .clone()
            .unwrap_or_else(|| format!("mediumInsert-{}", self.id))
    }

    pub fn blocks(&self) -> &[ImageBlock] {
        &self.blocks
    }

    pub fn block_ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(ImageBlock::id).collect()
    }

    pub fn is_small(&self) -> bool {
        self.small
    }

    pub fn is_drop_hover(&self) -> bool {
        self.drop_hover
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn progress(&self) -> &[ProgressIndicator] {
        &self.progress
    }

    pub fn notices(&self) -> &[ErrorNotice] {
        &self.notices
    }

    pub fn index_of(&self, block: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == block)
    }

    pub(crate) fn progress_mut(
        &mut self,
        task: TaskId,
    ) -> Option<&mut ProgressIndicator> {
        self.progress.iter_mut().find(|p| p.task == task)
    }

    pub(crate) fn remove_progress(&mut self, task: TaskId) -> bool {
        let before = self.progress.len();
        self.progress.retain(|p| p.task != task);
        self.progress.len() != before
    }

    pub(crate) fn remove_notice(&mut self, notice: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != notice);
        self.notices.len() != before
    }
}
