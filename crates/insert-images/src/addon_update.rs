// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! What a call into the addon changed, reported back to the host.
//!
//! Every entry point on [`crate::ImagesAddon`] that can affect the
//! document returns an [`AddonUpdate`]. The host inspects it to decide
//! whether to re-derive its own document state, drop its text selection,
//! redraw the managed markup or perform a host-side action.

use strum_macros::AsRefStr;

use crate::registry::{BlockId, NoticeId, PlaceholderId};
use crate::upload::TaskId;
use crate::LinkSessionId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentUpdate {
    Keep,
    /// The managed content changed; the host should treat it like an
    /// edit (the source addon fired `keyup` and `input`).
    Changed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionUpdate {
    Keep,
    /// Drop any active text selection in the host editor.
    Deselect,
}

/// Something only the host can do.
#[derive(Clone, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum HostAction {
    /// Open a multi-file picker; chosen files go to
    /// [`crate::ImagesAddon::submit`] for `placeholder`.
    OpenFilePicker {
        placeholder: PlaceholderId,
        accept: Vec<String>,
    },
    /// Show the link micro-form for `session` and focus its text field.
    ShowLinkForm {
        session: LinkSessionId,
        placeholder: PlaceholderId,
        placeholder_text: String,
    },
    HideLinkForm { session: LinkSessionId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Inserted(BlockId),
    Failed(NoticeId),
}

/// Terminal outcome of one upload task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedUpload {
    pub task: TaskId,
    pub placeholder: PlaceholderId,
    pub outcome: UploadOutcome,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddonUpdate {
    pub content: ContentUpdate,
    pub selection: SelectionUpdate,
    /// The managed markup looks different (progress, hover icons, notices)
    /// even if the content did not change.
    pub redraw: bool,
    pub actions: Vec<HostAction>,
    pub completed_uploads: Vec<CompletedUpload>,
}

impl AddonUpdate {
    pub fn keep() -> Self {
        Self {
            content: ContentUpdate::Keep,
            selection: SelectionUpdate::Keep,
            redraw: false,
            actions: Vec::new(),
            completed_uploads: Vec::new(),
        }
    }

    pub fn changed() -> Self {
        Self {
            content: ContentUpdate::Changed,
            redraw: true,
            ..Self::keep()
        }
    }

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::keep()
        }
    }

    pub fn deselecting(mut self) -> Self {
        self.selection = SelectionUpdate::Deselect;
        self
    }

    pub fn with_action(mut self, action: HostAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn is_changed(&self) -> bool {
        self.content == ContentUpdate::Changed
    }

    /// Fold `other` into `self`, as if both had been reported by one call.
    pub fn merge(mut self, other: AddonUpdate) -> Self {
        if other.content == ContentUpdate::Changed {
            self.content = ContentUpdate::Changed;
        }
        if other.selection == SelectionUpdate::Deselect {
            self.selection = SelectionUpdate::Deselect;
        }
        self.redraw |= other.redraw;
        self.actions.extend(other.actions);
        self.completed_uploads.extend(other.completed_uploads);
        self
    }
}

impl Default for AddonUpdate {
    fn default() -> Self {
        Self::keep()
    }
}
