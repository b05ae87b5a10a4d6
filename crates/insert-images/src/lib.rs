// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Image blocks for a rich-text editor: uploading, reordering, resizing,
//! linking and removing images placed inline in editable content.
//!
//! The host owns the document and the rendering surface. It forwards user
//! events to an [`ImagesAddon`] and applies the [`AddonUpdate`] each call
//! returns.

mod addon_update;
mod config;
mod drag_session;
mod error;
mod ids;
mod images_addon;
mod link_session;
mod markup;
mod media_type;
pub mod registry;
mod scheduler;
pub mod upload;

pub use crate::addon_update::{
    AddonUpdate, CompletedUpload, ContentUpdate, HostAction, SelectionUpdate,
    UploadOutcome,
};
pub use crate::config::ImagesConfig;
pub use crate::drag_session::{
    DragSession, DropIntent, MoveReceipt, SortPlacement,
};
pub use crate::error::{ImagesError, ImagesResult};
pub use crate::ids::LinkSessionId;
pub use crate::images_addon::{
    DropOutcome, DropPayload, DropResult, EnabledSwitch, HoverIcon,
    ImagesAddon, ImagesAddonBuilder, LINK_BLUR_DEBOUNCE, NOTICE_DISMISS_DELAY,
};
pub use crate::link_session::LinkSession;
pub use crate::media_type::ImageMediaType;
pub use crate::registry::{
    BlockId, ImageBlock, LinkState, NoticeId, Placeholder, PlaceholderId,
};
pub use crate::upload::{TaskId, UploadEvent, UploadFile};
