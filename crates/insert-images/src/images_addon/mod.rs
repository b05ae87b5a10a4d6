// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The controller coordinating uploads, drag and drop and link editing.
//!
//! [`ImagesAddon`] owns the registry and every session. Its methods are
//! called from the host's event loop, one at a time, and each returns an
//! [`crate::AddonUpdate`] describing what the host has to do next. None of
//! them fail: calls naming something that no longer exists are logged and
//! ignored.

mod base;
mod content;
mod drag_drop;
mod hover;
mod links;
#[cfg(test)]
mod testutils;
mod uploads;

pub use base::{
    EnabledSwitch, ImagesAddon, ImagesAddonBuilder, LINK_BLUR_DEBOUNCE,
    NOTICE_DISMISS_DELAY,
};
pub use drag_drop::{DropOutcome, DropPayload, DropResult};
pub use hover::HoverIcon;
