// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! JavaScript bindings for the insert-images controller.
//!
//! Ids cross the boundary as plain numbers. Uploads and deletes are
//! performed by JavaScript callbacks given to the constructor; the page
//! reports upload progress and completion back through
//! `uploadProgress` and `uploadComplete`.

use std::sync::Once;

use wasm_bindgen::prelude::*;

mod ffi_addon_update;
mod ffi_images_addon;
mod ffi_js;

pub use crate::ffi_addon_update::{
    AddonUpdate, AdoptedMarkup, DropResult, MoveReceipt,
};
pub use crate::ffi_images_addon::{EnabledSwitch, ImagesAddon};

static LOGGING: Once = Once::new();

/// Route panics and `tracing` output to the browser console. Safe to call
/// more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    LOGGING.call_once(|| {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    });
}
