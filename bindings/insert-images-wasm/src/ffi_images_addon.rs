// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::time::Duration;

use js_sys::{Array, Function};
use tracing::warn;
use wasm_bindgen::prelude::*;

use insert_images::upload::{UploadRequest, UploadSink};
use insert_images::{
    BlockId, DropPayload, ImagesConfig, LinkSessionId, PlaceholderId,
    TaskId, UploadEvent,
};

use crate::ffi_addon_update::{
    AddonUpdate, AdoptedMarkup, DropResult, MoveReceipt,
};
use crate::ffi_js::{files_from_js, upload_request_to_js};

/// Turns every addon sharing it on or off at once.
#[wasm_bindgen]
#[derive(Clone, Default)]
pub struct EnabledSwitch {
    inner: insert_images::EnabledSwitch,
}

#[wasm_bindgen]
impl EnabledSwitch {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, enabled: bool) {
        self.inner.set(enabled);
    }

    #[wasm_bindgen(getter)]
    pub fn enabled(&self) -> bool {
        self.inner.is_enabled()
    }
}

#[wasm_bindgen]
pub struct ImagesAddon {
    inner: insert_images::ImagesAddon,
}

#[wasm_bindgen]
impl ImagesAddon {
    /// `config` is the addon's JSON options. `upload` is called with one
    /// request object per accepted file; `remove` with the source of a
    /// removed image.
    ///
    /// Both are called while the addon is borrowed, so `upload` must
    /// report progress and completion asynchronously.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config: &str,
        switch: &EnabledSwitch,
        upload: Function,
        remove: Function,
    ) -> Result<ImagesAddon, JsError> {
        let config = ImagesConfig::from_json(config)?;
        let upload_transport =
            move |request: UploadRequest, _sink: UploadSink| {
                let request = upload_request_to_js(&request);
                if let Err(err) = upload.call1(&JsValue::NULL, &request) {
                    warn!(?err, "upload callback threw");
                }
            };
        let delete_transport = move |source: &str| {
            let source = JsValue::from_str(source);
            if let Err(err) = remove.call1(&JsValue::NULL, &source) {
                warn!(?err, "delete callback threw");
            }
        };
        let inner = insert_images::ImagesAddon::builder(config)
            .enabled_switch(switch.inner.clone())
            .upload_transport(upload_transport)
            .delete_transport(delete_transport)
            .build()?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(js_name = insertPlaceholder)]
    pub fn insert_placeholder(&mut self) -> u32 {
        self.inner.insert_placeholder().raw()
    }

    #[wasm_bindgen(js_name = removePlaceholder)]
    pub fn remove_placeholder(&mut self, placeholder: u32) -> AddonUpdate {
        self.inner
            .remove_placeholder(PlaceholderId::from_raw(placeholder))
            .into()
    }

    #[wasm_bindgen(js_name = addImage)]
    pub fn add_image(&mut self, placeholder: u32) -> AddonUpdate {
        self.inner
            .add_image(PlaceholderId::from_raw(placeholder))
            .into()
    }

    /// Files chosen in the picker, as `{ name, type, bytes }` objects.
    pub fn submit(&mut self, placeholder: u32, files: &Array) -> AddonUpdate {
        self.inner
            .submit(PlaceholderId::from_raw(placeholder), files_from_js(files))
            .into()
    }

    #[wasm_bindgen(js_name = uploadProgress)]
    pub fn upload_progress(&mut self, task: u32, fraction: f64) -> AddonUpdate {
        self.inner
            .handle_upload_event(UploadEvent::Progress {
                task: TaskId::from_raw(task),
                fraction,
            })
            .into()
    }

    /// `result` is the stored image's source, or nothing on failure.
    #[wasm_bindgen(js_name = uploadComplete)]
    pub fn upload_complete(
        &mut self,
        task: u32,
        result: Option<String>,
    ) -> AddonUpdate {
        self.inner
            .handle_upload_event(UploadEvent::Complete {
                task: TaskId::from_raw(task),
                result,
            })
            .into()
    }

    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) -> AddonUpdate {
        match elapsed(dt_ms) {
            Some(by) => self.inner.advance_time(by).into(),
            None => insert_images::AddonUpdate::keep().into(),
        }
    }

    /// Returns the markup for the drag data, or nothing if the drag is
    /// refused.
    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, block: u32) -> Option<String> {
        self.inner.drag_start(BlockId::from_raw(block))
    }

    #[wasm_bindgen(js_name = dragEnter)]
    pub fn drag_enter(
        &mut self,
        placeholder: u32,
        carries_files: bool,
    ) -> AddonUpdate {
        self.inner
            .drag_enter(PlaceholderId::from_raw(placeholder), carries_files)
            .into()
    }

    #[wasm_bindgen(js_name = dragLeave)]
    pub fn drag_leave(&mut self, placeholder: u32) -> AddonUpdate {
        self.inner
            .drag_leave(PlaceholderId::from_raw(placeholder))
            .into()
    }

    #[wasm_bindgen(js_name = dropMarkupOnBlock)]
    pub fn drop_markup_on_block(
        &mut self,
        block: u32,
        markup: String,
    ) -> DropResult {
        self.inner
            .drop_on_block(
                BlockId::from_raw(block),
                DropPayload::Markup(markup),
            )
            .into()
    }

    #[wasm_bindgen(js_name = dropFilesOnBlock)]
    pub fn drop_files_on_block(
        &mut self,
        block: u32,
        files: &Array,
    ) -> DropResult {
        let payload = DropPayload::Files(files_from_js(files));
        self.inner
            .drop_on_block(BlockId::from_raw(block), payload)
            .into()
    }

    #[wasm_bindgen(js_name = dropMarkupOnPlaceholder)]
    pub fn drop_markup_on_placeholder(
        &mut self,
        placeholder: u32,
        markup: String,
    ) -> DropResult {
        self.inner
            .drop_on_placeholder(
                PlaceholderId::from_raw(placeholder),
                DropPayload::Markup(markup),
            )
            .into()
    }

    #[wasm_bindgen(js_name = dropFilesOnPlaceholder)]
    pub fn drop_files_on_placeholder(
        &mut self,
        placeholder: u32,
        files: &Array,
    ) -> DropResult {
        let payload = DropPayload::Files(files_from_js(files));
        self.inner
            .drop_on_placeholder(PlaceholderId::from_raw(placeholder), payload)
            .into()
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) -> AddonUpdate {
        self.inner.drag_end(None).into()
    }

    /// Finish a drag whose block was taken by a drop elsewhere.
    #[wasm_bindgen(js_name = dragEndWithReceipt)]
    pub fn drag_end_with_receipt(
        &mut self,
        receipt: &MoveReceipt,
    ) -> AddonUpdate {
        self.inner.drag_end(Some(receipt.inner)).into()
    }

    /// CSS classes of the icons to show over `block`.
    #[wasm_bindgen(js_name = hoverEnter)]
    pub fn hover_enter(&mut self, block: u32) -> Vec<String> {
        self.inner
            .hover_enter(BlockId::from_raw(block))
            .into_iter()
            .map(|icon| icon.as_ref().to_owned())
            .collect()
    }

    #[wasm_bindgen(js_name = hoverExit)]
    pub fn hover_exit(&mut self, block: u32) {
        self.inner.hover_exit(BlockId::from_raw(block));
    }

    #[wasm_bindgen(js_name = resizeSmaller)]
    pub fn resize_smaller(&mut self, block: u32) -> AddonUpdate {
        self.inner.resize_smaller(BlockId::from_raw(block)).into()
    }

    #[wasm_bindgen(js_name = resizeBigger)]
    pub fn resize_bigger(&mut self, block: u32) -> AddonUpdate {
        self.inner.resize_bigger(BlockId::from_raw(block)).into()
    }

    #[wasm_bindgen(js_name = removeBlock)]
    pub fn remove_block(&mut self, block: u32) -> AddonUpdate {
        self.inner.remove_block(BlockId::from_raw(block)).into()
    }

    #[wasm_bindgen(js_name = openLinkEditor)]
    pub fn open_link_editor(&mut self, block: u32) -> AddonUpdate {
        self.inner.open_link_editor(BlockId::from_raw(block)).into()
    }

    #[wasm_bindgen(js_name = linkInput)]
    pub fn link_input(&mut self, session: u32, text: &str) -> AddonUpdate {
        self.inner
            .link_input(LinkSessionId::from_raw(session), text)
            .into()
    }

    #[wasm_bindgen(js_name = linkPaste)]
    pub fn link_paste(&mut self, session: u32, text: &str) -> AddonUpdate {
        self.inner
            .link_paste(LinkSessionId::from_raw(session), text)
            .into()
    }

    #[wasm_bindgen(js_name = linkKeyPress)]
    pub fn link_key_press(&mut self, session: u32, key: &str) -> AddonUpdate {
        self.inner
            .link_key_press(LinkSessionId::from_raw(session), key)
            .into()
    }

    #[wasm_bindgen(js_name = linkSave)]
    pub fn link_save(&mut self, session: u32) -> AddonUpdate {
        self.inner.link_save(LinkSessionId::from_raw(session)).into()
    }

    #[wasm_bindgen(js_name = linkBlur)]
    pub fn link_blur(&mut self, session: u32) -> AddonUpdate {
        self.inner.link_blur(LinkSessionId::from_raw(session)).into()
    }

    #[wasm_bindgen(js_name = linkFocus)]
    pub fn link_focus(&mut self, session: u32) -> AddonUpdate {
        self.inner.link_focus(LinkSessionId::from_raw(session)).into()
    }

    #[wasm_bindgen(js_name = cancelLink)]
    pub fn cancel_link(&mut self, session: u32) -> AddonUpdate {
        self.inner.cancel_link(LinkSessionId::from_raw(session)).into()
    }

    pub fn unlink(&mut self, block: u32) -> AddonUpdate {
        self.inner.unlink(BlockId::from_raw(block)).into()
    }

    /// Ids of the blocks in `placeholder`, in display order.
    pub fn blocks(&self, placeholder: u32) -> Vec<u32> {
        self.inner
            .placeholder(PlaceholderId::from_raw(placeholder))
            .map(|p| p.blocks().iter().map(|b| b.id().raw()).collect())
            .unwrap_or_default()
    }

    /// Take over figures already in the editor. Call `toHtml` or
    /// `placeholderHtml` to redraw the adopted placeholders.
    #[wasm_bindgen(js_name = adoptMarkup)]
    pub fn adopt_markup(&mut self, html: &str) -> AdoptedMarkup {
        self.inner.adopt_markup(html).into()
    }

    #[wasm_bindgen(js_name = toHtml)]
    pub fn to_html(&self) -> String {
        self.inner.to_html()
    }

    #[wasm_bindgen(js_name = placeholderHtml)]
    pub fn placeholder_html(&self, placeholder: u32) -> Option<String> {
        self.inner
            .placeholder_html(PlaceholderId::from_raw(placeholder))
    }
}

/// Milliseconds from the page as a clock step. Steps that are not a
/// positive, representable duration are dropped.
fn elapsed(dt_ms: f64) -> Option<Duration> {
    if dt_ms.is_nan() || dt_ms <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(dt_ms / 1000.0).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_steps_are_converted_from_milliseconds() {
        assert_eq!(elapsed(250.0), Some(Duration::from_millis(250)));
        assert_eq!(elapsed(0.0), None);
        assert_eq!(elapsed(-5.0), None);
        assert_eq!(elapsed(f64::NAN), None);
        assert_eq!(elapsed(f64::INFINITY), None);
        assert_eq!(elapsed(1e300), None);
    }
}
