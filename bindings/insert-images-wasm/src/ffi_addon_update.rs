// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use js_sys::{Array, Object};
use wasm_bindgen::prelude::*;

use insert_images::{
    CompletedUpload, DropOutcome, HostAction, PlaceholderId, UploadOutcome,
};

use crate::ffi_js::{set, strings};

#[wasm_bindgen]
pub struct AddonUpdate {
    inner: insert_images::AddonUpdate,
}

impl From<insert_images::AddonUpdate> for AddonUpdate {
    fn from(inner: insert_images::AddonUpdate) -> Self {
        Self { inner }
    }
}

#[wasm_bindgen]
impl AddonUpdate {
    /// Treat this like an edit: fire the editor's change handlers.
    #[wasm_bindgen(getter, js_name = contentChanged)]
    pub fn content_changed(&self) -> bool {
        self.inner.is_changed()
    }

    #[wasm_bindgen(getter)]
    pub fn deselect(&self) -> bool {
        self.inner.selection == insert_images::SelectionUpdate::Deselect
    }

    #[wasm_bindgen(getter)]
    pub fn redraw(&self) -> bool {
        self.inner.redraw
    }

    /// `{ kind, ... }` objects; `kind` is one of `open-file-picker`,
    /// `show-link-form` or `hide-link-form`.
    #[wasm_bindgen(getter)]
    pub fn actions(&self) -> Array {
        self.inner.actions.iter().map(action_to_js).collect()
    }

    /// `{ task, placeholder, block }` or `{ task, placeholder, notice }`.
    #[wasm_bindgen(getter, js_name = completedUploads)]
    pub fn completed_uploads(&self) -> Array {
        self.inner
            .completed_uploads
            .iter()
            .map(completed_to_js)
            .collect()
    }
}

fn action_to_js(action: &HostAction) -> JsValue {
    let obj = Object::new();
    set(&obj, "kind", action.as_ref());
    match action {
        HostAction::OpenFilePicker {
            placeholder,
            accept,
        } => {
            set(&obj, "placeholder", placeholder.raw());
            set(&obj, "accept", strings(accept));
        }
        HostAction::ShowLinkForm {
            session,
            placeholder,
            placeholder_text,
        } => {
            set(&obj, "session", session.raw());
            set(&obj, "placeholder", placeholder.raw());
            set(&obj, "placeholderText", placeholder_text.as_str());
        }
        HostAction::HideLinkForm { session } => {
            set(&obj, "session", session.raw());
        }
    }
    obj.into()
}

fn completed_to_js(completed: &CompletedUpload) -> JsValue {
    let obj = Object::new();
    set(&obj, "task", completed.task.raw());
    set(&obj, "placeholder", completed.placeholder.raw());
    match completed.outcome {
        UploadOutcome::Inserted(block) => set(&obj, "block", block.raw()),
        UploadOutcome::Failed(notice) => set(&obj, "notice", notice.raw()),
    }
    obj.into()
}

/// The result of `adoptMarkup`.
#[wasm_bindgen]
pub struct AdoptedMarkup {
    placeholders: Vec<u32>,
    update: insert_images::AddonUpdate,
}

type Adopted = (Vec<PlaceholderId>, insert_images::AddonUpdate);

impl From<Adopted> for AdoptedMarkup {
    fn from((placeholders, update): Adopted) -> Self {
        Self {
            placeholders: placeholders.into_iter().map(|p| p.raw()).collect(),
            update,
        }
    }
}

#[wasm_bindgen]
impl AdoptedMarkup {
    /// Ids of the new placeholders, in document order.
    #[wasm_bindgen(getter)]
    pub fn placeholders(&self) -> Vec<u32> {
        self.placeholders.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn update(&self) -> AddonUpdate {
        self.update.clone().into()
    }
}

/// Proof that a drop took a block. Pass it to the origin addon's
/// `dragEnd`.
#[wasm_bindgen]
#[derive(Clone, Copy)]
pub struct MoveReceipt {
    pub(crate) inner: insert_images::MoveReceipt,
}

#[wasm_bindgen]
pub struct DropResult {
    update: insert_images::AddonUpdate,
    outcome: DropOutcome,
}

impl From<insert_images::DropResult> for DropResult {
    fn from(result: insert_images::DropResult) -> Self {
        Self {
            update: result.update,
            outcome: result.outcome,
        }
    }
}

#[wasm_bindgen]
impl DropResult {
    #[wasm_bindgen(getter)]
    pub fn update(&self) -> AddonUpdate {
        self.update.clone().into()
    }

    /// `ignored`, `sorted`, `uploading` or `moved`.
    #[wasm_bindgen(getter)]
    pub fn outcome(&self) -> String {
        match self.outcome {
            DropOutcome::Ignored => "ignored",
            DropOutcome::Sorted => "sorted",
            DropOutcome::Uploading(_) => "uploading",
            DropOutcome::Moved(_) => "moved",
        }
        .to_owned()
    }

    /// Upload tasks started by a file drop.
    #[wasm_bindgen(getter)]
    pub fn tasks(&self) -> Vec<u32> {
        match &self.outcome {
            DropOutcome::Uploading(tasks) => {
                tasks.iter().map(|t| t.raw()).collect()
            }
            _ => Vec::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn receipt(&self) -> Option<MoveReceipt> {
        match self.outcome {
            DropOutcome::Moved(inner) => Some(MoveReceipt { inner }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopted_markup_keeps_the_update() {
        let adopted = AdoptedMarkup::from((
            vec![PlaceholderId::from_raw(3), PlaceholderId::from_raw(4)],
            insert_images::AddonUpdate::changed(),
        ));
        assert_eq!(adopted.placeholders(), vec![3, 4]);
        assert!(adopted.update().content_changed());
        assert!(adopted.update().redraw());
    }
}
