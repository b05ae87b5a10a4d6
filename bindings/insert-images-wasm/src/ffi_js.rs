// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Moving plain values in and out of JavaScript objects.

use js_sys::{Array, Object, Reflect, Uint8Array};
use tracing::warn;
use wasm_bindgen::prelude::*;

use insert_images::upload::{PayloadPart, UploadRequest};
use insert_images::UploadFile;

pub(crate) fn set(target: &Object, key: &str, value: impl Into<JsValue>) {
    // Setting a fresh property on a plain object cannot throw.
    let _ = Reflect::set(target, &JsValue::from_str(key), &value.into());
}

fn get_string(source: &JsValue, key: &str) -> Option<String> {
    Reflect::get(source, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_string())
}

pub(crate) fn strings(values: &[String]) -> Array {
    values.iter().map(|s| JsValue::from_str(s)).collect()
}

/// Read `{ name, type, bytes }` objects. `bytes` is a `Uint8Array`.
/// Entries missing a field are skipped.
pub(crate) fn files_from_js(files: &Array) -> Vec<UploadFile> {
    files
        .iter()
        .filter_map(|entry| {
            let name = get_string(&entry, "name");
            let media_type = get_string(&entry, "type");
            let bytes = Reflect::get(&entry, &JsValue::from_str("bytes"))
                .ok()
                .filter(|b| b.is_instance_of::<Uint8Array>())
                .map(|b| Uint8Array::new(&b).to_vec());
            match (name, media_type, bytes) {
                (Some(name), Some(media_type), Some(bytes)) => {
                    Some(UploadFile::new(name, media_type, bytes))
                }
                _ => {
                    warn!("skipping malformed file entry");
                    None
                }
            }
        })
        .collect()
}

/// The request handed to the page's upload callback:
/// `{ task, placeholder, fileName, parts: [...] }`.
pub(crate) fn upload_request_to_js(request: &UploadRequest) -> Object {
    let parts: Array = request
        .payload
        .parts
        .iter()
        .map(|part| {
            let obj = Object::new();
            match part {
                PayloadPart::File {
                    field,
                    file_name,
                    media_type,
                    bytes,
                } => {
                    set(&obj, "field", field.as_str());
                    set(&obj, "fileName", file_name.as_str());
                    set(&obj, "type", media_type.as_str());
                    set(&obj, "bytes", Uint8Array::from(bytes.as_slice()));
                }
                PayloadPart::Text { field, value } => {
                    set(&obj, "field", field.as_str());
                    set(&obj, "value", value.as_str());
                }
            }
            JsValue::from(obj)
        })
        .collect();

    let obj = Object::new();
    set(&obj, "task", request.task.raw());
    set(&obj, "placeholder", request.placeholder.raw());
    set(&obj, "fileName", request.file_name.as_str());
    set(&obj, "parts", parts);
    obj
}
