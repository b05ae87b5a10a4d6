// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::RefCell;
use std::rc::Rc;

use super::{EnabledSwitch, ImagesAddon};
use crate::registry::{BlockId, PlaceholderId};
use crate::upload::{UploadFile, UploadRequest, UploadSink};
use crate::ImagesConfig;

/// What the in-memory transports were asked to do.
#[derive(Clone, Default)]
pub(crate) struct Recorded {
    pub(crate) uploads: Rc<RefCell<Vec<(UploadRequest, UploadSink)>>>,
    pub(crate) deletes: Rc<RefCell<Vec<String>>>,
}

impl Recorded {
    pub(crate) fn progress(&self, index: usize, fraction: f64) {
        self.uploads.borrow()[index].1.progress(fraction);
    }

    pub(crate) fn complete(&self, index: usize, result: Option<&str>) {
        let sink = self.uploads.borrow()[index].1.clone();
        sink.complete(result.map(str::to_owned));
    }
}

pub(crate) fn addon(switch: EnabledSwitch) -> (ImagesAddon, Recorded) {
    let recorded = Recorded::default();
    let uploads = Rc::clone(&recorded.uploads);
    let deletes = Rc::clone(&recorded.deletes);
    let addon = ImagesAddon::builder(ImagesConfig::default())
        .upload_transport(move |request: UploadRequest, sink: UploadSink| {
            uploads.borrow_mut().push((request, sink));
        })
        .delete_transport(move |source: &str| {
            deletes.borrow_mut().push(source.to_owned());
        })
        .enabled_switch(switch)
        .build()
        .unwrap();
    (addon, recorded)
}

pub(crate) fn png(name: &str) -> UploadFile {
    UploadFile::new(format!("{name}.png"), "image/png", vec![0; 8])
}

/// A placeholder holding one uploaded block per source, in order.
pub(crate) fn with_images(
    addon: &mut ImagesAddon,
    sources: &[&str],
) -> (PlaceholderId, Vec<BlockId>) {
    let placeholder = addon.insert_placeholder();
    let blocks = sources
        .iter()
        .map(|source| {
            let block = addon.registry.new_block(*source, None);
            addon.registry.append_block(placeholder, block).unwrap()
        })
        .collect();
    (placeholder, blocks)
}

pub(crate) fn sources(
    addon: &ImagesAddon,
    placeholder: PlaceholderId,
) -> Vec<String> {
    addon
        .placeholder(placeholder)
        .unwrap()
        .blocks()
        .iter()
        .map(|b| b.source().to_owned())
        .collect()
}
