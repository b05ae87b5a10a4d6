// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::debug;

use super::ImagesAddon;
use crate::markup::{find_placeholders, render_placeholders};
use crate::registry::PlaceholderId;
use crate::AddonUpdate;

impl ImagesAddon {
    /// Take over image figures already present in the host's content, one
    /// placeholder per group of figures sharing a container.
    ///
    /// The host should replace those containers with [`Self::to_html`]
    /// output for the returned placeholders.
    pub fn adopt_markup(
        &mut self,
        html: &str,
    ) -> (Vec<PlaceholderId>, AddonUpdate) {
        let found = find_placeholders(html);
        if found.is_empty() {
            return (Vec::new(), AddonUpdate::keep());
        }

        let mut adopted = Vec::with_capacity(found.len());
        for group in found {
            let id = self.registry.create_placeholder();
            for image in group.images {
                let block = self.registry.new_block(image.source, image.link);
                self.registry.append_block(id, block);
            }
            if let Some(placeholder) = self.registry.placeholder_mut(id) {
                placeholder.dom_id = group.dom_id;
            }
            self.registry.set_small(id, group.small);
            adopted.push(id);
        }
        debug!(count = adopted.len(), "adopted existing images");
        (adopted, AddonUpdate::changed())
    }

    /// Markup for every managed placeholder, in creation order.
    pub fn to_html(&self) -> String {
        render_placeholders(self.registry.placeholders())
    }

    pub fn placeholder_html(
        &self,
        placeholder: PlaceholderId,
    ) -> Option<String> {
        self.registry
            .placeholder(placeholder)
            .map(|p| render_placeholders([p]))
    }
}
