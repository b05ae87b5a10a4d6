// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Reordering inside a placeholder and moving blocks between them.
//!
//! A drag starts on a block ([`ImagesAddon::drag_start`]) and is always
//! finished by [`ImagesAddon::drag_end`] on the same addon. In between,
//! the host reports drops on blocks or placeholders, possibly on another
//! addon. A drop that moves a block out of this addon returns a
//! [`MoveReceipt`] which the host passes to the origin's `drag_end`.

use tracing::{debug, warn};

use super::ImagesAddon;
use crate::drag_session::{DragSession, MoveReceipt, SortPlacement};
use crate::markup::{find_dropped_image, render_block};
use crate::registry::{BlockId, PlaceholderId};
use crate::upload::{TaskId, UploadFile};
use crate::AddonUpdate;

/// What was dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropPayload {
    Files(Vec<UploadFile>),
    /// The HTML drag data, e.g. what [`ImagesAddon::drag_start`] returned.
    Markup(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Ignored,
    /// Reordered inside one placeholder (possibly onto itself).
    Sorted,
    Uploading(Vec<TaskId>),
    Moved(MoveReceipt),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropResult {
    pub update: AddonUpdate,
    pub outcome: DropOutcome,
}

impl DropResult {
    fn ignored() -> Self {
        Self {
            update: AddonUpdate::keep(),
            outcome: DropOutcome::Ignored,
        }
    }
}

impl ImagesAddon {
    pub(crate) fn drag_and_drop_enabled(&self) -> bool {
        self.enabled.is_enabled() && self.config.use_drag_and_drop
    }

    /// Start dragging `block`. Returns the markup to put in the drag data,
    /// or `None` if the block cannot be dragged.
    pub fn drag_start(&mut self, block: BlockId) -> Option<String> {
        if !self.drag_and_drop_enabled() {
            return None;
        }
        let Some((placeholder, index)) = self.registry.locate(block) else {
            warn!(%block, "drag start on unknown block");
            return None;
        };
        if let Some(previous) = self.drag.take() {
            debug!(block = %previous.block(), "replacing unfinished drag");
            self.set_dragging(previous.block(), false);
        }
        for other in self.registry.blocks_mut() {
            other.hovered = false;
        }
        self.set_dragging(block, true);
        self.drag = Some(DragSession::new(placeholder, index, block));
        self.registry.block(block).map(render_block)
    }

    /// The pointer entered `placeholder` while dragging.
    pub fn drag_enter(
        &mut self,
        placeholder: PlaceholderId,
        carries_files: bool,
    ) -> AddonUpdate {
        if !self.drag_and_drop_enabled() {
            return AddonUpdate::keep();
        }
        let Some(target) = self.registry.placeholder_mut(placeholder) else {
            warn!(%placeholder, "drag enter on unknown placeholder");
            return AddonUpdate::keep();
        };
        target.drop_hover = true;
        if let Some(session) = &mut self.drag {
            session.entered(placeholder, carries_files);
        }
        AddonUpdate::redraw()
    }

    pub fn drag_leave(&mut self, placeholder: PlaceholderId) -> AddonUpdate {
        if !self.drag_and_drop_enabled() {
            return AddonUpdate::keep();
        }
        let Some(target) = self.registry.placeholder_mut(placeholder) else {
            warn!(%placeholder, "drag leave on unknown placeholder");
            return AddonUpdate::keep();
        };
        target.drop_hover = false;
        if let Some(session) = &mut self.drag {
            session.left();
        }
        AddonUpdate::redraw()
    }

    /// Something was dropped onto `target`. A block dragged from the same
    /// placeholder is reordered; anything else is handled as a drop onto
    /// the placeholder holding `target`.
    pub fn drop_on_block(
        &mut self,
        target: BlockId,
        payload: DropPayload,
    ) -> DropResult {
        if !self.drag_and_drop_enabled() {
            return DropResult::ignored();
        }
        let Some((placeholder, target_index)) = self.registry.locate(target)
        else {
            warn!(block = %target, "drop on unknown block");
            return DropResult::ignored();
        };
        let sorting = match &payload {
            DropPayload::Markup(html) => {
                self.drag.as_ref().is_some_and(|d| {
                    d.origin_placeholder() == placeholder
                }) && self.carries_dragged_block(html)
            }
            DropPayload::Files(_) => false,
        };
        if !sorting {
            return self.drop_on_placeholder(placeholder, payload);
        }

        let Some(session) = self.end_drag_session() else {
            return DropResult::ignored();
        };
        self.clear_drop_hover(placeholder);
        let dragged = session.block();
        let origin = match self.registry.locate(dragged) {
            Some((from, index)) if from == placeholder => index,
            _ => {
                debug!(block = %dragged, "dragged block left its placeholder");
                return DropResult::ignored();
            }
        };
        if origin != session.origin_index() {
            debug!(
                block = %dragged,
                from = session.origin_index(),
                to = origin,
                "dragged block shifted during the drag"
            );
        }

        let update = match SortPlacement::resolve(origin, target_index) {
            SortPlacement::Unchanged => AddonUpdate::redraw(),
            SortPlacement::After | SortPlacement::Before => {
                // Once the dragged block is out of the sequence, the
                // target's old index is right after it when moving
                // forward and right before it when moving back.
                self.registry.move_block(
                    dragged,
                    placeholder,
                    placeholder,
                    target_index,
                );
                AddonUpdate::changed()
            }
        };
        DropResult {
            update,
            outcome: DropOutcome::Sorted,
        }
    }

    /// Something was dropped onto `placeholder` itself.
    ///
    /// Files are uploaded into it. Markup is a moved block: when it names
    /// the block this addon is dragging, that block is moved here right
    /// away. Any other markup came from elsewhere: a new block is built
    /// from it, a leftover drag of this addon is discarded, and the host
    /// must hand the receipt to the origin's `drag_end`.
    pub fn drop_on_placeholder(
        &mut self,
        placeholder: PlaceholderId,
        payload: DropPayload,
    ) -> DropResult {
        if !self.drag_and_drop_enabled() {
            return DropResult::ignored();
        }
        if self.registry.placeholder(placeholder).is_none() {
            warn!(%placeholder, "drop on unknown placeholder");
            return DropResult::ignored();
        }
        self.clear_drop_hover(placeholder);

        match payload {
            DropPayload::Files(files) => {
                let tasks = self.start_uploads(placeholder, files);
                DropResult {
                    update: AddonUpdate::redraw(),
                    outcome: DropOutcome::Uploading(tasks),
                }
            }
            DropPayload::Markup(html) => {
                if self.carries_dragged_block(&html) {
                    if let Some(session) = self.end_drag_session() {
                        return self.move_here(session, placeholder);
                    }
                } else if let Some(stale) = self.end_drag_session() {
                    debug!(
                        block = %stale.block(),
                        "dropped markup is not the dragged block"
                    );
                }
                self.adopt_dropped(&html, placeholder)
            }
        }
    }

    fn move_here(
        &mut self,
        session: DragSession,
        placeholder: PlaceholderId,
    ) -> DropResult {
        let block = session.block();
        let moved = self.registry.move_block(
            block,
            session.origin_placeholder(),
            placeholder,
            usize::MAX,
        );
        if moved.is_none() {
            debug!(%block, "drag origin vanished before the drop");
            return DropResult::ignored();
        }
        debug!(%block, to = %placeholder, "block moved");
        DropResult {
            update: AddonUpdate::changed(),
            outcome: DropOutcome::Moved(MoveReceipt::Transferred { block }),
        }
    }

    fn adopt_dropped(
        &mut self,
        html: &str,
        placeholder: PlaceholderId,
    ) -> DropResult {
        let Some(image) = find_dropped_image(html) else {
            debug!("dropped markup holds no image");
            return DropResult {
                update: AddonUpdate::redraw(),
                outcome: DropOutcome::Ignored,
            };
        };
        let block = self.registry.new_block(image.source, image.link);
        let Some(block) = self.registry.append_block(placeholder, block) else {
            return DropResult::ignored();
        };
        debug!(%block, to = %placeholder, "block adopted from another addon");
        DropResult {
            update: AddonUpdate::changed(),
            outcome: DropOutcome::Moved(MoveReceipt::Adopted { block }),
        }
    }

    /// The drag that started on this addon is over. `receipt` is whatever
    /// the accepting drop returned, if any drop accepted it.
    ///
    /// The receipt is honoured even if drag and drop was disabled during
    /// the drag, so a block is never left in two places.
    pub fn drag_end(&mut self, receipt: Option<MoveReceipt>) -> AddonUpdate {
        for placeholder in self.registry.placeholders_mut() {
            placeholder.drop_hover = false;
        }
        let Some(session) = self.end_drag_session() else {
            return AddonUpdate::keep();
        };
        match receipt {
            Some(MoveReceipt::Adopted { .. }) => {
                match self.registry.remove_block(session.block()) {
                    Some(block) => {
                        debug!(block = %block.id(), "moved block removed");
                        AddonUpdate::changed()
                    }
                    None => {
                        debug!(block = %session.block(), "moved block is gone");
                        AddonUpdate::keep()
                    }
                }
            }
            Some(MoveReceipt::Transferred { block }) => {
                warn!(%block, "transfer receipt with a drag still open");
                AddonUpdate::keep()
            }
            None => AddonUpdate::keep(),
        }
    }

    /// Whether `html` is the drag data of this addon's own drag, judged
    /// by the image it names.
    fn carries_dragged_block(&self, html: &str) -> bool {
        let Some(session) = &self.drag else {
            return false;
        };
        let Some(dragged) = self.registry.block(session.block()) else {
            return false;
        };
        find_dropped_image(html)
            .is_some_and(|image| image.source == dragged.source())
    }

    fn end_drag_session(&mut self) -> Option<DragSession> {
        let session = self.drag.take()?;
        self.set_dragging(session.block(), false);
        Some(session)
    }

    fn set_dragging(&mut self, block: BlockId, dragging: bool) {
        if let Some(block) = self.registry.block_mut(block) {
            block.dragging = dragging;
        }
    }

    fn clear_drop_hover(&mut self, placeholder: PlaceholderId) {
        if let Some(p) = self.registry.placeholder_mut(placeholder) {
            p.drop_hover = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::drag_session::DropIntent;
    use crate::images_addon::testutils::{addon, png, sources, with_images};
    use crate::images_addon::EnabledSwitch;

    fn drag_payload(addon: &mut ImagesAddon, block: BlockId) -> DropPayload {
        DropPayload::Markup(addon.drag_start(block).unwrap())
    }

    #[test]
    fn dragging_forward_lands_after_the_target() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B", "C"]);
        let payload = drag_payload(&mut addon, ids[0]);

        let result = addon.drop_on_block(ids[2], payload);
        assert_eq!(result.outcome, DropOutcome::Sorted);
        assert_that!(result.update.is_changed()).is_true();
        assert_eq!(sources(&addon, p), vec!["B", "C", "A"]);
        assert_eq!(addon.drag_end(None), AddonUpdate::keep());
    }

    #[test]
    fn dragging_backward_lands_before_the_target() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B", "C"]);
        let payload = drag_payload(&mut addon, ids[2]);

        addon.drop_on_block(ids[0], payload);
        assert_eq!(sources(&addon, p), vec!["C", "A", "B"]);
    }

    #[test]
    fn dropping_a_block_onto_itself_changes_nothing() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B", "C"]);
        let payload = drag_payload(&mut addon, ids[1]);

        let result = addon.drop_on_block(ids[1], payload);
        assert_eq!(result.outcome, DropOutcome::Sorted);
        assert_that!(result.update.is_changed()).is_false();
        assert_eq!(sources(&addon, p), vec!["A", "B", "C"]);
    }

    #[test]
    fn move_between_placeholders_of_one_addon() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p1, ids) = with_images(&mut addon, &["A"]);
        let p2 = addon.insert_placeholder();
        addon.resize_smaller(ids[0]);
        assert_that!(addon.placeholder(p1).unwrap().is_small()).is_true();

        let payload = drag_payload(&mut addon, ids[0]);
        let result = addon.drop_on_placeholder(p2, payload);
        assert_eq!(
            result.outcome,
            DropOutcome::Moved(MoveReceipt::Transferred { block: ids[0] })
        );
        assert!(sources(&addon, p1).is_empty());
        assert_that!(addon.placeholder(p1).unwrap().is_small()).is_false();
        assert_eq!(sources(&addon, p2), vec!["A"]);

        let receipt = match result.outcome {
            DropOutcome::Moved(receipt) => receipt,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(addon.drag_end(Some(receipt)), AddonUpdate::keep());
        assert_eq!(sources(&addon, p2), vec!["A"]);
        assert_that!(addon.block(ids[0]).unwrap().is_dragging()).is_false();
    }

    #[test]
    fn drop_on_a_block_of_another_placeholder_moves_into_it() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p1, a) = with_images(&mut addon, &["A"]);
        let (p2, x) = with_images(&mut addon, &["X", "Y"]);

        let payload = drag_payload(&mut addon, a[0]);
        let result = addon.drop_on_block(x[0], payload);
        assert!(matches!(result.outcome, DropOutcome::Moved(_)));
        assert!(sources(&addon, p1).is_empty());
        assert_eq!(sources(&addon, p2), vec!["X", "Y", "A"]);
    }

    #[test]
    fn move_between_addons_uses_the_receipt() {
        let (mut origin, recorded) = addon(EnabledSwitch::default());
        let (mut destination, _) = addon(EnabledSwitch::default());
        let (p1, ids) = with_images(&mut origin, &["A"]);
        let block = origin.registry.block_mut(ids[0]).unwrap();
        block.set_link("https://x".into());
        let p2 = destination.insert_placeholder();

        let payload = drag_payload(&mut origin, ids[0]);
        let result = destination.drop_on_placeholder(p2, payload);
        let DropOutcome::Moved(receipt) = result.outcome else {
            panic!("block was not adopted");
        };
        assert!(matches!(receipt, MoveReceipt::Adopted { .. }));
        let adopted = destination.placeholder(p2).unwrap().blocks()[0].clone();
        assert_eq!(adopted.source(), "A");
        assert_eq!(adopted.link(), Some("https://x"));

        assert_that!(origin.drag_end(Some(receipt)).is_changed()).is_true();
        assert!(sources(&origin, p1).is_empty());
        assert!(recorded.deletes.borrow().is_empty());
    }

    #[test]
    fn drag_end_without_a_drop_changes_nothing() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B"]);
        addon.drag_start(ids[0]).unwrap();
        assert_that!(addon.block(ids[0]).unwrap().is_dragging()).is_true();

        assert_eq!(addon.drag_end(None), AddonUpdate::keep());
        assert!(addon.drag_session().is_none());
        assert_eq!(sources(&addon, p), vec!["A", "B"]);
        assert_that!(addon.block(ids[0]).unwrap().is_dragging()).is_false();
    }

    #[test]
    fn dropping_files_uploads_them() {
        let (mut addon, recorded) = addon(EnabledSwitch::default());
        let p = addon.insert_placeholder();
        let result = addon.drop_on_placeholder(
            p,
            DropPayload::Files(vec![
                png("a"),
                UploadFile::new("b.txt", "text/plain", vec![1]),
            ]),
        );
        let DropOutcome::Uploading(tasks) = result.outcome else {
            panic!("files were not uploaded");
        };
        assert_eq!(tasks.len(), 1);
        assert_eq!(recorded.uploads.borrow().len(), 1);
    }

    #[test]
    fn markup_without_an_image_is_ignored() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let p = addon.insert_placeholder();
        let result = addon.drop_on_placeholder(
            p,
            DropPayload::Markup("<p>hello</p>".into()),
        );
        assert_eq!(result.outcome, DropOutcome::Ignored);
        assert!(addon.placeholder(p).unwrap().is_empty());
    }

    #[test]
    fn drop_zone_hover_follows_enter_and_leave() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p1, ids) = with_images(&mut addon, &["A"]);
        let p2 = addon.insert_placeholder();
        addon.drag_start(ids[0]).unwrap();

        addon.drag_enter(p1, false);
        assert_eq!(addon.drag_session().unwrap().intent(), DropIntent::Sort);
        addon.drag_leave(p1);
        addon.drag_enter(p2, false);
        assert_eq!(addon.drag_session().unwrap().intent(), DropIntent::Move);
        assert_that!(addon.placeholder(p1).unwrap().is_drop_hover()).is_false();
        assert_that!(addon.placeholder(p2).unwrap().is_drop_hover()).is_true();

        addon.drag_end(None);
        assert_that!(addon.placeholder(p2).unwrap().is_drop_hover()).is_false();
    }

    #[test]
    fn disabled_switch_blocks_every_drag_entry_point() {
        let switch = EnabledSwitch::default();
        let (mut addon, _) = addon(switch.clone());
        let (p, ids) = with_images(&mut addon, &["A", "B"]);
        switch.set(false);

        assert_eq!(addon.drag_start(ids[0]), None);
        assert_eq!(addon.drag_enter(p, false), AddonUpdate::keep());
        assert_eq!(
            addon.drop_on_block(ids[1], DropPayload::Files(vec![png("a")])),
            DropResult::ignored()
        );
        assert_eq!(
            addon.drop_on_placeholder(p, DropPayload::Files(vec![png("a")])),
            DropResult::ignored()
        );
        assert_eq!(sources(&addon, p), vec!["A", "B"]);
    }

    #[test]
    fn foreign_markup_replaces_a_drag_that_never_ended() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p1, ids) = with_images(&mut addon, &["mine.png"]);
        let p2 = addon.insert_placeholder();
        addon.drag_start(ids[0]).unwrap();

        let result = addon.drop_on_placeholder(
            p2,
            DropPayload::Markup(r#"<img src="foreign.png">"#.into()),
        );
        let DropOutcome::Moved(MoveReceipt::Adopted { .. }) = result.outcome
        else {
            panic!("foreign image was not adopted: {:?}", result.outcome);
        };
        assert_eq!(sources(&addon, p1), vec!["mine.png"]);
        assert_eq!(sources(&addon, p2), vec!["foreign.png"]);
        assert!(addon.drag_session().is_none());
        assert_that!(addon.block(ids[0]).unwrap().is_dragging()).is_false();
    }

    #[test]
    fn foreign_markup_on_a_sibling_is_not_a_sort() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B"]);
        addon.drag_start(ids[0]).unwrap();

        let result = addon.drop_on_block(
            ids[1],
            DropPayload::Markup(r#"<img src="C">"#.into()),
        );
        assert!(matches!(
            result.outcome,
            DropOutcome::Moved(MoveReceipt::Adopted { .. })
        ));
        assert_eq!(sources(&addon, p), vec!["A", "B", "C"]);
    }

    #[test]
    fn sorting_uses_the_live_index_after_a_shift() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (p, ids) = with_images(&mut addon, &["A", "B", "C", "D"]);
        let payload = drag_payload(&mut addon, ids[2]);
        assert_eq!(addon.drag_session().unwrap().origin_index(), 2);
        addon.registry.remove_block(ids[0]);

        let result = addon.drop_on_block(ids[3], payload);
        assert_eq!(result.outcome, DropOutcome::Sorted);
        assert_eq!(sources(&addon, p), vec!["B", "D", "C"]);
    }

    #[test]
    fn removing_the_dragged_block_ends_the_drag() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let (_, ids) = with_images(&mut addon, &["A", "B"]);
        addon.drag_start(ids[0]).unwrap();
        addon.remove_block(ids[0]);

        assert!(addon.drag_session().is_none());
        assert!(!addon.hover_enter(ids[1]).is_empty());
        assert_eq!(addon.drag_end(None), AddonUpdate::keep());
    }
}
