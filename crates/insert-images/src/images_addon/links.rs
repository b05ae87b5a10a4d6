// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Link operations: the link form and unlinking.
//!
//! At most one link form is open at a time. Every form operation names
//! the session it was opened as; operations on a session that has since
//! been closed or replaced do nothing.

use tracing::{debug, warn};

use super::base::{Timer, LINK_BLUR_DEBOUNCE};
use super::ImagesAddon;
use crate::link_session::LinkSession;
use crate::registry::{BlockId, LinkState};
use crate::{AddonUpdate, HostAction, LinkSessionId};

const ENTER_KEY: &str = "Enter";

impl ImagesAddon {
    /// Open the link form on `block`, closing any form already open.
    pub fn open_link_editor(&mut self, block: BlockId) -> AddonUpdate {
        let Some((placeholder, _)) = self.registry.locate(block) else {
            warn!(%block, "link editor on unknown block");
            return AddonUpdate::keep();
        };
        let mut update = AddonUpdate::keep();
        if let Some(previous) = self.link.take() {
            debug!(session = %previous.id(), "discarding open link session");
            update = update.merge(self.close_link_session(previous));
        }
        let id = self.link_ids.next(LinkSessionId::from_raw);
        self.link = Some(LinkSession::new(id, block));
        update.deselecting().with_action(HostAction::ShowLinkForm {
            session: id,
            placeholder,
            placeholder_text: self.config.url_placeholder.clone(),
        })
    }

    pub fn link_input(
        &mut self,
        session: LinkSessionId,
        text: &str,
    ) -> AddonUpdate {
        if let Some(open) = self.open_session(session) {
            open.set_text(text);
        }
        AddonUpdate::keep()
    }

    /// Pasted text replaces the whole field.
    pub fn link_paste(
        &mut self,
        session: LinkSessionId,
        text: &str,
    ) -> AddonUpdate {
        self.link_input(session, text)
    }

    /// `key` is the DOM key name. Enter saves.
    pub fn link_key_press(
        &mut self,
        session: LinkSessionId,
        key: &str,
    ) -> AddonUpdate {
        if key == ENTER_KEY {
            self.link_save(session)
        } else {
            AddonUpdate::keep()
        }
    }

    /// Commit whatever is in the field.
    pub fn link_save(&mut self, session: LinkSessionId) -> AddonUpdate {
        let text = self.open_session(session).map(|s| s.text().to_owned());
        let Some(text) = text else {
            return AddonUpdate::keep();
        };
        self.commit_link(session, &text)
    }

    /// Link the session's block to `url`, exactly as given.
    pub fn commit_link(
        &mut self,
        session: LinkSessionId,
        url: &str,
    ) -> AddonUpdate {
        let Some(open) = self.link.take_if(|s| s.id() == session) else {
            debug!(%session, "commit on closed link session");
            return AddonUpdate::keep();
        };
        let block = open.block();
        let closed = self.close_link_session(open);
        match self.registry.block_mut(block) {
            Some(target) => {
                target.set_link(url.to_owned());
                debug!(%block, "link committed");
                AddonUpdate::changed().merge(closed)
            }
            None => {
                debug!(%block, "link target is gone");
                closed
            }
        }
    }

    /// The form's close button.
    pub fn cancel_link(&mut self, session: LinkSessionId) -> AddonUpdate {
        match self.link.take_if(|s| s.id() == session) {
            Some(open) => self.close_link_session(open),
            None => AddonUpdate::keep(),
        }
    }

    /// The field lost focus. The form closes after a short delay unless
    /// it is saved or focused again first.
    pub fn link_blur(&mut self, session: LinkSessionId) -> AddonUpdate {
        let Some(open) = self.link.as_mut().filter(|s| s.id() == session)
        else {
            return AddonUpdate::keep();
        };
        if let Some(timer) = open.pending_close.take() {
            self.timers.cancel(timer);
        }
        open.pending_close = Some(
            self.timers
                .schedule(LINK_BLUR_DEBOUNCE, Timer::CloseLinkSession(session)),
        );
        AddonUpdate::keep()
    }

    pub fn link_focus(&mut self, session: LinkSessionId) -> AddonUpdate {
        let pending = self
            .open_session(session)
            .and_then(|s| s.pending_close.take());
        if let Some(timer) = pending {
            self.timers.cancel(timer);
        }
        AddonUpdate::keep()
    }

    /// Remove the link from `block`. Does not open the form.
    pub fn unlink(&mut self, block: BlockId) -> AddonUpdate {
        let Some(target) = self.registry.block_mut(block) else {
            warn!(%block, "unlink of unknown block");
            return AddonUpdate::keep();
        };
        match target.take_link() {
            Some(_) => AddonUpdate::changed(),
            None => AddonUpdate::keep(),
        }
    }

    pub fn link_state(&self, block: BlockId) -> Option<LinkState> {
        let target = self.registry.block(block)?;
        let current = target.link().map(str::to_owned);
        Some(match &self.link {
            Some(session) if session.block() == block => {
                LinkState::Editing { current }
            }
            _ => match current {
                Some(url) => LinkState::Linked(url),
                None => LinkState::Unlinked,
            },
        })
    }

    fn open_session(
        &mut self,
        session: LinkSessionId,
    ) -> Option<&mut LinkSession> {
        let open = self.link.as_mut().filter(|s| s.id() == session);
        if open.is_none() {
            debug!(%session, "link session is not open");
        }
        open
    }
}
