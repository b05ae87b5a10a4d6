// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, warn};

use crate::drag_session::DragSession;
use crate::ids::IdCounter;
use crate::link_session::LinkSession;
use crate::registry::{
    BlockId, ImageBlock, NoticeId, Placeholder, PlaceholderId, Registry,
};
use crate::scheduler::Scheduler;
use crate::upload::{
    default_payload_formatter, DeleteTransport, PayloadFormatter, TaskId,
    UploadEvent, UploadTransport,
};
use crate::{
    AddonUpdate, HostAction, ImagesConfig, ImagesResult, LinkSessionId,
};

/// How long a failed upload's notice stays up.
pub const NOTICE_DISMISS_DELAY: Duration = Duration::from_secs(3);

/// How long the link form survives losing focus.
pub const LINK_BLUR_DEBOUNCE: Duration = Duration::from_millis(250);

/// Shared on/off switch for drag and drop and hover affordances.
///
/// Clones share one value, so a host can hand the same switch to every
/// addon on the page and disable them all at once (for example while the
/// editor is read-only).
#[derive(Clone, Debug)]
pub struct EnabledSwitch(Rc<Cell<bool>>);

impl EnabledSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Rc::new(Cell::new(enabled)))
    }

    pub fn set(&self, enabled: bool) {
        self.0.set(enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.get()
    }
}

impl Default for EnabledSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Timer {
    DismissNotice {
        placeholder: PlaceholderId,
        notice: NoticeId,
    },
    CloseLinkSession(LinkSessionId),
}

pub struct ImagesAddon {
    pub(crate) config: ImagesConfig,
    pub(crate) registry: Registry,
    pub(crate) upload_transport: Box<dyn UploadTransport>,
    pub(crate) delete_transport: Box<dyn DeleteTransport>,
    pub(crate) payload_formatter: PayloadFormatter,
    pub(crate) enabled: EnabledSwitch,
    pub(crate) upload_events_tx: Sender<UploadEvent>,
    pub(crate) upload_events_rx: Receiver<UploadEvent>,
    /// In-flight tasks and the placeholder each one will land in.
    pub(crate) tasks: HashMap<TaskId, PlaceholderId>,
    pub(crate) task_ids: IdCounter,
    pub(crate) timers: Scheduler<Timer>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) link: Option<LinkSession>,
    pub(crate) link_ids: IdCounter,
}

impl ImagesAddon {
    /// An addon using the default HTTP transports for `config`.
    pub fn new(config: ImagesConfig) -> ImagesResult<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ImagesConfig) -> ImagesAddonBuilder {
        ImagesAddonBuilder::new(config)
    }

    pub fn config(&self) -> &ImagesConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn placeholder(&self, id: PlaceholderId) -> Option<&Placeholder> {
        self.registry.placeholder(id)
    }

    pub fn block(&self, id: BlockId) -> Option<&ImageBlock> {
        self.registry.block(id)
    }

    pub fn enabled_switch(&self) -> &EnabledSwitch {
        &self.enabled
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn link_session(&self) -> Option<&LinkSession> {
        self.link.as_ref()
    }

    /// Uploads started but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Create an empty placeholder at the host's insertion point.
    pub fn insert_placeholder(&mut self) -> PlaceholderId {
        let id = self.registry.create_placeholder();
        debug!(placeholder = %id, "placeholder created");
        id
    }

    /// The toolbar's "add image" action.
    pub fn add_image(&mut self, placeholder: PlaceholderId) -> AddonUpdate {
        if self.registry.placeholder(placeholder).is_none() {
            warn!(%placeholder, "add image on unknown placeholder");
            return AddonUpdate::keep();
        }
        AddonUpdate::keep().deselecting().with_action(
            HostAction::OpenFilePicker {
                placeholder,
                accept: self.config.accepted_types.clone(),
            },
        )
    }

    /// Forget a placeholder the host removed from its document. Its
    /// in-flight uploads are abandoned and sessions on it are closed.
    pub fn remove_placeholder(
        &mut self,
        placeholder: PlaceholderId,
    ) -> AddonUpdate {
        let Some(removed) = self.registry.remove_placeholder(placeholder)
        else {
            warn!(%placeholder, "removing unknown placeholder");
            return AddonUpdate::keep();
        };
        self.tasks.retain(|_, p| *p != placeholder);

        let mut update = AddonUpdate::changed();
        if self
            .drag
            .as_ref()
            .is_some_and(|d| removed.index_of(d.block()).is_some())
        {
            debug!(%placeholder, "drag origin removed");
            self.drag = None;
        }
        if let Some(session) = self
            .link
            .take_if(|s| removed.index_of(s.block()).is_some())
        {
            update = update.merge(self.close_link_session(session));
        }
        update
    }

    /// Let `by` pass on the addon's clock, running whatever became due.
    pub fn advance_time(&mut self, by: Duration) -> AddonUpdate {
        let due = self.timers.advance(by);
        due.into_iter().fold(AddonUpdate::keep(), |update, timer| {
            update.merge(self.run_timer(timer))
        })
    }

    fn run_timer(&mut self, timer: Timer) -> AddonUpdate {
        match timer {
            Timer::DismissNotice {
                placeholder,
                notice,
            } => {
                let dismissed = self
                    .registry
                    .placeholder_mut(placeholder)
                    .is_some_and(|p| p.remove_notice(notice));
                if dismissed {
                    AddonUpdate::redraw()
                } else {
                    debug!(%notice, "notice already gone");
                    AddonUpdate::keep()
                }
            }
            Timer::CloseLinkSession(id) => {
                match self.link.take_if(|s| s.id() == id) {
                    Some(session) => self.close_link_session(session),
                    None => {
                        debug!(session = %id, "link session already closed");
                        AddonUpdate::keep()
                    }
                }
            }
        }
    }

    /// Drop a session that has already been taken out of `self.link`.
    pub(crate) fn close_link_session(
        &mut self,
        session: LinkSession,
    ) -> AddonUpdate {
        if let Some(timer) = session.pending_close {
            self.timers.cancel(timer);
        }
        AddonUpdate::keep()
            .with_action(HostAction::HideLinkForm {
                session: session.id(),
            })
    }
}

/// Options that cannot live in [`ImagesConfig`].
pub struct ImagesAddonBuilder {
    config: ImagesConfig,
    upload_transport: Option<Box<dyn UploadTransport>>,
    delete_transport: Option<Box<dyn DeleteTransport>>,
    payload_formatter: Option<PayloadFormatter>,
    enabled: Option<EnabledSwitch>,
}

impl ImagesAddonBuilder {
    pub fn new(config: ImagesConfig) -> Self {
        Self {
            config,
            upload_transport: None,
            delete_transport: None,
            payload_formatter: None,
            enabled: None,
        }
    }

    pub fn upload_transport(
        mut self,
        transport: impl UploadTransport + 'static,
    ) -> Self {
        self.upload_transport = Some(Box::new(transport));
        self
    }

    pub fn delete_transport(
        mut self,
        transport: impl DeleteTransport + 'static,
    ) -> Self {
        self.delete_transport = Some(Box::new(transport));
        self
    }

    pub fn payload_formatter(mut self, formatter: PayloadFormatter) -> Self {
        self.payload_formatter = Some(formatter);
        self
    }

    pub fn enabled_switch(mut self, switch: EnabledSwitch) -> Self {
        self.enabled = Some(switch);
        self
    }

    /// Fails only if a transport was not supplied and the default one
    /// cannot be built from the configuration.
    pub fn build(self) -> ImagesResult<ImagesAddon> {
        let upload_transport = match self.upload_transport {
            Some(transport) => transport,
            None => default_transports::upload(&self.config)?,
        };
        let delete_transport = match self.delete_transport {
            Some(transport) => transport,
            None => default_transports::delete(&self.config)?,
        };
        let (upload_events_tx, upload_events_rx) = channel();
        Ok(ImagesAddon {
            config: self.config,
            registry: Registry::new(),
            upload_transport,
            delete_transport,
            payload_formatter: self
                .payload_formatter
                .unwrap_or_else(default_payload_formatter),
            enabled: self.enabled.unwrap_or_default(),
            upload_events_tx,
            upload_events_rx,
            tasks: HashMap::new(),
            task_ids: IdCounter::default(),
            timers: Scheduler::default(),
            drag: None,
            link: None,
            link_ids: IdCounter::default(),
        })
    }
}

#[cfg(feature = "http")]
mod default_transports {
    use crate::upload::{
        DeleteTransport, HttpDeleteTransport, HttpUploadTransport,
        UploadTransport,
    };
    use crate::{ImagesConfig, ImagesResult};

    pub(super) fn upload(
        config: &ImagesConfig,
    ) -> ImagesResult<Box<dyn UploadTransport>> {
        Ok(Box::new(HttpUploadTransport::from_config(config)?))
    }

    pub(super) fn delete(
        config: &ImagesConfig,
    ) -> ImagesResult<Box<dyn DeleteTransport>> {
        Ok(Box::new(HttpDeleteTransport::from_config(config)?))
    }
}

#[cfg(not(feature = "http"))]
mod default_transports {
    use crate::upload::{DeleteTransport, UploadTransport};
    use crate::{ImagesConfig, ImagesError, ImagesResult};

    pub(super) fn upload(
        _config: &ImagesConfig,
    ) -> ImagesResult<Box<dyn UploadTransport>> {
        Err(ImagesError::MissingTransport("upload"))
    }

    pub(super) fn delete(
        _config: &ImagesConfig,
    ) -> ImagesResult<Box<dyn DeleteTransport>> {
        Err(ImagesError::MissingTransport("delete"))
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use super::*;
    use crate::images_addon::testutils::{addon, png};
    use crate::ImagesError;

    #[test]
    fn enabled_switch_is_shared_between_clones() {
        let switch = EnabledSwitch::default();
        let other = switch.clone();
        assert_that!(switch.is_enabled()).is_true();
        other.set(false);
        assert_that!(switch.is_enabled()).is_false();
    }

    #[test]
    fn builder_hands_the_same_switch_to_every_addon() {
        let switch = EnabledSwitch::default();
        let (first, _) = addon(switch.clone());
        let (second, _) = addon(switch.clone());
        switch.set(false);
        assert_that!(first.enabled_switch().is_enabled()).is_false();
        assert_that!(second.enabled_switch().is_enabled()).is_false();
    }

    #[cfg(feature = "http")]
    #[test]
    fn default_transports_need_a_usable_endpoint() {
        let result = ImagesAddon::new(ImagesConfig::default());
        assert!(matches!(
            result,
            Err(ImagesError::InvalidEndpoint { .. })
        ));

        let config = ImagesConfig {
            base_url: Some("https://example.org/".into()),
            ..Default::default()
        };
        assert!(ImagesAddon::new(config).is_ok());
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn without_http_a_transport_must_be_supplied() {
        let result = ImagesAddon::new(ImagesConfig::default());
        assert!(matches!(result, Err(ImagesError::MissingTransport(_))));
    }

    #[test]
    fn add_image_asks_for_a_file_picker_and_deselects() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        let placeholder = addon.insert_placeholder();
        let update = addon.add_image(placeholder);
        assert_that!(update.is_changed()).is_false();
        assert_eq!(update.selection, crate::SelectionUpdate::Deselect);
        assert_eq!(
            update.actions,
            vec![HostAction::OpenFilePicker {
                placeholder,
                accept: vec![
                    "image/png".into(),
                    "image/jpeg".into(),
                    "image/gif".into()
                ],
            }]
        );
    }

    #[test]
    fn add_image_on_unknown_placeholder_does_nothing() {
        let (mut addon, _) = addon(EnabledSwitch::default());
        assert_eq!(
            addon.add_image(PlaceholderId::from_raw(9)),
            AddonUpdate::keep()
        );
    }

    #[test]
    fn removing_a_placeholder_abandons_its_uploads() {
        let (mut addon, recorded) = addon(EnabledSwitch::default());
        let placeholder = addon.insert_placeholder();
        addon.submit(placeholder, vec![png("a")]);
        assert_that!(addon.in_flight()).is_equal_to(1);

        let update = addon.remove_placeholder(placeholder);
        assert_that!(update.is_changed()).is_true();
        assert_that!(addon.in_flight()).is_equal_to(0);

        recorded.complete(0, Some("a.png"));
        assert_eq!(addon.pump_uploads(), AddonUpdate::keep());
        assert!(addon.registry().placeholders().is_empty());
    }
}
