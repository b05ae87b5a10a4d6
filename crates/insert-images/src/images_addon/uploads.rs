// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::{debug, trace, warn};

use super::base::{Timer, NOTICE_DISMISS_DELAY};
use super::ImagesAddon;
use crate::registry::{
    PlaceholderId, ProgressIndicator, UPLOAD_FAILED_MESSAGE,
};
use crate::upload::{
    TaskId, UploadEvent, UploadFile, UploadRequest, UploadSink,
};
use crate::{AddonUpdate, CompletedUpload, UploadOutcome};

impl ImagesAddon {
    /// Upload every accepted file into `placeholder`. Files whose declared
    /// type is not accepted are dropped without a trace in the document.
    pub fn submit(
        &mut self,
        placeholder: PlaceholderId,
        files: Vec<UploadFile>,
    ) -> AddonUpdate {
        if self.start_uploads(placeholder, files).is_empty() {
            AddonUpdate::keep()
        } else {
            AddonUpdate::redraw()
        }
    }

    pub(crate) fn start_uploads(
        &mut self,
        placeholder: PlaceholderId,
        files: Vec<UploadFile>,
    ) -> Vec<TaskId> {
        if self.registry.placeholder(placeholder).is_none() {
            warn!(%placeholder, "upload into unknown placeholder");
            return Vec::new();
        }

        let mut started = Vec::new();
        for file in files {
            if !self.config.accepts(&file.media_type) {
                debug!(
                    file = %file.name,
                    media_type = %file.media_type,
                    "skipping file of unaccepted type"
                );
                continue;
            }
            let task = self.task_ids.next(TaskId::from_raw);
            if let Some(p) = self.registry.placeholder_mut(placeholder) {
                p.progress.push(ProgressIndicator { task, percent: 0 });
            }
            self.tasks.insert(task, placeholder);

            let request = UploadRequest {
                task,
                placeholder,
                file_name: file.name.clone(),
                payload: (self.payload_formatter)(&file),
            };
            debug!(%task, %placeholder, file = %file.name, "starting upload");
            let sink = UploadSink::new(task, self.upload_events_tx.clone());
            self.upload_transport.upload(request, sink);
            started.push(task);
        }
        started
    }

    /// Apply every event the transports have queued since the last call.
    pub fn pump_uploads(&mut self) -> AddonUpdate {
        let events: Vec<UploadEvent> =
            self.upload_events_rx.try_iter().collect();
        events.into_iter().fold(AddonUpdate::keep(), |update, event| {
            update.merge(self.handle_upload_event(event))
        })
    }

    /// Apply one event. Hosts that run their own transport plumbing can
    /// feed events here directly instead of through a sink.
    pub fn handle_upload_event(&mut self, event: UploadEvent) -> AddonUpdate {
        match event {
            UploadEvent::Progress { task, fraction } => {
                self.upload_progress(task, fraction)
            }
            UploadEvent::Complete { task, result } => {
                self.upload_complete(task, result)
            }
        }
    }

    fn upload_progress(&mut self, task: TaskId, fraction: f64) -> AddonUpdate {
        let Some(placeholder) = self.tasks.get(&task).copied() else {
            trace!(%task, "progress for finished or unknown task");
            return AddonUpdate::keep();
        };
        let indicator = self
            .registry
            .placeholder_mut(placeholder)
            .and_then(|p| p.progress_mut(task));
        let Some(indicator) = indicator else {
            trace!(%task, "progress indicator is gone");
            return AddonUpdate::keep();
        };
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).round() as u8;
        if indicator.percent == percent {
            return AddonUpdate::keep();
        }
        indicator.percent = percent;
        AddonUpdate::redraw()
    }

    fn upload_complete(
        &mut self,
        task: TaskId,
        result: Option<String>,
    ) -> AddonUpdate {
        let Some(placeholder) = self.tasks.remove(&task) else {
            trace!(%task, "completion for finished or unknown task");
            return AddonUpdate::keep();
        };
        let Some(target) = self.registry.placeholder_mut(placeholder) else {
            debug!(%task, %placeholder, "upload outlived its placeholder");
            return AddonUpdate::keep();
        };
        target.remove_progress(task);

        let (mut update, outcome) = match result.filter(|r| !r.is_empty()) {
            Some(source) => {
                let block = self.registry.new_block(source, None);
                let Some(block) = self.registry.append_block(placeholder, block)
                else {
                    return AddonUpdate::redraw();
                };
                debug!(%task, %block, "upload finished");
                (AddonUpdate::changed(), UploadOutcome::Inserted(block))
            }
            None => {
                warn!(%task, "upload failed");
                let Some(notice) = self
                    .registry
                    .push_notice(placeholder, UPLOAD_FAILED_MESSAGE)
                else {
                    return AddonUpdate::redraw();
                };
                self.timers.schedule(
                    NOTICE_DISMISS_DELAY,
                    Timer::DismissNotice {
                        placeholder,
                        notice,
                    },
                );
                (AddonUpdate::redraw(), UploadOutcome::Failed(notice))
            }
        };

        update.completed_uploads.push(CompletedUpload {
            task,
            placeholder,
            outcome,
        });
        update
    }
}
