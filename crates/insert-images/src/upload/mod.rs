// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Upload and delete transports, and the values that flow through them.
//!
//! A transport receives an [`UploadRequest`] plus an [`UploadSink`]. It may
//! do its work anywhere (the HTTP transport uses a worker thread) but it
//! reports only through the sink, which queues [`UploadEvent`]s for the
//! addon. The host drains that queue on its own loop with
//! [`crate::ImagesAddon::pump_uploads`], so every state change still
//! happens on one thread.

#[cfg(feature = "http")]
mod http;

use std::sync::mpsc::Sender;

#[cfg(feature = "http")]
pub use http::{HttpDeleteTransport, HttpUploadTransport};

pub use crate::ids::TaskId;
use crate::registry::PlaceholderId;

/// A file the user picked or dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// The declared media type, e.g. `image/png`. Never sniffed.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadPart {
    File {
        field: String,
        file_name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
    Text {
        field: String,
        value: String,
    },
}

/// The multipart form sent for one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadPayload {
    pub parts: Vec<PayloadPart>,
}

impl UploadPayload {
    /// The stock payload: the file alone, in a part named `file`.
    pub fn single_file(file: &UploadFile) -> Self {
        Self {
            parts: vec![PayloadPart::File {
                field: "file".to_owned(),
                file_name: file.name.clone(),
                media_type: file.media_type.clone(),
                bytes: file.bytes.clone(),
            }],
        }
    }

    pub fn with_text(
        mut self,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.parts.push(PayloadPart::Text {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn len_bytes(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match part {
                PayloadPart::File { bytes, .. } => bytes.len(),
                PayloadPart::Text { value, .. } => value.len(),
            })
            .sum()
    }
}

/// Turns a picked file into the form that gets posted.
pub type PayloadFormatter = Box<dyn Fn(&UploadFile) -> UploadPayload>;

pub fn default_payload_formatter() -> PayloadFormatter {
    Box::new(UploadPayload::single_file)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub task: TaskId,
    pub placeholder: PlaceholderId,
    pub file_name: String,
    pub payload: UploadPayload,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    Progress { task: TaskId, fraction: f64 },
    /// `None`, or an empty handle, means the upload failed.
    Complete {
        task: TaskId,
        result: Option<String>,
    },
}

/// Where a transport reports on one task.
///
/// Cloning is allowed so progress can be reported from a reader, but only
/// the first completion of a task is honoured by the addon.
#[derive(Clone, Debug)]
pub struct UploadSink {
    task: TaskId,
    events: Sender<UploadEvent>,
}

impl UploadSink {
    pub(crate) fn new(task: TaskId, events: Sender<UploadEvent>) -> Self {
        Self { task, events }
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn progress(&self, fraction: f64) {
        // The addon may already be gone; nobody is left to tell.
        let _ = self.events.send(UploadEvent::Progress {
            task: self.task,
            fraction,
        });
    }

    pub fn complete(self, result: Option<String>) {
        let _ = self.events.send(UploadEvent::Complete {
            task: self.task,
            result,
        });
    }
}

pub trait UploadTransport {
    /// Start sending `request`. Must not block the caller for the
    /// duration of the transfer.
    fn upload(&self, request: UploadRequest, sink: UploadSink);
}

pub trait DeleteTransport {
    /// Ask the server to drop `source`. The result is never observed.
    fn delete(&self, source: &str);
}

impl<F> UploadTransport for F
where
    F: Fn(UploadRequest, UploadSink),
{
    fn upload(&self, request: UploadRequest, sink: UploadSink) {
        self(request, sink)
    }
}

impl<F> DeleteTransport for F
where
    F: Fn(&str),
{
    fn delete(&self, source: &str) {
        self(source)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;

    #[test]
    fn single_file_payload_uses_file_field() {
        let file = UploadFile::new("cat.png", "image/png", vec![1, 2, 3]);
        let payload = UploadPayload::single_file(&file);
        assert_eq!(
            payload.parts,
            vec![PayloadPart::File {
                field: "file".into(),
                file_name: "cat.png".into(),
                media_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            }]
        );
        assert_eq!(payload.len_bytes(), 3);
    }

    #[test]
    fn sink_reports_progress_then_completion() {
        let (tx, rx) = channel();
        let task = TaskId::from_raw(7);
        let sink = UploadSink::new(task, tx);
        sink.progress(0.5);
        sink.complete(Some("cat.png".into()));

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                UploadEvent::Progress {
                    task,
                    fraction: 0.5
                },
                UploadEvent::Complete {
                    task,
                    result: Some("cat.png".into())
                },
            ]
        );
    }

    #[test]
    fn sink_outliving_the_receiver_is_silent() {
        let (tx, rx) = channel();
        drop(rx);
        let sink = UploadSink::new(TaskId::from_raw(0), tx);
        sink.progress(1.0);
        sink.complete(None);
    }
}
