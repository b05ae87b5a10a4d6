// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Default transports: plain HTTP POSTs, one worker thread per request.

use std::io::{self, Cursor, Read};
use std::thread;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use tracing::{debug, warn};
use url::Url;

use super::{
    DeleteTransport, PayloadPart, UploadPayload, UploadRequest, UploadSink,
    UploadTransport,
};
use crate::{ImagesConfig, ImagesResult};

/// Posts the payload as `multipart/form-data`. A non-empty response body
/// is the uploaded image's source; anything else is a failure.
#[derive(Clone, Debug)]
pub struct HttpUploadTransport {
    client: Client,
    endpoint: Url,
}

impl HttpUploadTransport {
    pub fn new(endpoint: Url) -> ImagesResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &ImagesConfig) -> ImagesResult<Self> {
        Self::new(config.upload_endpoint()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl UploadTransport for HttpUploadTransport {
    fn upload(&self, request: UploadRequest, sink: UploadSink) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        thread::spawn(move || {
            let task = request.task;
            let result =
                post_form(&client, endpoint, request.payload, &sink)
                    .map(|body| Some(body).filter(|b| !b.is_empty()))
                    .unwrap_or_else(|err| {
                        warn!(%task, %err, "upload request failed");
                        None
                    });
            sink.complete(result);
        });
    }
}

fn post_form(
    client: &Client,
    endpoint: Url,
    payload: UploadPayload,
    sink: &UploadSink,
) -> reqwest::Result<String> {
    let total = payload.len_bytes() as u64;
    let mut form = Form::new();
    for part in payload.parts {
        form = match part {
            PayloadPart::File {
                field,
                file_name,
                media_type,
                bytes,
            } => {
                let len = bytes.len() as u64;
                let reader = ProgressReader {
                    inner: Cursor::new(bytes),
                    sink: sink.clone(),
                    total,
                };
                let part = Part::reader_with_length(reader, len)
                    .file_name(file_name)
                    .mime_str(&media_type)?;
                form.part(field, part)
            }
            PayloadPart::Text { field, value } => form.text(field, value),
        };
    }
    debug!(task = %sink.task(), %endpoint, "posting upload");
    client.post(endpoint).multipart(form).send()?.text()
}

/// Reports the share of the payload read so far.
struct ProgressReader {
    inner: Cursor<Vec<u8>>,
    sink: UploadSink,
    total: u64,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.inner.read(buf)?;
        if read > 0 && self.total > 0 {
            let sent = self.inner.position() as f64;
            self.sink.progress(sent / self.total as f64);
        }
        Ok(read)
    }
}

/// Posts `file=<source>` as a urlencoded form and forgets about it.
#[derive(Clone, Debug)]
pub struct HttpDeleteTransport {
    client: Client,
    endpoint: Url,
}

impl HttpDeleteTransport {
    pub fn new(endpoint: Url) -> ImagesResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            endpoint,
        })
    }

    pub fn from_config(config: &ImagesConfig) -> ImagesResult<Self> {
        Self::new(config.delete_endpoint()?)
    }
}

impl DeleteTransport for HttpDeleteTransport {
    fn delete(&self, source: &str) {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let form = [("file".to_owned(), source.to_owned())];
        thread::spawn(move || {
            if let Err(err) = client.post(endpoint).form(&form).send() {
                warn!(%err, "delete request failed");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use super::*;
    use crate::upload::{TaskId, UploadEvent};

    #[test]
    fn progress_reader_reports_fractions_of_the_total() {
        let (tx, rx) = channel();
        let sink = UploadSink::new(TaskId::from_raw(3), tx);
        let mut reader = ProgressReader {
            inner: Cursor::new(vec![0; 10]),
            sink,
            total: 10,
        };
        let mut buf = [0; 4];
        while reader.read(&mut buf).unwrap() > 0 {}

        let fractions: Vec<f64> = rx
            .try_iter()
            .map(|event| match event {
                UploadEvent::Progress { fraction, .. } => fraction,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(fractions, vec![0.4, 0.8, 1.0]);
    }

    #[test]
    fn transports_resolve_endpoints_from_config() {
        let config = ImagesConfig {
            base_url: Some("https://example.org/".into()),
            ..Default::default()
        };
        let upload = HttpUploadTransport::from_config(&config).unwrap();
        assert_eq!(
            upload.endpoint().as_str(),
            "https://example.org/upload.php"
        );
        assert!(HttpDeleteTransport::from_config(&config).is_ok());
    }
}
