//! PDF delivery
//!
//! Hands a finished document to the client as an attachment. The status line
//! and headers go out before the first body frame, so a client that drops
//! the connection mid-transfer can only be logged, never answered.

use bytes::Bytes;
use futures_util::stream::Stream;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::{debug, error};

use super::response::{apply_cors, BoxBody};
use crate::types::{Result, VaultError};

/// Size of each body frame handed to hyper
pub const FRAME_SIZE: usize = 16 * 1024;

/// Build the attachment response for a rendered PDF.
///
/// `filename` must already be sanitized. `label` identifies the document in
/// transfer logs.
pub fn pdf_response(
    document: Vec<u8>,
    filename: &str,
    label: impl Into<String>,
) -> Result<Response<BoxBody>> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", filename))
        .map_err(|e| VaultError::Internal(format!("Invalid filename header: {}", e)))?;
    let length = document.len();

    let transfer = TransferStream::new(Bytes::from(document), label.into());
    let body: BoxBody = StreamBody::new(transfer)
        .map_err(|never: Infallible| match never {})
        .boxed();

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    apply_cors(headers);

    Ok(response)
}

/// Yields the document in fixed-size frames. hyper only asks for the next
/// frame once the previous one is written, so memory held by the connection
/// stays bounded by the socket's progress.
struct TransferStream {
    remaining: Bytes,
    total: usize,
    label: String,
}

impl TransferStream {
    fn new(document: Bytes, label: String) -> Self {
        Self {
            total: document.len(),
            remaining: document,
            label,
        }
    }

    fn sent(&self) -> usize {
        self.total - self.remaining.len()
    }
}

impl Stream for TransferStream {
    type Item = std::result::Result<Frame<Bytes>, Infallible>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.remaining.is_empty() {
            return Poll::Ready(None);
        }
        let take = this.remaining.len().min(FRAME_SIZE);
        let chunk = this.remaining.split_to(take);
        Poll::Ready(Some(Ok(Frame::data(chunk))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let frames = self.remaining.len().div_ceil(FRAME_SIZE);
        (frames, Some(frames))
    }
}

impl Drop for TransferStream {
    fn drop(&mut self) {
        if self.remaining.is_empty() {
            debug!(document = %self.label, bytes = self.total, "Document transfer complete");
        } else {
            let err = VaultError::UpstreamWrite(format!(
                "{} stopped after {} of {} bytes",
                self.label,
                self.sent(),
                self.total
            ));
            error!(
                document = %self.label,
                sent = self.sent(),
                total = self.total,
                "{}",
                err
            );
        }
    }
}
