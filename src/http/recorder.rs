//! Response recording module
//!
//! `RecordingBody` wraps an outgoing body, counts the data bytes that
//! actually leave through it and writes the access log line once the
//! body finishes, fails, or is dropped by a disconnecting client.

use hyper::body::{Body, Buf, Frame, SizeHint};
use hyper::StatusCode;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use crate::logger::{self, AccessLogEntry};

/// Final status and byte count of one response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseOutcome {
    pub status: StatusCode,
    pub bytes_written: u64,
}

/// Pending access log line for a response
#[derive(Debug)]
pub struct AccessLog {
    entry: AccessLogEntry,
    format: String,
    started: Instant,
}

impl AccessLog {
    pub fn new(entry: AccessLogEntry, format: impl Into<String>, started: Instant) -> Self {
        Self {
            entry,
            format: format.into(),
            started,
        }
    }
}

/// Body decorator that records a [`ResponseOutcome`]
///
/// Frames pass through unchanged.
pub struct RecordingBody<B> {
    inner: B,
    outcome: ResponseOutcome,
    access_log: Option<AccessLog>,
}

impl<B> RecordingBody<B> {
    pub fn new(inner: B, status: StatusCode, access_log: Option<AccessLog>) -> Self {
        Self {
            inner,
            outcome: ResponseOutcome {
                status,
                bytes_written: 0,
            },
            access_log,
        }
    }

    /// Outcome so far; final once the body has ended
    pub const fn outcome(&self) -> ResponseOutcome {
        self.outcome
    }

    /// Emit the access line. Only the first call writes anything.
    fn finish(&mut self) {
        if let Some(AccessLog {
            mut entry,
            format,
            started,
        }) = self.access_log.take()
        {
            entry.status = self.outcome.status.as_u16();
            entry.body_bytes = self.outcome.bytes_written;
            entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            logger::log_access(&entry, &format);
        }
    }
}

impl<B> Body for RecordingBody<B>
where
    B: Body + Unpin,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.outcome.bytes_written += data.remaining() as u64;
                }
            }
            Poll::Ready(Some(Err(_)) | None) => this.finish(),
            Poll::Pending => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for RecordingBody<B> {
    fn drop(&mut self) {
        self.finish();
    }
}
