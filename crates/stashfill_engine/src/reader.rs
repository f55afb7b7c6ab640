//! Reassembles JSON frames from a chunked response body.
//!
//! The body carries a sequence of JSON objects with no delimiter other than
//! the object boundaries themselves, and chunk boundaries can fall anywhere,
//! including inside a multi-byte character. Text is accumulated until the
//! buffer holds one or more complete objects, which are emitted in order.
//!
//! Text that cannot start a JSON value is skipped up to the next `{`. When a
//! parse attempt fails and the buffer already holds the terminal marker, the
//! reader stops skipping, keeps emitting whatever complete objects arrive and
//! judges the remainder once the body ends.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use stashfill_logging::{fill_debug, fill_error, fill_trace, fill_warn};

use crate::{Frame, StreamDecoder, StreamError};

/// Substring the backend writes into its final `success` frame.
pub const DEFAULT_TERMINAL_MARKER: &str = r#""message": "Done""#;

#[derive(Debug, Clone)]
pub struct ReaderSettings {
    /// Upper bound on the wait for any single chunk. `None` waits forever.
    pub read_timeout: Option<Duration>,
    pub terminal_marker: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(300)),
            terminal_marker: DEFAULT_TERMINAL_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Streaming,
    /// Terminal marker seen in unparseable text. Complete objects are still
    /// emitted, but nothing is skipped and the remainder is judged at end of stream.
    DrainingTerminal,
    Finished,
}

pub struct FrameReader<S> {
    stream: S,
    decoder: StreamDecoder,
    settings: ReaderSettings,
    buffer: String,
    pending: VecDeque<Frame>,
    deferred_error: Option<StreamError>,
    mode: Mode,
    emitted: usize,
}

impl<S> FrameReader<S>
where
    S: Stream<Item = Result<Bytes, StreamError>> + Unpin,
{
    pub fn new(stream: S, decoder: StreamDecoder, settings: ReaderSettings) -> Self {
        Self {
            stream,
            decoder,
            settings,
            buffer: String::new(),
            pending: VecDeque::new(),
            deferred_error: None,
            mode: Mode::Streaming,
            emitted: 0,
        }
    }

    /// Number of frames handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Next frame in stream order, or `None` once the sequence has ended.
    ///
    /// An `error` frame is returned and then ends the sequence without any
    /// further reads.
    pub async fn next_frame(&mut self) -> Option<Result<Frame, StreamError>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                if frame.is_error() {
                    self.pending.clear();
                    self.deferred_error = None;
                    self.mode = Mode::Finished;
                }
                self.emitted += 1;
                return Some(Ok(frame));
            }
            if self.mode == Mode::Finished {
                return self.deferred_error.take().map(Err);
            }

            match self.read_chunk().await {
                Ok(Some(chunk)) => {
                    fill_trace!("Read chunk of {} bytes", chunk.len());
                    let text = self.decoder.decode(&chunk);
                    self.buffer.push_str(&text);
                    self.parse_streaming();
                }
                Ok(None) => self.finish_stream(),
                Err(err) => {
                    fill_error!("Fill stream aborted: {}", err);
                    self.mode = Mode::Finished;
                    self.deferred_error = Some(err);
                }
            }
        }
    }

    /// Adapts the reader into a lazy stream of frames.
    pub fn into_stream(self) -> impl Stream<Item = Result<Frame, StreamError>> {
        futures_util::stream::unfold(self, |mut reader| async move {
            reader.next_frame().await.map(|item| (item, reader))
        })
    }

    async fn read_chunk(&mut self) -> Result<Option<Bytes>, StreamError> {
        let next = match self.settings.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.stream.next())
                .await
                .map_err(|_| StreamError::Timeout(limit))?,
            None => self.stream.next().await,
        };
        next.transpose()
    }

    fn parse_streaming(&mut self) {
        loop {
            let Err(err) = self.parse_buffer() else {
                return;
            };
            if self.mode == Mode::DrainingTerminal
                || self.pending.back().is_some_and(Frame::is_error)
            {
                return;
            }
            if err.is_eof() {
                fill_debug!("Frame split across chunks; buffering {} bytes", self.buffer.len());
                return;
            }
            if self.buffer.contains(&self.settings.terminal_marker) {
                fill_warn!(
                    "Terminal frame unparseable ({}); reading until end of stream",
                    err
                );
                self.mode = Mode::DrainingTerminal;
                return;
            }
            fill_warn!("Unparseable fragment in fill stream ({})", err);
            self.skip_unparseable();
        }
    }

    /// Drops text at the front of the buffer up to the next candidate object start.
    fn skip_unparseable(&mut self) {
        let start = self.buffer.len() - self.buffer.trim_start().len();
        let resume = self.buffer[start..]
            .char_indices()
            .skip(1)
            .find(|(_, ch)| *ch == '{')
            .map_or(self.buffer.len(), |(offset, _)| start + offset);
        let dropped: String = self.buffer.drain(..resume).collect();
        fill_warn!(
            "Discarded {} bytes of non-frame text: {:?}",
            dropped.len(),
            dropped.trim().chars().take(80).collect::<String>()
        );
    }

    fn finish_stream(&mut self) {
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        let draining = self.mode == Mode::DrainingTerminal;
        self.mode = Mode::Finished;

        let outcome = self.parse_buffer();
        let leftover = !self.buffer.trim().is_empty();
        let error = match outcome {
            Err(err) if draining || self.buffer.contains(&self.settings.terminal_marker) => {
                Some(StreamError::MalformedFrame(err.to_string()))
            }
            Err(err) => Some(StreamError::Connection(format!(
                "stream ended mid-frame: {err}"
            ))),
            Ok(()) if leftover => Some(StreamError::Connection(
                "stream ended with trailing data".into(),
            )),
            Ok(()) if self.emitted == 0 && self.pending.is_empty() => Some(
                StreamError::Connection("stream closed before any frame".into()),
            ),
            Ok(()) => None,
        };
        if let Some(err) = &error {
            fill_error!("Fill stream failed: {}", err);
        }
        self.deferred_error = error;
    }

    /// Moves every complete object at the front of the buffer into `pending`.
    ///
    /// Returns the error that stopped parsing, if any; an end-of-input error
    /// means the last object is still incomplete.
    fn parse_buffer(&mut self) -> Result<(), serde_json::Error> {
        let mut values = Vec::new();
        let mut consumed = 0;
        let outcome = {
            let mut iter = serde_json::Deserializer::from_str(&self.buffer).into_iter::<Value>();
            loop {
                match iter.next() {
                    Some(Ok(value)) => {
                        consumed = iter.byte_offset();
                        values.push(value);
                    }
                    Some(Err(err)) => break Err(err),
                    None => break Ok(()),
                }
            }
        };
        self.buffer.drain(..consumed);

        for value in values {
            match serde_json::from_value::<Frame>(value) {
                Ok(frame) => {
                    let stop = frame.is_error();
                    self.pending.push_back(frame);
                    if stop {
                        break;
                    }
                }
                Err(err) => fill_warn!("Skipping unrecognized frame: {}", err),
            }
        }
        outcome
    }
}
