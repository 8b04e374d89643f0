//! Async line splitter (byte-based).
//!
//! Lines are read as raw bytes up to `\n` and decoded afterwards, so the
//! decoding policy decides what happens to invalid UTF-8 rather than the
//! reader. `BufReader::lines()` would terminate on the first bad byte with
//! no way to tell which line it was.

use async_stream::try_stream;
use futures_util::Stream;
use streamlog_core::{LineDecoding, StreamLogError, StreamLoggerConfig, TrailingFragment};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::debug;

/// Pull-based splitter turning a byte stream into terminator-stripped lines.
///
/// `\n` terminates a line; a `\r` directly before it is stripped too.
/// Exhaustion (`Ok(None)`) is reported separately from failure (`Err`), and
/// both are final: later calls return `Ok(None)` without touching the stream.
pub struct LineSplitter<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    trailing_fragment: TrailingFragment,
    decoding: LineDecoding,
    line_number: u64,
    finished: bool,
}

impl<R: AsyncRead + Unpin> LineSplitter<R> {
    /// Create a splitter with default settings.
    pub fn new(stream: R) -> Self {
        Self::with_config(stream, &StreamLoggerConfig::default())
    }

    /// Create a splitter using the policies in `config`.
    pub fn with_config(stream: R, config: &StreamLoggerConfig) -> Self {
        Self {
            reader: BufReader::new(stream),
            buf: Vec::with_capacity(config.initial_buffer_capacity),
            trailing_fragment: config.trailing_fragment,
            decoding: config.decoding,
            line_number: 0,
            finished: false,
        }
    }

    /// Number of lines produced so far (including one that failed to decode).
    pub const fn lines_read(&self) -> u64 {
        self.line_number
    }

    /// Whether the splitter has hit end-of-stream or an error.
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the next line.
    ///
    /// Suspends only while waiting for bytes from the stream.
    pub async fn next_line(&mut self) -> Result<Option<String>, StreamLogError> {
        if self.finished {
            return Ok(None);
        }

        self.buf.clear();
        let read = match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };

        if read == 0 {
            self.finished = true;
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        } else {
            // EOF in the middle of a line
            self.finished = true;
            if self.trailing_fragment == TrailingFragment::Discard {
                debug!(
                    bytes = self.buf.len(),
                    "discarding unterminated trailing fragment"
                );
                return Ok(None);
            }
        }

        self.line_number += 1;
        self.decode().map(Some)
    }

    fn decode(&mut self) -> Result<String, StreamLogError> {
        match self.decoding {
            LineDecoding::Lossy => Ok(String::from_utf8_lossy(&self.buf).into_owned()),
            LineDecoding::Strict => match std::str::from_utf8(&self.buf) {
                Ok(text) => Ok(text.to_owned()),
                Err(source) => {
                    self.finished = true;
                    Err(StreamLogError::Decode {
                        line: self.line_number,
                        source,
                    })
                }
            },
        }
    }

    /// Turn the splitter into a lazy stream of lines.
    ///
    /// The stream ends after end-of-stream, or right after yielding the
    /// first error.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<String, StreamLogError>> {
        try_stream! {
            while let Some(line) = self.next_line().await? {
                yield line;
            }
        }
    }
}
