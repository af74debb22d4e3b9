//! Newline-delimited [`Transport`] over a raw byte stream.
//!
//! Used for talking to a browser over its stdio pipes instead of a
//! WebSocket (e.g. a child process started with two file descriptors
//! supplied directly): each frame is one JSON document terminated by `\n`,
//! buffered with [`tokio::io::BufReader`].

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::Transport;
use crate::error::CdpError;

/// A [`Transport`] that frames messages over any `AsyncRead + AsyncWrite`
/// pair, one JSON document per frame, delimited by `\n`.
pub struct PipeTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R, W> PipeTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wrap an existing read/write pair (e.g. a child process's stdout and
    /// stdin) as a pipe transport.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }
}

#[async_trait::async_trait]
impl<R, W> Transport for PipeTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: String) -> Result<(), CdpError> {
        debug!(len = frame.len(), "writing pipe frame");
        self.writer
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| CdpError::SendFailed(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(|e| CdpError::SendFailed(e.to_string()))?;
        self.writer
            .flush()
            .await
            .map_err(|e| CdpError::SendFailed(e.to_string()))
    }

    async fn receive(&mut self) -> Result<Option<String>, CdpError> {
        let mut buf = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| CdpError::ConnectionFailed(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| CdpError::ConnectionFailed(format!("non-UTF-8 pipe frame: {e}")))
    }

    async fn close(&mut self) -> Result<(), CdpError> {
        self.writer
            .shutdown()
            .await
            .map_err(|e| CdpError::SendFailed(e.to_string()))
    }
}
