//! Pluggable transport for CDP frames.
//!
//! A [`Transport`] moves whole text frames in and out without knowing
//! anything about CDP request/response correlation; that is the
//! [`crate::session::Session`]'s job. Two implementations are built in:
//! [`websocket::WebSocketTransport`] (the normal case) and
//! [`pipe::PipeTransport`] (newline-delimited frames over a raw
//! `AsyncRead + AsyncWrite` pair, e.g. a spawned browser's stdio).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CdpError;

pub mod pipe;
pub mod websocket;

/// A bidirectional channel for whole CDP text frames.
///
/// Implementations are not required to be internally buffered beyond what
/// is needed to hand back one frame per [`Transport::receive`] call; the
/// session controller owns all higher-level buffering and correlation.
#[async_trait]
pub trait Transport: Send {
    /// Send one frame (a complete JSON document) to the peer.
    async fn send(&mut self, frame: String) -> Result<(), CdpError>;

    /// Wait for and return the next frame from the peer.
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly.
    async fn receive(&mut self) -> Result<Option<String>, CdpError>;

    /// Close the transport. Implementations should make this idempotent.
    async fn close(&mut self) -> Result<(), CdpError>;

    /// The transport's timer primitive: suspend for `seconds`, returning the
    /// actual elapsed time. Every built-in transport shares this default,
    /// backed by `tokio::time::sleep`; a transport with its own clock (e.g.
    /// a simulated one in tests) can override it.
    async fn sleep(&self, seconds: f64) -> Duration {
        let start = tokio::time::Instant::now();
        tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
        start.elapsed()
    }
}
