//! Session controller: connect, close, request/response, subscriptions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::discovery::{DiscoveryClient, DiscoveryOptions, TabRecord};
use crate::dispatcher;
use crate::error::CdpError;
use crate::message::{CdpEvent, CdpRequest};
use crate::pending::PendingTable;
use crate::subscriptions::{SubscriptionHandle, SubscriptionRegistry};
use crate::transport::pipe::PipeTransport;
use crate::transport::websocket::WebSocketTransport;
use crate::transport::Transport;

/// Default timeout for a request awaiting its reply.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How a target tab is selected during [`Session::connect`].
///
/// Grounded on spec.md Design Note 9: replaces runtime type dispatch on the
/// `tab` option with a tagged variant.
#[derive(Debug, Clone)]
pub enum TabSelector {
    /// Pick the tab at this index in `listTabs()`'s result.
    Index(usize),
    /// Pick the first tab whose title matches this pattern.
    Title(Regex),
    /// Pick the tab with this exact id.
    Id(String),
    /// Pick by matching the `id` of an already-known tab record.
    Record(TabRecord),
}

/// Options controlling [`Session::connect`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// An explicit endpoint: an `http(s)://` base to discover against, or a
    /// `ws(s)://` URL to use directly.
    pub endpoint: Option<String>,
    /// Select an existing tab.
    pub tab: Option<TabSelector>,
    /// Open a brand new tab instead of attaching to an existing one.
    pub new_tab: Option<Option<String>>,
    /// Connect-time HTTP timeout (discovery) and WebSocket handshake
    /// timeout.
    pub timeout: Option<Duration>,
    /// Extra headers for discovery requests and the WebSocket upgrade.
    pub headers: HashMap<String, String>,
}

impl ConnectOptions {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect to an explicit endpoint (an `http(s)` discovery base or a
    /// `ws(s)` URL).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Select a tab to attach to.
    #[must_use]
    pub fn tab(mut self, selector: TabSelector) -> Self {
        self.tab = Some(selector);
        self
    }

    /// Open a new tab instead of attaching to an existing one.
    #[must_use]
    pub fn new_tab(mut self, url: Option<impl Into<String>>) -> Self {
        self.new_tab = Some(url.map(Into::into));
        self
    }

    /// Set the connect-time timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with discovery requests and the WebSocket upgrade.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// The session lifecycle, per spec.md section 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No transport open.
    Idle,
    /// `connect` is in progress.
    Connecting,
    /// Transport open, requests may be sent.
    Connected,
    /// `close` is in progress.
    Closing,
}

#[derive(Debug)]
struct Shared {
    pending: Mutex<PendingTable>,
    subscriptions: SubscriptionRegistry,
    message_id: AtomicU64,
    state: Mutex<SessionState>,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    tab: Mutex<Option<TabRecord>>,
}

/// A live connection to one browser tab.
///
/// Owns the pending-request table, the subscription registry, and the
/// sequence counter (spec.md components C–F), and drives the transport's
/// read loop on a background task.
#[derive(Debug)]
pub struct Session {
    shared: Arc<Shared>,
    io_task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl Session {
    fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(PendingTable::new()),
                subscriptions: SubscriptionRegistry::new(),
                message_id: AtomicU64::new(1),
                state: Mutex::new(SessionState::Idle),
                outbound: Mutex::new(None),
                tab: Mutex::new(None),
            }),
            io_task: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        *self.shared.state.lock().await
    }

    /// The tab record this session attached to, if resolved via HTTP
    /// discovery (absent for pipe transports and raw `ws://` endpoints).
    pub async fn tab(&self) -> Option<TabRecord> {
        self.shared.tab.lock().await.clone()
    }

    /// Connect to a browser tab over a WebSocket, resolving the endpoint
    /// per spec.md section 4.G.
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::NotFound`] or [`CdpError::MissingWebSocketUrl`]
    /// if tab selection fails, [`CdpError::MalformedEndpoint`] if an
    /// explicit endpoint's tab id cannot be extracted, or a transport/HTTP
    /// error from discovery or the WebSocket handshake.
    #[instrument(level = "info", skip(options))]
    pub async fn connect(options: ConnectOptions) -> Result<Self, CdpError> {
        let session = Self::new();
        session.do_connect(options).await?;
        Ok(session)
    }

    /// Connect using an already-open pipe (e.g. a spawned browser's stdio),
    /// per step 1 of the endpoint-resolution policy: no HTTP discovery is
    /// performed.
    #[instrument(level = "info", skip_all)]
    pub async fn connect_pipe<R, W>(reader: R, writer: W) -> Result<Self, CdpError>
    where
        R: tokio::io::AsyncRead + Unpin + Send + 'static,
        W: tokio::io::AsyncWrite + Unpin + Send + 'static,
    {
        let session = Self::new();
        let transport = PipeTransport::new(reader, writer);
        session.start(Box::new(transport)).await?;
        Ok(session)
    }

    /// Build a session already wired to a given transport, bypassing
    /// endpoint resolution. Used by tests to drive the dispatcher loop
    /// without a real socket.
    #[cfg(test)]
    pub(crate) async fn from_transport(transport: Box<dyn Transport>) -> Result<Self, CdpError> {
        let session = Self::new();
        session.start(transport).await?;
        Ok(session)
    }

    async fn do_connect(&self, options: ConnectOptions) -> Result<(), CdpError> {
        *self.shared.state.lock().await = SessionState::Connecting;
        let timeout_duration = options.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let resolved = self.resolve_endpoint(&options, timeout_duration).await;
        let ws_url = match resolved {
            Ok(url) => url,
            Err(e) => {
                *self.shared.state.lock().await = SessionState::Idle;
                return Err(e);
            }
        };

        let transport =
            WebSocketTransport::connect(&ws_url, &options.headers, timeout_duration).await;
        let transport = match transport {
            Ok(t) => t,
            Err(e) => {
                *self.shared.state.lock().await = SessionState::Idle;
                return Err(e);
            }
        };

        self.start(Box::new(transport)).await
    }

    /// Resolve the WebSocket URL per spec.md 4.G steps 2–8 (step 1, the pipe
    /// case, is handled by [`Self::connect_pipe`] instead).
    async fn resolve_endpoint(
        &self,
        options: &ConnectOptions,
        timeout_duration: Duration,
    ) -> Result<String, CdpError> {
        let discovery_options = DiscoveryOptions::new()
            .timeout(timeout_duration)
            .headers(options.headers.clone());

        if let Some(endpoint) = &options.endpoint {
            return self.resolve_explicit_endpoint(endpoint, &discovery_options).await;
        }

        let base = "http://localhost:9222".to_string();
        let client = DiscoveryClient::new(&base, &discovery_options)?;

        // Steps 3-6: an explicit tab selector takes priority over newTab.
        match &options.tab {
            Some(TabSelector::Index(index)) => {
                let tabs = client.list_tabs(None).await?;
                let tab = tabs
                    .into_iter()
                    .nth(*index)
                    .ok_or_else(|| CdpError::NotFound(format!("tab index {index}")))?;
                self.finish_tab_selection(tab).await
            }
            Some(TabSelector::Title(pattern)) => {
                let tabs = client.list_tabs(None).await?;
                let tab = tabs
                    .into_iter()
                    .find(|t| t.title.as_deref().is_some_and(|title| pattern.is_match(title)))
                    .ok_or_else(|| CdpError::NotFound(format!("title matching {pattern}")))?;
                self.finish_tab_selection(tab).await
            }
            Some(TabSelector::Record(record)) => {
                let tabs = client.list_tabs(None).await?;
                let tab = tabs
                    .into_iter()
                    .find(|t| t.id == record.id)
                    .ok_or_else(|| CdpError::NotFound(format!("tab id {}", record.id)))?;
                self.finish_tab_selection(tab).await
            }
            Some(TabSelector::Id(id)) => {
                let tabs = client.list_tabs(None).await?;
                let tab = tabs
                    .into_iter()
                    .find(|t| &t.id == id)
                    .ok_or_else(|| CdpError::NotFound(format!("tab id {id}")))?;
                self.finish_tab_selection(tab).await
            }
            None => {
                // Step 7: newTab.
                if let Some(new_tab_url) = &options.new_tab {
                    let tab = client.new_tab(new_tab_url.as_deref()).await?;
                    return self.finish_tab_selection(tab).await;
                }
                // Step 8: fall back to the first tab with a usable URL.
                let tabs = client.list_tabs(None).await?;
                let tab = tabs
                    .into_iter()
                    .find(|t| t.web_socket_debugger_url.is_some())
                    .ok_or_else(|| CdpError::NotFound("any tab with a webSocketDebuggerUrl".to_string()))?;
                self.finish_tab_selection(tab).await
            }
        }
    }

    async fn finish_tab_selection(&self, tab: TabRecord) -> Result<String, CdpError> {
        let ws_url = tab
            .web_socket_debugger_url
            .clone()
            .ok_or(CdpError::MissingWebSocketUrl)?;
        *self.shared.tab.lock().await = Some(tab);
        Ok(ws_url)
    }

    async fn resolve_explicit_endpoint(
        &self,
        endpoint: &str,
        discovery_options: &DiscoveryOptions,
    ) -> Result<String, CdpError> {
        let ws_url = crate::discovery::discover_websocket_url(endpoint, discovery_options).await?;
        let tab_id = ws_url
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CdpError::MalformedEndpoint(ws_url.clone()))?;
        *self.shared.tab.lock().await = Some(TabRecord {
            id: tab_id.to_string(),
            target_type: "page".to_string(),
            title: None,
            web_socket_debugger_url: Some(ws_url.clone()),
        });
        Ok(ws_url)
    }

    /// Hand off an already-open transport to the background read/write
    /// loops and transition to `Connected`.
    async fn start(&self, mut transport: Box<dyn Transport>) -> Result<(), CdpError> {
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
        *self.shared.outbound.lock().await = Some(outbound_tx);
        *self.shared.state.lock().await = SessionState::Connected;
        info!("session connected");

        let shared = self.shared.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    outbound = outbound_rx.recv() => {
                        match outbound {
                            Some(frame) => {
                                if let Err(e) = transport.send(frame).await {
                                    warn!(error = %e, "transport send failed, tearing down session");
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                    inbound = transport.receive() => {
                        match inbound {
                            Ok(Some(frame)) => {
                                let mut pending = shared.pending.lock().await;
                                dispatcher::dispatch(&frame, &mut pending, &shared.subscriptions);
                            }
                            Ok(None) => {
                                info!("transport closed by peer");
                                break;
                            }
                            Err(e) => {
                                warn!(error = %e, "transport receive failed, tearing down session");
                                break;
                            }
                        }
                    }
                }
            }
            let _ = transport.close().await;
            *shared.state.lock().await = SessionState::Idle;
            *shared.outbound.lock().await = None;
            shared.pending.lock().await.drain();
            debug!("session io loop ended");
        });

        *self.io_task.lock().await = Some(handle);
        Ok(())
    }

    /// Send a request and await its reply, using [`DEFAULT_REQUEST_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// See [`Self::send_request_with_timeout`].
    pub async fn send_request<P, R>(&self, method: &str, params: Option<P>) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        self.send_request_with_timeout(method, params, DEFAULT_REQUEST_TIMEOUT)
            .await
    }

    /// Send a request and await its reply, with an explicit timeout
    /// (spec.md 4.G `sendRequest`, extended per SPEC_FULL's supplemented
    /// per-command timeout override).
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::NotConnected`] outside the `Connected` state,
    /// [`CdpError::SerializationError`] if `params` cannot be serialized,
    /// [`CdpError::Timeout`] if no reply arrives in time, and
    /// [`CdpError::Protocol`] if the browser replies with an error.
    #[instrument(level = "debug", skip(self, params), fields(method = %method))]
    pub async fn send_request_with_timeout<P, R>(
        &self,
        method: &str,
        params: Option<P>,
        timeout_duration: Duration,
    ) -> Result<R, CdpError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if *self.shared.state.lock().await != SessionState::Connected {
            return Err(CdpError::NotConnected);
        }

        let id = self.shared.message_id.fetch_add(1, Ordering::Relaxed);
        let params_value: Option<Value> = params
            .map(|p| serde_json::to_value(p))
            .transpose()
            .map_err(|e| CdpError::SerializationError(e.to_string()))?;

        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: params_value,
        };

        // Register before sending so a reply racing the send cannot be lost.
        let reply_rx = {
            let mut pending = self.shared.pending.lock().await;
            pending.register(id)
        };

        let frame = serde_json::to_string(&request).map_err(|e| {
            CdpError::SerializationError(e.to_string())
        })?;

        let sent = {
            let outbound = self.shared.outbound.lock().await;
            match outbound.as_ref() {
                Some(tx) => tx.send(frame).is_ok(),
                None => false,
            }
        };
        if !sent {
            self.shared.pending.lock().await.cancel(id);
            return Err(CdpError::Disconnected);
        }

        let response = match timeout(timeout_duration, reply_rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(CdpError::Disconnected),
            Err(_) => {
                self.shared.pending.lock().await.cancel(id);
                return Err(CdpError::Timeout(timeout_duration));
            }
        };

        if let Some(error) = response.error {
            let message = match &error.data {
                Some(data) => format!("{}\n{}\n{}", error.message, data, error.code),
                None => error.message.clone(),
            };
            return Err(CdpError::Protocol {
                code: error.code,
                message,
                data: error.data,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result).map_err(CdpError::from)
    }

    /// Send a notification: like [`Self::send_request`] but does not wait
    /// for (or expect) a reply.
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::NotConnected`], [`CdpError::SerializationError`],
    /// or [`CdpError::Disconnected`] if the outbound channel is closed.
    pub async fn send_notification<P>(&self, method: &str, params: Option<P>) -> Result<(), CdpError>
    where
        P: Serialize,
    {
        if *self.shared.state.lock().await != SessionState::Connected {
            return Err(CdpError::NotConnected);
        }

        let params_value: Option<Value> = params
            .map(|p| serde_json::to_value(p))
            .transpose()
            .map_err(|e| CdpError::SerializationError(e.to_string()))?;

        let request = CdpRequest {
            id: self.shared.message_id.fetch_add(1, Ordering::Relaxed),
            method: method.to_string(),
            params: params_value,
        };
        let frame = serde_json::to_string(&request)
            .map_err(|e| CdpError::SerializationError(e.to_string()))?;

        let outbound = self.shared.outbound.lock().await;
        match outbound.as_ref() {
            Some(tx) => tx.send(frame).map_err(|_| CdpError::Disconnected),
            None => Err(CdpError::Disconnected),
        }
    }

    /// Subscribe to every event named `event_name`.
    pub fn subscribe(
        &self,
        event_name: impl Into<String>,
    ) -> (SubscriptionHandle, mpsc::UnboundedReceiver<CdpEvent>) {
        self.shared.subscriptions.subscribe(event_name)
    }

    /// Remove a subscription.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.shared.subscriptions.unsubscribe(handle);
    }

    /// Resolve with the first event whose name is in `event_names`.
    pub fn once_any(
        &self,
        event_names: Vec<String>,
    ) -> tokio::sync::oneshot::Receiver<CdpEvent> {
        self.shared.subscriptions.once_any(event_names)
    }

    /// Install the catch-all sink.
    pub fn set_sink(&self, sink: mpsc::UnboundedSender<CdpEvent>) {
        self.shared.subscriptions.set_sink(sink);
    }

    /// Remove the catch-all sink.
    pub fn clear_sink(&self) {
        self.shared.subscriptions.clear_sink();
    }

    /// Suspend for `seconds`, returning the actual elapsed time (spec.md
    /// section 6's `sleep` entry; suspension point (d) of section 5). Backed
    /// by the same timer primitive as [`Transport::sleep`] but does not
    /// require a connected session, since it never touches the transport.
    pub async fn sleep(&self, seconds: f64) -> Duration {
        let start = tokio::time::Instant::now();
        tokio::time::sleep(Duration::from_secs_f64(seconds.max(0.0))).await;
        start.elapsed()
    }

    /// Close the session: transition to `Closing`, close the transport,
    /// drain the pending-request table, clear subscriptions, transition to
    /// `Idle`. Safe to call when already `Idle`.
    #[instrument(level = "info", skip(self))]
    pub async fn close(&self) {
        *self.shared.state.lock().await = SessionState::Closing;
        *self.shared.outbound.lock().await = None;

        if let Some(handle) = self.io_task.lock().await.take() {
            let _ = handle.await;
        }

        self.shared.pending.lock().await.drain();
        *self.shared.state.lock().await = SessionState::Idle;
        info!("session closed");
    }
}

#[cfg(test)]
mod tests;
