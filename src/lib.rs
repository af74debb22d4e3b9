//! # cdtp - Chrome DevTools Protocol dispatcher
//!
//! A client-side dispatcher for the Chrome DevTools Protocol (CDP): it opens
//! a WebSocket session with a running Chrome/Chromium browser, correlates
//! outbound requests with inbound replies, and demultiplexes unsolicited
//! browser events to subscribers. It also performs the small HTTP discovery
//! dance (`/json/version`, `/json/list`, `/json/new`, `/json/activate`,
//! `/json/close`) CDP layers over the browser's debug port before any
//! WebSocket is opened.
//!
//! This crate handles:
//! - WebSocket and pipe transport to a CDP endpoint
//! - HTTP discovery of tabs and browser-level metadata
//! - Request/reply correlation and event fan-out
//! - A small set of high-level `Runtime` helpers (`evaluate`, `eval`,
//!   `callFunctionOn`)
//!
//! It does not implement the CDP semantics of any individual domain (Page,
//! DOM, Network, …) beyond those `Runtime` shapes, and does not reconnect
//! automatically — a closed session is terminal.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cdtp::{Session, ConnectOptions};
//!
//! # async fn example() -> Result<(), cdtp::CdpError> {
//! let session = Session::connect(
//!     ConnectOptions::new().endpoint("http://localhost:9222"),
//! ).await?;
//!
//! let value = cdtp::helpers::eval(&session, "1 + 2").await?;
//! println!("1 + 2 = {value}");
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Selecting a tab
//!
//! ```no_run
//! use cdtp::{Session, ConnectOptions, TabSelector};
//! use regex::Regex;
//!
//! # async fn example() -> Result<(), cdtp::CdpError> {
//! let session = Session::connect(
//!     ConnectOptions::new()
//!         .endpoint("http://localhost:9222")
//!         .tab(TabSelector::Title(Regex::new("mail").unwrap())),
//! ).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending a command
//!
//! ```no_run
//! use cdtp::Session;
//! use serde_json::Value;
//!
//! # async fn example(session: &Session) -> Result<(), cdtp::CdpError> {
//! let result: Value = session
//!     .send_request("Runtime.evaluate", Some(serde_json::json!({
//!         "expression": "document.title",
//!         "returnByValue": true,
//!     })))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Subscribing to events
//!
//! ```no_run
//! # use cdtp::Session;
//! # async fn example(session: &Session) {
//! let (_handle, mut events) = session.subscribe("Page.loadEventFired");
//! while let Some(event) = events.recv().await {
//!     println!("{}: {:?}", event.method, event.params);
//! }
//! # }
//! ```
//!
//! ## Error handling
//!
//! ```no_run
//! use cdtp::{Session, ConnectOptions, CdpError};
//!
//! # async fn example() {
//! match Session::connect(ConnectOptions::new().endpoint("http://localhost:9222")).await {
//!     Ok(_session) => println!("connected"),
//!     Err(CdpError::NotFound(what)) => println!("no matching tab: {what}"),
//!     Err(CdpError::Protocol { code, message, .. }) => {
//!         println!("CDP error {code}: {message}");
//!     }
//!     Err(e) => println!("other error: {e}"),
//! }
//! # }
//! ```
//!
//! ## Module organization
//!
//! - [`session`] - the session controller: connect, close, sendRequest,
//!   subscribe
//! - [`transport`] - the pluggable WebSocket/pipe transport
//! - [`discovery`] - the HTTP `/json/*` client
//! - [`dispatcher`] - inbound-frame routing
//! - [`pending`] - the pending-request table
//! - [`subscriptions`] - the subscription registry
//! - [`message`] - wire message shapes
//! - [`helpers`] - `evaluate`/`eval`/`callFunctionOn`/`protocolVersion`/`getDomains`
//! - [`protocol`] - the minimal `Runtime` CDP type definitions
//! - [`error`] - error types

pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod helpers;
pub mod message;
pub mod pending;
pub mod protocol;
pub mod session;
pub mod subscriptions;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use discovery::{BrowserVersion, DiscoveryClient, DiscoveryOptions, TabRecord};
pub use error::CdpError;
pub use message::{CdpEvent, CdpMessage, CdpRequest, CdpResponse};
pub use session::{ConnectOptions, Session, SessionState, TabSelector};
pub use subscriptions::SubscriptionHandle;
