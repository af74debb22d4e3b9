//! In-memory transport double shared by unit tests across modules.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::error::CdpError;
use crate::session::Session;
use crate::transport::Transport;

struct ChannelTransport {
    inbound: UnboundedReceiver<String>,
    outbound: UnboundedSender<String>,
}

#[async_trait::async_trait]
impl Transport for ChannelTransport {
    async fn send(&mut self, frame: String) -> Result<(), CdpError> {
        self.outbound
            .send(frame)
            .map_err(|_| CdpError::Disconnected)
    }

    async fn receive(&mut self) -> Result<Option<String>, CdpError> {
        Ok(self.inbound.recv().await)
    }

    async fn close(&mut self) -> Result<(), CdpError> {
        Ok(())
    }
}

/// Build a connected session plus handles to feed it server frames and
/// observe what it sends, for driving a [`Session`] end to end without a
/// real socket.
pub(crate) async fn connected_session() -> (Session, UnboundedSender<String>, UnboundedReceiver<String>) {
    let (server_tx, client_rx) = unbounded_channel();
    let (client_tx, server_rx) = unbounded_channel();
    let transport = ChannelTransport {
        inbound: client_rx,
        outbound: client_tx,
    };
    let session = Session::from_transport(Box::new(transport)).await.unwrap();
    (session, server_tx, server_rx)
}
