//! Simulated participant speaking the wire protocol.

use std::time::Duration;

use lectern_proto::{ClientMessage, ServerMessage};
use lectern_server::{read_frame, write_frame};
use tokio::io::AsyncWriteExt;
use turmoil::net::{
    TcpStream,
    tcp::{OwnedReadHalf, OwnedWriteHalf},
};

use crate::sim_server::SIM_PORT;

type BoxError = Box<dyn std::error::Error>;

/// One participant connected to a simulated server.
pub struct SimParticipant {
    reader: OwnedReadHalf,
    writer: OwnedWriteHalf,
}

impl SimParticipant {
    /// Connect to `host`.
    pub async fn connect(host: &str) -> Result<Self, BoxError> {
        let stream = TcpStream::connect((host, SIM_PORT)).await?;
        let (reader, writer) = stream.into_split();
        Ok(Self { reader, writer })
    }

    /// Send a message.
    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), BoxError> {
        let mut buf = Vec::new();
        message.to_frame()?.encode(&mut buf)?;
        write_frame(&mut self.writer, &buf).await?;
        Ok(())
    }

    /// Wait for the next message.
    pub async fn recv(&mut self) -> Result<ServerMessage, BoxError> {
        let frame = read_frame(&mut self.reader).await?.ok_or("server closed the stream")?;
        Ok(ServerMessage::from_frame(&frame)?)
    }

    /// Next message if one arrives within `wait`.
    pub async fn try_recv(&mut self, wait: Duration) -> Result<Option<ServerMessage>, BoxError> {
        match tokio::time::timeout(wait, self.recv()).await {
            Ok(message) => message.map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<(), BoxError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
