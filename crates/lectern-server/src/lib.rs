//! Lectern production server.
//!
//! This crate provides the production server implementation using:
//! - Quinn for QUIC transport
//! - Tokio for async runtime
//! - System time and cryptographic RNG
//!
//! ## Architecture
//!
//! ```text
//! lectern-server
//!   ├─ SystemEnv          (production Environment impl)
//!   ├─ QuinnTransport     (QUIC via Quinn)
//!   ├─ ServerDriver       (decode + SessionEngine + dispatch)
//!   └─ Outbox             (per-connection bounded queues)
//! ```
//!
//! Every bidirectional QUIC stream is one participant. [`serve_stream`] runs
//! a participant to completion and is generic over the byte stream, so the
//! simulation harness drives the same code over simulated TCP.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod error;
mod outbox;
mod system_env;
mod transport;
mod wire;

use std::sync::Arc;

use bytes::Bytes;
pub use driver::{DriverError, ServerConfig as DriverConfig, ServerDriver, ServerEvent};
pub use error::ServerError;
use lectern_core::{ClaimSecret, ConnId, Environment, SecretProvider};
pub use outbox::Outbox;
pub use system_env::SystemEnv;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    sync::{Mutex, mpsc},
};
pub use transport::{QuinnConnection, QuinnTransport};
pub use wire::{read_frame, write_frame};

/// Driver shared by every connection task.
pub type SharedDriver<E> = Arc<Mutex<ServerDriver<E>>>;

/// Wrap a driver for sharing across connection tasks.
pub fn shared<E: Environment>(driver: ServerDriver<E>) -> SharedDriver<E> {
    Arc::new(Mutex::new(driver))
}

/// Server configuration for the production runtime.
#[derive(Debug, Clone)]
pub struct ServerRuntimeConfig {
    /// Address to bind to (e.g., "0.0.0.0:4433")
    pub bind_address: String,
    /// Path to TLS certificate (PEM format)
    pub cert_path: Option<String>,
    /// Path to TLS private key (PEM format)
    pub key_path: Option<String>,
    /// Operator-supplied claim secret; generated when absent
    pub claim_secret: Option<String>,
    /// Driver configuration (limits, queue sizes)
    pub driver: DriverConfig,
}

impl Default for ServerRuntimeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4433".to_string(),
            cert_path: None,
            key_path: None,
            claim_secret: None,
            driver: DriverConfig::default(),
        }
    }
}

/// Production Lectern server.
///
/// Wraps `ServerDriver` with Quinn QUIC transport and system environment.
pub struct Server {
    driver: SharedDriver<SystemEnv>,
    transport: QuinnTransport,
    env: SystemEnv,
    secret: ClaimSecret,
}

impl Server {
    /// Create and bind a new server.
    ///
    /// Logs the claim secret at `info` so the operator can pass it on.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Binding to the address fails
    /// - TLS configuration is invalid
    pub fn bind(config: ServerRuntimeConfig) -> Result<Self, ServerError> {
        let env = SystemEnv::new();
        let secret = SecretProvider::new(env.clone(), config.claim_secret).secret().clone();
        tracing::info!(
            "To claim presenter mode use the following password: {}",
            secret.expose()
        );

        let driver = ServerDriver::new(env.clone(), config.driver, secret.clone());
        let transport = QuinnTransport::bind(
            &config.bind_address,
            config.cert_path.as_deref(),
            config.key_path.as_deref(),
        )?;

        Ok(Self { driver: shared(driver), transport, env, secret })
    }

    /// Run the server, accepting connections and serving their streams.
    ///
    /// Returns once the endpoint is closed.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Server starting on {}", self.transport.local_addr()?);

        loop {
            match self.transport.accept().await {
                Ok(Some(conn)) => {
                    let driver = Arc::clone(&self.driver);
                    let env = self.env.clone();
                    tokio::spawn(handle_connection(conn, driver, env));
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                },
            }
        }

        Ok(())
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        self.transport.local_addr()
    }

    /// Secret a presenter must supply.
    pub fn claim_secret(&self) -> &ClaimSecret {
        &self.secret
    }
}

/// Accept participant streams on one QUIC connection.
async fn handle_connection(conn: QuinnConnection, driver: SharedDriver<SystemEnv>, env: SystemEnv) {
    tracing::debug!(remote = %conn.remote_address(), "new QUIC connection");

    loop {
        match conn.accept_bi().await {
            Ok((send, recv)) => {
                let conn_id = env.random_u64();
                let driver = Arc::clone(&driver);
                tokio::spawn(async move {
                    if let Err(e) = serve_stream(conn_id, recv, send, driver).await {
                        tracing::debug!(conn_id, "stream error: {}", e);
                    }
                });
            },
            Err(e) => {
                tracing::debug!("Connection closed: {}", e);
                break;
            },
        }
    }
}

/// Serve one participant until its stream ends.
///
/// Registers the participant, spawns a writer draining its outbound queue,
/// feeds every inbound frame to the driver, and unregisters it on the way
/// out. A frame that fails to decode drops the participant.
///
/// # Errors
///
/// Returns the driver error if the participant is refused at registration
/// (duplicate id or capacity exhausted).
pub async fn serve_stream<E, R, W>(
    conn_id: ConnId,
    mut reader: R,
    mut writer: W,
    driver: SharedDriver<E>,
) -> Result<(), ServerError>
where
    E: Environment,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut outbound = {
        let mut driver = driver.lock().await;
        let (tx, rx) = mpsc::channel::<Bytes>(driver.config().outbound_queue.max(1));
        driver.handle(ServerEvent::ConnectionAccepted { conn_id, outbound: tx })?;
        rx
    };
    tracing::debug!(conn_id, "participant connected");

    let writer_task = tokio::spawn(async move {
        while let Some(bytes) = outbound.recv().await {
            if let Err(e) = write_frame(&mut writer, &bytes).await {
                tracing::debug!(conn_id, "write failed: {}", e);
                break;
            }
        }
        let _ = writer.shutdown().await;
    });

    let reason = loop {
        match read_frame(&mut reader).await {
            Ok(Some(frame)) => {
                let mut driver = driver.lock().await;
                if let Err(e) = driver.handle(ServerEvent::FrameReceived { conn_id, frame }) {
                    tracing::warn!(conn_id, "dropping connection: {}", e);
                    break e.to_string();
                }
            },
            Ok(None) => break "peer closed".to_string(),
            Err(e) => {
                tracing::warn!(conn_id, "dropping connection: {}", e);
                break e.to_string();
            },
        }
    };

    {
        let mut driver = driver.lock().await;
        if let Err(e) = driver.handle(ServerEvent::ConnectionClosed { conn_id, reason }) {
            tracing::debug!(conn_id, "close failed: {}", e);
        }
    }

    if let Err(e) = writer_task.await {
        tracing::debug!(conn_id, "writer task failed: {}", e);
    }
    Ok(())
}
