//! QUIC transport via Quinn.

use std::{net::SocketAddr, path::Path};

use quinn::{Connection, Endpoint};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};

use crate::error::ServerError;

/// A QUIC connection accepted by [`QuinnTransport`].
pub type QuinnConnection = Connection;

/// Bound QUIC endpoint.
#[derive(Debug)]
pub struct QuinnTransport {
    endpoint: Endpoint,
}

impl QuinnTransport {
    /// Bind a server endpoint.
    ///
    /// With both `cert_path` and `key_path` the PEM files are loaded;
    /// otherwise a self-signed certificate for `localhost` is generated.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `Config` if the address or TLS material is invalid
    /// - `Transport` if the socket cannot be bound
    pub fn bind(
        address: &str,
        cert_path: Option<&str>,
        key_path: Option<&str>,
    ) -> Result<Self, ServerError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid bind address '{address}': {e}")))?;

        let (certs, key) = match (cert_path, key_path) {
            (Some(cert), Some(key)) => load_pem(Path::new(cert), Path::new(key))?,
            _ => {
                tracing::warn!("no TLS certificate provided, generating a self-signed one");
                self_signed()?
            },
        };

        let server_config = quinn::ServerConfig::with_single_cert(certs, key)
            .map_err(|e| ServerError::Config(format!("TLS configuration: {e}")))?;

        let endpoint = Endpoint::server(server_config, addr)?;
        Ok(Self { endpoint })
    }

    /// Wait for the next connection.
    ///
    /// Returns `Ok(None)` once the endpoint has been closed.
    ///
    /// # Errors
    ///
    /// `Transport` if the handshake fails.
    pub async fn accept(&self) -> Result<Option<QuinnConnection>, ServerError> {
        let Some(incoming) = self.endpoint.accept().await else {
            return Ok(None);
        };
        let conn = incoming.await.map_err(|e| ServerError::Transport(e.to_string()))?;
        Ok(Some(conn))
    }

    /// Address the endpoint is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.endpoint.local_addr()?)
    }

    /// Stop accepting and close all connections.
    pub fn close(&self) {
        self.endpoint.close(0_u8.into(), b"shutdown");
    }
}

fn load_pem(
    cert_path: &Path,
    key_path: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), ServerError> {
    let cert_pem = std::fs::read(cert_path).map_err(|e| {
        ServerError::Config(format!("read certificate '{}': {e}", cert_path.display()))
    })?;
    let key_pem = std::fs::read(key_path)
        .map_err(|e| ServerError::Config(format!("read key '{}': {e}", key_path.display())))?;

    let certs = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServerError::Config(format!("parse certificate: {e}")))?;
    if certs.is_empty() {
        return Err(ServerError::Config(format!(
            "no certificate found in '{}'",
            cert_path.display()
        )));
    }

    let key = rustls_pemfile::private_key(&mut key_pem.as_slice())
        .map_err(|e| ServerError::Config(format!("parse key: {e}")))?
        .ok_or_else(|| {
            ServerError::Config(format!("no private key found in '{}'", key_path.display()))
        })?;

    Ok((certs, key))
}

fn self_signed() -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), ServerError> {
    let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .map_err(|e| ServerError::Config(format!("generate certificate: {e}")))?;
    let key = PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der());
    Ok((vec![certified.cert.der().clone()], key.into()))
}
