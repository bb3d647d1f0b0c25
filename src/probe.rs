use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::parse_x509_certificate;

/// Default TLS port probed when the caller does not override it.
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Per-host bound on both the TCP connect and the TLS handshake.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid hostname: {0}")]
    InvalidHostname(String),
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),
    #[error("timed out after {}s", PROBE_TIMEOUT.as_secs())]
    Timeout,
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),
    #[error("peer presented no certificate")]
    NoPeerCertificate,
    #[error("failed to parse peer certificate: {0}")]
    CertificateParse(String),
}

impl ProbeError {
    /// Error category reported in the `type` field of an error notification.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::InvalidHostname(_) => "invalid hostname",
            ProbeError::Connect(_) => "connect",
            ProbeError::Timeout => "timeout",
            ProbeError::Handshake(_) => "handshake",
            ProbeError::NoPeerCertificate => "no peer certificate",
            ProbeError::CertificateParse(_) => "certificate parse",
        }
    }
}

/// Seam between the pipeline and the network, so scenario tests can script
/// probe outcomes per host.
pub trait CertProber {
    fn probe(
        &self,
        hostname: &str,
        port: u16,
    ) -> impl std::future::Future<Output = Result<DateTime<Utc>, ProbeError>> + Send;
}

/// Real prober: one TLS handshake per host against the system trust store,
/// reading the leaf certificate's notAfter.
pub struct TlsProber {
    connector: TlsConnector,
    timeout: Duration,
}

impl TlsProber {
    /// Build a prober validating against the platform's native root store.
    pub fn new() -> anyhow::Result<Self> {
        let mut roots = RootCertStore::empty();
        for cert in rustls_native_certs::load_native_certs()? {
            // Skip roots the platform store carries but rustls cannot parse.
            let _ = roots.add(cert);
        }
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(Self::with_config(Arc::new(config)))
    }

    /// Build a prober from an explicit client config (custom trust anchors).
    pub fn with_config(config: Arc<ClientConfig>) -> Self {
        Self {
            connector: TlsConnector::from(config),
            timeout: PROBE_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CertProber for TlsProber {
    async fn probe(&self, hostname: &str, port: u16) -> Result<DateTime<Utc>, ProbeError> {
        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|_| ProbeError::InvalidHostname(hostname.to_string()))?;

        let addr = format!("{hostname}:{port}");
        let tcp = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(ProbeError::Connect)?;

        let tls = timeout(self.timeout, self.connector.connect(server_name, tcp))
            .await
            .map_err(|_| ProbeError::Timeout)?
            .map_err(ProbeError::Handshake)?;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or(ProbeError::NoPeerCertificate)?;

        let (_, cert) = parse_x509_certificate(leaf.as_ref())
            .map_err(|e| ProbeError::CertificateParse(e.to_string()))?;
        let not_after = cert.validity().not_after.timestamp();
        DateTime::from_timestamp(not_after, 0)
            .ok_or_else(|| ProbeError::CertificateParse("notAfter out of range".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustls::pki_types::PrivateKeyDer;
    use rustls::ServerConfig;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Self-signed cert for localhost plus a client config trusting it.
    fn localhost_identity() -> (rcgen::CertifiedKey, Arc<ClientConfig>) {
        let identity = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let mut roots = RootCertStore::empty();
        roots.add(identity.cert.der().clone()).unwrap();
        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        (identity, Arc::new(config))
    }

    async fn spawn_tls_server(identity: &rcgen::CertifiedKey) -> std::net::SocketAddr {
        let key = PrivateKeyDer::Pkcs8(identity.key_pair.serialize_der().into());
        let server_config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![identity.cert.der().clone()], key)
            .unwrap();
        let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(server_config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((stream, _)) = listener.accept().await {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let mut buf = [0u8; 16];
                    let _ = tls.read(&mut buf).await;
                }
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_probe_reads_leaf_expiry() {
        let (identity, client_config) = localhost_identity();
        let addr = spawn_tls_server(&identity).await;

        let prober = TlsProber::with_config(client_config);
        let expiry = prober.probe("localhost", addr.port()).await.unwrap();

        // rcgen self-signed certs are long-lived; the exact instant depends on
        // its defaults, but it must parse and lie in the future.
        assert!(expiry > Utc::now());
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let (_, client_config) = localhost_identity();
        // bind-then-drop to get a port nothing listens on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let prober = TlsProber::with_config(client_config);
        let err = prober.probe("localhost", port).await.unwrap_err();
        assert_eq!(err.kind(), "connect");
    }

    #[tokio::test]
    async fn test_probe_handshake_failure_against_plain_tcp() {
        let (_, client_config) = localhost_identity();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // accept and immediately close without speaking TLS
            if let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let prober = TlsProber::with_config(client_config).with_timeout(Duration::from_secs(2));
        let err = prober.probe("localhost", addr.port()).await.unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Handshake(_) | ProbeError::Timeout
        ));
    }

    #[tokio::test]
    async fn test_probe_rejects_invalid_hostname() {
        let (_, client_config) = localhost_identity();
        let prober = TlsProber::with_config(client_config);
        let err = prober.probe("not a hostname", 443).await.unwrap_err();
        assert_eq!(err.kind(), "invalid hostname");
    }
}
