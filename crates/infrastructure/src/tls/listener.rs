use std::io::BufReader;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;
use tracing::info;

use crate::acme_store::AcmeRecordStore;
use crate::tls::acme_client::{self, IssuedCertificate};
use crate::tls::cert_cache::{CachedCert, CertCache};

/// Owns the certificate lifecycle: load-from-cache, issue-if-missing, and
/// hand back a ready-to-use [`TlsAcceptor`] (spec.md §4.5 "HTTPS
/// bootstrap"). Renewal is the evictor-adjacent job's responsibility; this
/// type only covers the synchronous bootstrap obtain-before-listen step.
pub struct TlsLifecycle {
    cache: CertCache,
}

impl TlsLifecycle {
    pub fn new(cache_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            cache: CertCache::new(cache_dir),
        }
    }

    /// Loads a cached cert for `base_domain` or synchronously obtains one
    /// covering both `<base_domain>` and `*.<base_domain>`, then builds the
    /// [`TlsAcceptor`] HTTPS listeners use. Failure here is fatal to process
    /// startup (spec.md §4.5, step 3).
    pub async fn bootstrap(
        &self,
        directory_url: &str,
        contact_email: Option<&str>,
        base_domain: &str,
        acme_store: Arc<AcmeRecordStore>,
    ) -> anyhow::Result<TlsAcceptor> {
        let cert = match self.cache.load(base_domain).await {
            Some(cached) => {
                info!(base_domain, "loaded cached certificate");
                cached
            }
            None => {
                info!(base_domain, "no cached certificate, requesting one via ACME DNS-01");
                let domains = vec![base_domain.to_string(), format!("*.{base_domain}")];
                let issued: IssuedCertificate =
                    acme_client::obtain_certificate(directory_url, contact_email, &domains, acme_store).await?;
                let cached = CachedCert {
                    cert_pem: issued.cert_pem,
                    key_pem: issued.key_pem,
                };
                self.cache.store(base_domain, &cached).await?;
                cached
            }
        };

        build_acceptor(&cert)
    }
}

fn build_acceptor(cert: &CachedCert) -> anyhow::Result<TlsAcceptor> {
    let cert_chain = parse_cert_chain(&cert.cert_pem)?;
    let key = parse_private_key(&cert.key_pem)?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn parse_cert_chain(pem: &str) -> anyhow::Result<Vec<CertificateDer<'static>>> {
    let mut reader = BufReader::new(pem.as_bytes());
    let certs = rustls_pemfile::certs(&mut reader).collect::<Result<Vec<_>, _>>()?;
    Ok(certs)
}

fn parse_private_key(pem: &str) -> anyhow::Result<PrivateKeyDer<'static>> {
    let mut reader = BufReader::new(pem.as_bytes());
    rustls_pemfile::private_key(&mut reader)?
        .ok_or_else(|| anyhow::anyhow!("no private key found in PEM"))
}
