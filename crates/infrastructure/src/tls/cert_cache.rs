use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

/// A filesystem-backed cache for the issued certificate and its private
/// key, keyed by base domain (spec.md §4.5 "HTTPS bootstrap", step 4:
/// "Cache certificates in a filesystem directory for reuse and scheduled
/// renewal").
pub struct CertCache {
    dir: PathBuf,
}

pub struct CachedCert {
    pub cert_pem: String,
    pub key_pem: String,
}

impl CertCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn cert_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.cert.pem"))
    }

    fn key_path(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.key.pem"))
    }

    pub async fn load(&self, domain: &str) -> Option<CachedCert> {
        let cert_pem = fs::read_to_string(self.cert_path(domain)).await.ok()?;
        let key_pem = fs::read_to_string(self.key_path(domain)).await.ok()?;
        Some(CachedCert { cert_pem, key_pem })
    }

    pub async fn store(&self, domain: &str, cert: &CachedCert) -> anyhow::Result<()> {
        ensure_dir(&self.dir).await?;
        fs::write(self.cert_path(domain), &cert.cert_pem).await?;
        fs::write(self.key_path(domain), &cert.key_pem).await?;
        debug!(domain, dir = %self.dir.display(), "cached issued certificate");
        Ok(())
    }
}

async fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if fs::metadata(dir).await.is_err() {
        fs::create_dir_all(dir).await?;
    }
    Ok(())
}
