use std::sync::Arc;

use futures::StreamExt;
use instant_acme::{
    Account, AuthorizationStatus, ChallengeType, Identifier, NewAccount, NewOrder, OrderStatus,
    RetryPolicy,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use hookd_domain::AcmeRecord;

use crate::acme_store::AcmeRecordStore;

pub const LETS_ENCRYPT_PRODUCTION: &str = "https://acme-v02.api.letsencrypt.org/directory";
pub const LETS_ENCRYPT_STAGING: &str = "https://acme-staging-v02.api.letsencrypt.org/directory";

#[derive(Debug, Error)]
pub enum AcmeError {
    #[error("ACME protocol error: {0}")]
    Protocol(#[from] instant_acme::Error),
    #[error("challenge type {0:?} not offered for {1}")]
    ChallengeNotOffered(ChallengeType, String),
    #[error("order ended in unexpected state: {0:?}")]
    OrderFailed(OrderStatus),
}

pub struct IssuedCertificate {
    pub cert_pem: String,
    pub key_pem: String,
}

/// Obtains a certificate for `domains` via ACME DNS-01, backed by the local
/// [`AcmeRecordStore`] instead of a filesystem or a live DNS provider API
/// (spec.md §4.5 "HTTPS bootstrap", step 2-3). Each challenge TXT record is
/// appended before the challenge is marked ready and removed once the order
/// resolves, win or lose.
pub async fn obtain_certificate(
    directory_url: &str,
    contact_email: Option<&str>,
    domains: &[String],
    acme_store: Arc<AcmeRecordStore>,
) -> Result<IssuedCertificate, AcmeError> {
    info!(?domains, "starting ACME DNS-01 flow");

    let account = ensure_account(directory_url, contact_email).await?;

    let identifiers: Vec<Identifier> = domains.iter().map(|d| Identifier::Dns(d.clone())).collect();
    let mut order = account.new_order(&NewOrder::new(&identifiers)).await?;
    info!(url = %order.url(), "ACME order created");

    let mut deployed: Vec<(String, AcmeRecord)> = Vec::new();
    let mut auths = order.authorizations();
    while let Some(auth_result) = auths.next().await {
        let mut auth = auth_result?;
        let domain = auth.identifier().to_string();

        if auth.status == AuthorizationStatus::Valid {
            debug!(domain, "authorization already valid");
            continue;
        }

        let mut challenge = auth.challenge(ChallengeType::Dns01).ok_or_else(|| {
            AcmeError::ChallengeNotOffered(ChallengeType::Dns01, domain.clone())
        })?;

        let zone = domain.clone();
        let record = AcmeRecord::new("_acme-challenge", challenge.key_authorization().dns_value(), 120);
        acme_store.append(&zone, vec![record.clone()]);
        deployed.push((zone, record));

        challenge.set_ready().await?;
        info!(domain, "DNS-01 challenge deployed, verification triggered");
    }

    let retry_policy = RetryPolicy::default();
    let state = order.poll_ready(&retry_policy).await?;

    for (zone, record) in &deployed {
        acme_store.delete(zone, std::slice::from_ref(record));
    }

    if state != OrderStatus::Ready && state != OrderStatus::Valid {
        warn!(?state, "ACME order did not reach ready/valid");
        return Err(AcmeError::OrderFailed(state));
    }

    let key_pem = order.finalize().await?;
    let cert_pem = order.poll_certificate(&retry_policy).await?;

    info!(?domains, "certificate issued");
    Ok(IssuedCertificate { cert_pem, key_pem })
}

async fn ensure_account(directory_url: &str, contact_email: Option<&str>) -> Result<Account, AcmeError> {
    let contact = contact_email.map(|e| format!("mailto:{e}"));
    let contact_refs: Vec<&str> = contact.iter().map(|s| s.as_str()).collect();

    let new_account = NewAccount {
        contact: &contact_refs,
        terms_of_service_agreed: true,
        only_return_existing: false,
    };

    let builder = Account::builder()?;
    let (account, _credentials) = builder.create(&new_account, directory_url.to_string(), None).await?;
    Ok(account)
}
