use std::net::Ipv4Addr;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// A recursive resolver independent of the process's own authoritative
/// responder, used during HTTPS bootstrap so that looking up Let's Encrypt's
/// hostnames never round-trips through our own DNS responder (spec.md §4.5
/// "HTTPS bootstrap", step 1).
pub struct RecursiveResolver {
    resolver: TokioAsyncResolver,
}

impl RecursiveResolver {
    /// Cloudflare primary, Google as the fallback nameserver group — the
    /// defaults spec.md §4.5 calls out as acceptable.
    pub fn new() -> Self {
        let mut config = ResolverConfig::cloudflare();
        for ns in ResolverConfig::google().name_servers() {
            config.add_name_server(ns.clone());
        }
        let resolver = TokioAsyncResolver::tokio(config, ResolverOpts::default());
        Self { resolver }
    }

    pub async fn lookup_ipv4(&self, host: &str) -> anyhow::Result<Vec<Ipv4Addr>> {
        let response = self.resolver.ipv4_lookup(host).await?;
        Ok(response.iter().map(|r| r.0).collect())
    }
}

impl Default for RecursiveResolver {
    fn default() -> Self {
        Self::new()
    }
}
