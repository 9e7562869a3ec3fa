use std::collections::BTreeMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::rdata::{A, AAAA, MX, NS, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use hookd_application::{HookStore, IdGenerator};
use hookd_domain::Interaction;
use tracing::{debug, warn};

use crate::acme_store::AcmeRecordStore;

/// Authoritative responder for the configured base domain and all of its
/// subdomains (spec.md §4.3). Every question is classified into exactly one
/// of: the ACME-challenge path, the capture-and-answer path for our domain,
/// or "not ours" — mirroring the dispatch shape of a conventional
/// authoritative handler, but driven by the Store instead of a zone file.
pub struct HookdDnsHandler {
    store: Arc<dyn HookStore>,
    acme_store: Arc<AcmeRecordStore>,
    id_gen: Arc<dyn IdGenerator>,
    base_domain: String,
    outbound_ipv4: IpAddr,
}

impl HookdDnsHandler {
    pub fn new(
        store: Arc<dyn HookStore>,
        acme_store: Arc<AcmeRecordStore>,
        id_gen: Arc<dyn IdGenerator>,
        base_domain: String,
        outbound_ipv4: IpAddr,
    ) -> Self {
        Self {
            store,
            acme_store,
            id_gen,
            base_domain: base_domain.trim_end_matches('.').to_lowercase(),
            outbound_ipv4,
        }
    }

    fn normalize(qname: &str) -> String {
        qname.trim_end_matches('.').to_lowercase()
    }

    /// The label immediately left of the base domain, if `qname` is a
    /// strict subdomain of it. `None` for the base domain itself.
    fn hook_id_of<'a>(&self, qname: &'a str) -> Option<&'a str> {
        let suffix = format!(".{}", self.base_domain);
        qname.strip_suffix(&suffix).filter(|label| !label.is_empty())
    }

    fn is_our_domain(&self, qname: &str) -> bool {
        qname == self.base_domain || qname.ends_with(&format!(".{}", self.base_domain))
    }

    /// spec.md §4.4: walk the suffixes of the unqualified qname, treating
    /// each as a candidate zone, and collect the ACME records whose stored
    /// name — joined with that zone — reconstructs `qname`.
    fn resolve_acme_txt(&self, qname: &str) -> Vec<Record> {
        let parts: Vec<&str> = qname.split('.').collect();
        for i in 1..parts.len() {
            let zone = format!("{}.", parts[i..].join("."));
            let records = self.acme_store.get(zone.trim_end_matches('.'));
            if records.is_empty() {
                continue;
            }
            let matches: Vec<Record> = records
                .iter()
                .filter(|r| {
                    let reconstructed = format!("{}.{}", r.name, zone.trim_end_matches('.'));
                    reconstructed.eq_ignore_ascii_case(qname)
                })
                .map(|r| {
                    let name = Name::from_str(qname).unwrap_or_else(|_| Name::root());
                    Record::from_rdata(name, r.ttl, RData::TXT(TXT::new(vec![r.data.clone()])))
                })
                .collect();
            if !matches.is_empty() {
                return matches;
            }
        }
        Vec::new()
    }

    fn answer_for(&self, name: &Name, qtype: RecordType) -> Vec<Record> {
        match qtype {
            RecordType::A => match self.outbound_ipv4 {
                IpAddr::V4(v4) => vec![Record::from_rdata(name.clone(), 60, RData::A(A(v4)))],
                IpAddr::V6(_) => Vec::new(),
            },
            RecordType::AAAA => Vec::new(),
            RecordType::TXT => vec![Record::from_rdata(
                name.clone(),
                60,
                RData::TXT(TXT::new(vec!["hookd interaction server".to_string()])),
            )],
            RecordType::NS => {
                let base = Name::from_str(&format!("{}.", self.base_domain)).unwrap_or_else(|_| Name::root());
                vec![Record::from_rdata(name.clone(), 60, RData::NS(NS(base)))]
            }
            RecordType::MX => {
                let base = Name::from_str(&format!("{}.", self.base_domain)).unwrap_or_else(|_| Name::root());
                vec![Record::from_rdata(name.clone(), 60, RData::MX(MX::new(10, base)))]
            }
            _ => Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for HookdDnsHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let request_info = match request.request_info() {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "failed to parse DNS request info");
                return respond(request, &mut response_handle, ResponseCode::FormErr, &[]).await;
            }
        };

        let query = &request_info.query;
        let qname = Self::normalize(&query.name().to_utf8());
        let qtype = query.query_type();
        let client_ip = request.src().ip();

        if qtype == RecordType::TXT && qname.starts_with("_acme-challenge.") {
            let answers = self.resolve_acme_txt(&qname);
            debug!(qname = %qname, matches = answers.len(), "ACME DNS-01 challenge lookup");
            return respond(request, &mut response_handle, ResponseCode::NoError, &answers).await;
        }

        if !self.is_our_domain(&qname) {
            debug!(qname = %qname, "query outside configured domain");
            return respond(request, &mut response_handle, ResponseCode::NXDomain, &[]).await;
        }

        if let Some(hook_id) = self.hook_id_of(&qname) {
            self.store.add_interaction(
                hook_id,
                Interaction::new_dns(
                    self.id_gen.generate(),
                    hook_id,
                    client_ip.to_string(),
                    Utc::now(),
                    qname.clone(),
                    qtype.to_string(),
                ),
            );
        }

        let name = Name::from_str(&qname).unwrap_or_else(|_| Name::root());
        let answers = self.answer_for(&name, qtype);
        debug!(qname = %qname, qtype = %qtype, client = %client_ip, answers = answers.len(), "capture query answered");
        respond(request, &mut response_handle, ResponseCode::NoError, &answers).await
    }
}

async fn respond<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
    answers: &[Record],
) -> ResponseInfo {
    let builder = MessageResponseBuilder::from_message_request(request);
    let mut header = *request.header();
    header.set_authoritative(true);
    header.set_response_code(code);
    let response = builder.build(header, answers.iter(), &[], &[], &[]);
    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            warn!(error = %e, "failed to send DNS response");
            ResponseInfo::from(*request.header())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use hookd_application::{HexIdGenerator, InMemoryHookStore};

    use super::*;

    fn handler() -> HookdDnsHandler {
        let id_gen = Arc::new(HexIdGenerator);
        let store: Arc<dyn HookStore> = Arc::new(InMemoryHookStore::new(id_gen.clone()));
        HookdDnsHandler::new(
            store,
            Arc::new(AcmeRecordStore::new()),
            id_gen,
            "hookd.example.com".to_string(),
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10)),
        )
    }

    #[test]
    fn normalize_strips_trailing_dot_and_lowercases() {
        assert_eq!(HookdDnsHandler::normalize("Foo.HOOKD.Example.COM."), "foo.hookd.example.com");
    }

    #[test]
    fn base_domain_itself_has_no_hook_id() {
        let h = handler();
        assert!(h.is_our_domain("hookd.example.com"));
        assert_eq!(h.hook_id_of("hookd.example.com"), None);
    }

    #[test]
    fn subdomain_of_base_extracts_hook_id() {
        let h = handler();
        assert!(h.is_our_domain("abc123.hookd.example.com"));
        assert_eq!(h.hook_id_of("abc123.hookd.example.com"), Some("abc123"));
    }

    #[test]
    fn unrelated_domain_is_not_ours() {
        let h = handler();
        assert!(!h.is_our_domain("example.org"));
        assert!(!h.is_our_domain("evilhookd.example.com"));
    }

    #[test]
    fn resolve_acme_txt_walks_zone_suffixes() {
        let h = handler();
        h.acme_store.append(
            "hookd.example.com",
            vec![hookd_domain::AcmeRecord::new("_acme-challenge", "token-value", 60)],
        );

        let answers = h.resolve_acme_txt("_acme-challenge.hookd.example.com");
        assert_eq!(answers.len(), 1);
        match answers[0].data() {
            RData::TXT(txt) => assert_eq!(txt.to_string(), "token-value"),
            other => panic!("expected TXT record, got {other:?}"),
        }
    }

    #[test]
    fn resolve_acme_txt_returns_empty_for_unknown_name() {
        let h = handler();
        assert!(h.resolve_acme_txt("_acme-challenge.hookd.example.com").is_empty());
    }

    #[test]
    fn answer_for_a_record_uses_outbound_ipv4() {
        let h = handler();
        let name = Name::from_str("abc123.hookd.example.com.").unwrap();
        let answers = h.answer_for(&name, RecordType::A);
        assert_eq!(answers.len(), 1);
        match answers[0].data() {
            RData::A(A(addr)) => assert_eq!(*addr, Ipv4Addr::new(203, 0, 113, 10)),
            other => panic!("expected A record, got {other:?}"),
        }
    }

    #[test]
    fn answer_for_aaaa_is_empty_without_an_ipv6_outbound_address() {
        let h = handler();
        let name = Name::from_str("abc123.hookd.example.com.").unwrap();
        assert!(h.answer_for(&name, RecordType::AAAA).is_empty());
    }
}
