//! Scenario 2 (spec.md §8): an A-query against `<id>.<base-domain>` is
//! answered with the advertised server IPv4 and recorded as a pollable
//! interaction; a second poll for the same hook is empty.

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::sync::Arc;

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use hickory_server::ServerFuture;
use hookd_application::{HexIdGenerator, HookStore, InMemoryHookStore};
use hookd_infrastructure::{AcmeRecordStore, HookdDnsHandler};
use tokio::net::UdpSocket;

const BASE_DOMAIN: &str = "hookd.test.local";
const SERVER_IPV4: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 77);

fn build_query(qname: &str, id: u16) -> Vec<u8> {
    let mut query = Query::new();
    query.set_name(Name::from_str(qname).unwrap());
    query.set_query_type(RecordType::A);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(id, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);

    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).unwrap();
    buf
}

#[tokio::test]
async fn a_query_returns_server_ip_and_is_recorded_as_an_interaction() {
    let id_gen = Arc::new(HexIdGenerator);
    let store: Arc<dyn HookStore> = Arc::new(InMemoryHookStore::new(id_gen.clone()));
    let hook = store.create_hook(BASE_DOMAIN);

    let handler = HookdDnsHandler::new(
        store.clone(),
        Arc::new(AcmeRecordStore::new()),
        id_gen,
        BASE_DOMAIN.to_string(),
        IpAddr::V4(SERVER_IPV4),
    );

    let udp_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let server_addr = udp_socket.local_addr().unwrap();
    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    tokio::spawn(async move {
        let _ = server.block_until_done().await;
    });

    let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let qname = format!("{}.{}.", hook.id, BASE_DOMAIN);
    let query_bytes = build_query(&qname, 0xbeef);
    client.send_to(&query_bytes, server_addr).await.unwrap();

    let mut buf = vec![0u8; 512];
    let (len, _) = tokio::time::timeout(std::time::Duration::from_secs(2), client.recv_from(&mut buf))
        .await
        .expect("DNS server did not respond in time")
        .unwrap();

    let response = Message::from_vec(&buf[..len]).unwrap();
    assert_eq!(response.header().id(), 0xbeef);
    let answers = response.answers();
    assert_eq!(answers.len(), 1);
    match answers[0].data() {
        RData::A(hickory_proto::rr::rdata::A(addr)) => assert_eq!(*addr, SERVER_IPV4),
        other => panic!("expected an A record, got {other:?}"),
    }
    assert_eq!(answers[0].ttl(), 60);

    let interactions = store.poll(&hook.id);
    assert_eq!(interactions.len(), 1);
    match &interactions[0].data {
        hookd_domain::InteractionData::Dns { qname: recorded_qname, qtype } => {
            assert_eq!(recorded_qname, &qname.trim_end_matches('.'));
            assert_eq!(qtype, "A");
        }
        other => panic!("expected a DNS interaction, got {other:?}"),
    }

    assert_eq!(store.poll(&hook.id).len(), 0, "a second poll must drain to empty");
}
