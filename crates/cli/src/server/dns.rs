use std::net::SocketAddr;
use std::time::Duration;

use hickory_server::ServerFuture;
use hookd_infrastructure::HookdDnsHandler;
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Binds the authoritative responder on UDP and TCP and runs it until
/// shutdown is requested. Hookd has no multi-worker `SO_REUSEPORT` pool —
/// the workload is a handful of in-memory map lookups per query, not a
/// recursive resolver under heavy fan-out, so a single `ServerFuture` is
/// enough (spec.md §4.3).
pub async fn serve(
    bind_addr: SocketAddr,
    handler: HookdDnsHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let udp_socket = UdpSocket::bind(bind_addr).await?;
    info!(%bind_addr, protocol = "udp", "DNS server listening");

    let tcp_listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, protocol = "tcp", "DNS server listening");

    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, Duration::from_secs(10));

    tokio::select! {
        result = server.block_until_done() => result.map_err(anyhow::Error::from),
        _ = shutdown.cancelled() => {
            info!("DNS server: shutting down");
            Ok(())
        }
    }
}
