use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Terminates TLS by hand rather than pulling in a dedicated TLS-serving
/// crate: accept, hand the stream to the acceptor, then drive it with the
/// same hyper auto (h1/h2) connection builder axum itself is layered on.
pub async fn serve(bind_addr: SocketAddr, acceptor: TlsAcceptor, app: Router, shutdown: CancellationToken) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "HTTPS server listening");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("HTTPS server: shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let acceptor = acceptor.clone();
                let app_with_peer = app.clone().layer(axum::Extension(ConnectInfo(peer)));
                let service = TowerToHyperService::new(app_with_peer);

                tokio::spawn(async move {
                    let tls_stream = match acceptor.accept(stream).await {
                        Ok(stream) => stream,
                        Err(e) => {
                            warn!(error = %e, %peer, "TLS handshake error");
                            return;
                        }
                    };

                    let io = TokioIo::new(tls_stream);
                    if let Err(e) = ConnBuilder::new(TokioExecutor::new()).serve_connection(io, service).await {
                        warn!(error = %e, %peer, "https connection error");
                    }
                });
            }
        }
    }
}
