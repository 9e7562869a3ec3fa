mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use hookd_api::{AppState, create_api_routes};
use hookd_application::{HexIdGenerator, InMemoryHookStore};
use hookd_domain::config::{LogFormat, ObservabilityConfig};
use hookd_domain::CliOverrides;
use hookd_infrastructure::memory_stats::read_memory_stats;
use hookd_infrastructure::tls::error_filter::TlsNoiseFilter;
use hookd_infrastructure::{AcmeRecordStore, HookdDnsHandler, RecursiveResolver, TlsLifecycle};
use hookd_infrastructure::outbound_ip::discover_outbound_ipv4;
use hookd_infrastructure::tls::acme_client::LETS_ENCRYPT_PRODUCTION;
use hookd_jobs::{EvictionJob, JobRunner};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Out-of-band DNS and HTTP(S) interaction capture server, with ACME
/// DNS-01 issued wildcard TLS for the capture vhost (spec.md §1).
#[derive(Parser)]
#[command(name = "hookd")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file path.
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Base capture domain, e.g. hookd.example.com.
    #[arg(long)]
    domain: Option<String>,

    /// DNS listener port.
    #[arg(long)]
    dns_port: Option<u16>,

    /// HTTP listener port.
    #[arg(long)]
    http_port: Option<u16>,

    /// Enable the HTTPS listener and ACME bootstrap.
    #[arg(long)]
    https_enabled: Option<bool>,

    /// Log level (debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = hookd_domain::Config::load(
        cli.config.as_deref(),
        CliOverrides {
            domain: cli.domain.clone(),
            dns_port: cli.dns_port,
            http_port: cli.http_port,
            https_enabled: cli.https_enabled,
            log_level: cli.log_level.clone(),
        },
    )?;
    config.validate()?;

    init_tracing(&config.observability);

    info!(version = env!("CARGO_PKG_VERSION"), domain = %config.server.domain, "starting hookd");

    let shutdown = CancellationToken::new();

    let store: Arc<dyn hookd_application::HookStore> = Arc::new(InMemoryHookStore::new(Arc::new(HexIdGenerator)));
    let id_gen = Arc::new(HexIdGenerator);
    let acme_store = Arc::new(AcmeRecordStore::new());

    let outbound_ipv4 = discover_outbound_ipv4("8.8.8.8:80")?;
    info!(%outbound_ipv4, "discovered outbound IPv4");

    let eviction_job = EvictionJob::new(store.clone(), config.eviction.clone());
    let eviction_metrics = eviction_job.metrics();
    JobRunner::new()
        .with_eviction(eviction_job)
        .with_shutdown_token(shutdown.clone())
        .start()
        .await;

    let dns_addr: SocketAddr = format!("0.0.0.0:{}", config.server.dns.port).parse()?;
    if config.server.dns.enabled {
        let handler = HookdDnsHandler::new(
            store.clone(),
            acme_store.clone(),
            id_gen.clone(),
            config.server.domain.clone(),
            outbound_ipv4,
        );
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = server::dns::serve(dns_addr, handler, shutdown).await {
                error!(error = %e, "DNS server error");
            }
        });
    }

    let app_state = AppState::new(
        store.clone(),
        id_gen.clone(),
        eviction_metrics,
        Arc::new(read_memory_stats),
        config.server.domain.clone(),
        config.server.api.auth_token.clone(),
    );
    let app = create_api_routes(app_state);

    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.server.http.port).parse()?;
    let http_shutdown = shutdown.clone();
    let http_app = app.clone();
    let http_task = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(http_addr).await?;
        info!(%http_addr, "HTTP server listening");
        axum::serve(listener, http_app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move { http_shutdown.cancelled().await })
            .await?;
        Ok::<(), anyhow::Error>(())
    });

    if config.server.https.enabled {
        // Resolve the ACME directory's hostname through a recursive resolver
        // independent of our own authoritative responder, so the bootstrap
        // never ends up asking ourselves for Let's Encrypt's address
        // (spec.md §4.5 "HTTPS bootstrap", step 1).
        let acme_host = acme_directory_host(LETS_ENCRYPT_PRODUCTION);
        match RecursiveResolver::new().lookup_ipv4(acme_host).await {
            Ok(addrs) => info!(host = acme_host, ?addrs, "resolved ACME directory via recursive resolver"),
            Err(e) => error!(host = acme_host, error = %e, "recursive resolution of ACME directory failed"),
        }

        let lifecycle = TlsLifecycle::new(config.server.https.cache_dir.clone());
        let acceptor = lifecycle
            .bootstrap(LETS_ENCRYPT_PRODUCTION, None, &config.server.domain, acme_store.clone())
            .await?;

        let https_addr: SocketAddr = format!("0.0.0.0:{}", config.server.https.port).parse()?;
        let https_shutdown = shutdown.clone();
        let https_app = app.clone();
        tokio::spawn(async move {
            if let Err(e) = server::https::serve(https_addr, acceptor, https_app, https_shutdown).await {
                error!(error = %e, "HTTPS server error");
            }
        });
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
        }
        result = http_task => {
            if let Err(e) = result? {
                error!(error = %e, "HTTP server error");
            }
        }
    }

    shutdown.cancel();
    info!("hookd shut down");
    Ok(())
}

fn acme_directory_host(directory_url: &str) -> &str {
    let without_scheme = directory_url.split("://").nth(1).unwrap_or(directory_url);
    without_scheme.split('/').next().unwrap_or(without_scheme)
}

fn init_tracing(config: &ObservabilityConfig) {
    let level = config.log_level.as_tracing_level();
    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::filter::LevelFilter::from_level(level))
                .with(TlsNoiseFilter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::filter::LevelFilter::from_level(level))
                .with(TlsNoiseFilter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}
