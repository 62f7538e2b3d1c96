//! s3gate server assembly.
//!
//! Wires [`ServerConfig`] into a provider, an HTTP service and a hyper accept
//! loop. The binary in `main.rs` is a thin wrapper; integration tests start
//! the same stack in-process with [`spawn`].

pub mod handler;

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use s3gate_core::{S3Provider, ServerConfig};
use s3gate_http::service::{S3HttpConfig, S3HttpService};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

pub use crate::handler::S3GateHandler;

/// Server version reported at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise `log_level`.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// `S3_SERVICE_HOST` value standing for the machine's hostname.
pub const OS_HOSTNAME: &str = "auto";

/// The machine's hostname: `$HOSTNAME`, else the first line of `/etc/hostname`.
#[must_use]
pub fn os_hostname() -> Option<String> {
    std::env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .and_then(|raw| raw.lines().next().map(|line| line.trim().to_owned()))
        .filter(|name| !name.is_empty())
}

/// Replace a `service_host` of [`OS_HOSTNAME`] with the name `hostname` returns.
///
/// # Errors
///
/// Fails when the hostname is requested but cannot be determined.
pub fn resolve_service_host(
    config: &mut ServerConfig,
    hostname: impl FnOnce() -> Option<String>,
) -> Result<()> {
    if config.service_host.as_deref() != Some(OS_HOSTNAME) {
        return Ok(());
    }
    let Some(name) = hostname() else {
        anyhow::bail!("S3_SERVICE_HOST={OS_HOSTNAME} but the machine hostname is unknown");
    };
    info!(service_host = %name, "using machine hostname as service endpoint");
    config.service_host = Some(name);
    Ok(())
}

/// Create the provider and its configured seed buckets.
pub fn build_provider(config: ServerConfig) -> Result<S3Provider> {
    let seeds = config.configure_buckets.clone();
    let provider = S3Provider::new(config);
    let created = provider
        .seed_buckets(&seeds)
        .context("failed to create configured buckets")?;
    if created > 0 {
        info!(count = created, "created configured buckets");
    }
    Ok(provider)
}

/// The HTTP configuration for a provider. Host resolution reads the
/// provider's live bucket table.
#[must_use]
pub fn build_http_config(provider: &S3Provider) -> S3HttpConfig {
    S3HttpConfig {
        endpoint: provider.endpoint_config(),
        region: provider.config().default_region.clone(),
    }
}

/// The HTTP service serving `provider`.
#[must_use]
pub fn build_service(provider: S3Provider) -> S3HttpService<S3GateHandler> {
    let http_config = build_http_config(&provider);
    S3HttpService::new(S3GateHandler(provider), http_config)
}

/// Accept connections until `shutdown` resolves, then drain in-flight ones.
pub async fn serve(
    listener: TcpListener,
    service: S3HttpService<S3GateHandler>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    /// The bound address.
    pub addr: SocketAddr,
    /// The provider behind the server.
    pub provider: S3Provider,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<()>>,
}

impl RunningServer {
    /// `http://{addr}`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting, drain connections and wait for the task.
    pub async fn stop(self) -> Result<()> {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(());
        self.handle.await.context("server task panicked")?
    }
}

/// Bind `config.gateway_listen` and serve on a background task.
///
/// Binding port `0` picks a free port; see [`RunningServer::addr`].
pub async fn spawn(config: ServerConfig) -> Result<RunningServer> {
    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    let addr = listener.local_addr().context("failed to read bound address")?;

    let provider = build_provider(config)?;
    let service = build_service(provider.clone());
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(serve(listener, service, async move {
        rx.await.ok();
    }));

    Ok(RunningServer {
        addr,
        provider,
        shutdown: tx,
        handle,
    })
}

/// Probe the health endpoint of a running server.
pub async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /_health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains(r#""status":"running""#) {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}
