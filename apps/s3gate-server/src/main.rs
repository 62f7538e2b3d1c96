//! s3gate server: an S3 emulator with virtual-host bucket addressing.
//!
//! # Usage
//!
//! ```text
//! GATEWAY_LISTEN=0.0.0.0:4566 S3_CONFIGURE_BUCKETS=bucket-a,bucket-b s3gate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:4566` | Bind address |
//! | `S3_SERVICE_ENDPOINT` | *(unset)* | Custom domain `D`; the endpoint becomes `s3.D` |
//! | `S3_SERVICE_HOST` | *(unset)* | Exact endpoint hostname; `auto` uses the machine hostname |
//! | `S3_VHOST_BUCKETS` | `true` | Treat a bare `Host` as a bucket name |
//! | `S3_CONFIGURE_BUCKETS` | *(empty)* | Comma-separated buckets created at startup |
//! | `DEFAULT_REGION` | `us-east-1` | Region reported for buckets |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;

use anyhow::{Context, Result};
use s3gate_core::ServerConfig;
use s3gate_server::{
    VERSION, build_provider, build_service, init_tracing, os_hostname, resolve_service_host,
    run_health_check, serve,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = ServerConfig::from_env();

    // Container HEALTHCHECK entry point.
    if std::env::args().any(|a| a == "--health-check") {
        let addr = config.gateway_listen.replace("0.0.0.0", "127.0.0.1");
        let healthy = run_health_check(&addr).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    init_tracing(&config.log_level)?;
    resolve_service_host(&mut config, os_hostname)?;

    let addr: SocketAddr = config
        .gateway_listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.gateway_listen))?;

    let provider = build_provider(config)?;
    let endpoint = provider.endpoint_config();
    info!(
        gateway_listen = %addr,
        service_endpoint = %endpoint.service_endpoint(),
        vhost_buckets = endpoint.vhost_buckets_enabled(),
        buckets = provider.state().list_buckets().len(),
        version = VERSION,
        "starting s3gate server",
    );

    let service = build_service(provider);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(%addr, "listening for connections");

    serve(listener, service, async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    })
    .await
}
