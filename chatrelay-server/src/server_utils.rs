use anyhow::Result;
use axum::Router;
use listenfd::ListenFd;
use socket2::{Domain, Protocol, Socket, Type};
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Take a listener handed over by systemd, or bind `addr` ourselves.
pub async fn create_listener(addr: &str) -> Result<tokio::net::TcpListener> {
    let mut listenfd = ListenFd::from_env();

    if let Some(listener) = listenfd.take_tcp_listener(0)? {
        info!("Using systemd socket activation (fd=3)");
        listener.set_nonblocking(true)?;
        return Ok(tokio::net::TcpListener::from_std(listener)?);
    }

    let addr: SocketAddr =
        addr.parse().map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", addr, e))?;
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(1024)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests for
/// at most `grace` before dropping them.
pub async fn serve_until<F>(
    listener: tokio::net::TcpListener,
    app: Router,
    shutdown: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (drain_tx, drain_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        info!("Draining in-flight requests (up to {}s)", grace.as_secs());
        let _ = drain_tx.send(());
    });

    let deadline = async move {
        match drain_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server.into_future() => result?,
        () = deadline => {
            warn!("Drain deadline of {}s exceeded, dropping in-flight requests", grace.as_secs());
        }
    }
    Ok(())
}

#[allow(
    clippy::expect_used,
    reason = "Signal handlers are critical infrastructure, panic is appropriate on failure"
)]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
