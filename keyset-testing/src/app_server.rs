//! Serving the keyset API over gRPC.
//!
//! One tonic server is started per configured listen address; all of them share a single
//! [KeysetService].

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use keyset_testing_kms::KeyManagementLibrary;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::api::keyset_server::KeysetServer;
use crate::api::server::KeysetService;
use crate::config;

/// Whether `addr` is an IPv4 wildcard address whose port is already served by a bound IPv6
/// wildcard socket
fn covered_by_dual_stack(addr: &SocketAddr, listeners: &[TcpListener]) -> bool {
    addr.is_ipv4()
        && addr.ip().is_unspecified()
        && listeners
            .iter()
            .filter_map(|l| l.local_addr().ok())
            .any(|a| a.is_ipv6() && a.ip().is_unspecified() && a.port() == addr.port())
}

pub struct AppServer<K> {
    service: KeysetService<K>,
    listeners: Vec<TcpListener>,
    max_message_size: usize,
}

impl<K: KeyManagementLibrary + 'static> AppServer<K> {
    /// Bind all listen addresses of `config`
    pub async fn bind(config: &config::KeysetTesting, kms: K) -> anyhow::Result<Self> {
        let mut listeners = Vec::with_capacity(config.listen.len());
        for addr in config.listen.iter() {
            match TcpListener::bind(addr).await {
                Ok(listener) => listeners.push(listener),
                // On dual-stack systems `[::]:PORT` already accepts IPv4 connections
                Err(e)
                    if e.kind() == io::ErrorKind::AddrInUse
                        && covered_by_dual_stack(addr, &listeners) =>
                {
                    log::warn!(
                        "Could not bind to {addr}: {e}; relying on the IPv6 socket for IPv4"
                    );
                }
                Err(e) => return Err(e).with_context(|| format!("could not bind {addr}")),
            }
        }

        Ok(Self {
            service: KeysetService::from_arc(Arc::new(kms)),
            listeners,
            max_message_size: config.max_message_size,
        })
    }

    /// Addresses actually bound; differs from the configuration when port 0 was requested
    pub fn local_addrs(&self) -> anyhow::Result<Vec<SocketAddr>> {
        self.listeners
            .iter()
            .map(|l| Ok(l.local_addr()?))
            .collect()
    }

    /// Serve until `shutdown` resolves or one of the servers fails
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()>,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut servers = JoinSet::new();

        for listener in self.listeners {
            let addr = listener.local_addr()?;
            let svc = KeysetServer::new(self.service.clone())
                .max_decoding_message_size(self.max_message_size)
                .max_encoding_message_size(self.max_message_size);
            let mut stop_rx = stop_rx.clone();

            log::info!("serving tink_testing_api.Keyset on {addr}");
            servers.spawn(async move {
                Server::builder()
                    .add_service(svc)
                    .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                        let _ = stop_rx.changed().await;
                    })
                    .await
                    .with_context(|| format!("gRPC server on {addr} failed"))
            });
        }

        let res = tokio::select! {
            _ = shutdown => {
                log::info!("shutting down");
                Ok(())
            }
            Some(res) = servers.join_next() => {
                res.context("gRPC server task panicked")?
            }
        };

        let _ = stop_tx.send(true);
        while let Some(r) = servers.join_next().await {
            r.context("gRPC server task panicked")??;
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyset_testing_kms::Registry;

    fn free_port() -> u16 {
        std::net::TcpListener::bind("[::]:0")
            .or_else(|_| std::net::TcpListener::bind("0.0.0.0:0"))
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[tokio::test]
    async fn binds_wildcard_port_on_dual_stack_hosts() {
        let port = free_port();
        let mut config = config::KeysetTesting::new();
        config.add_if_any(port);

        let srv = AppServer::bind(&config, Registry::default()).await.unwrap();
        let addrs = srv.local_addrs().unwrap();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.port() == port));
        assert!(addrs.iter().any(|a| a.is_ipv6()));
    }

    #[tokio::test]
    async fn other_bind_failures_are_reported() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut config = config::KeysetTesting::new();
        config.listen.push(taken.local_addr().unwrap());

        let err = AppServer::bind(&config, Registry::default())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("could not bind"));
    }
}
