// Copyright 2025 jonefeewang@gmail.com
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4};
use std::sync::Arc;

use tokio::net::{lookup_host, UdpSocket};
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::service::{BindMode, NetworkConfig};
use crate::{AppError, AppResult};

/// Where a datagram goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// local segment broadcast, used for presence probes
    Broadcast(SocketAddrV4),
    /// a single recipient given as hostname or IP literal
    Unicast { host: String, port: u16 },
}

impl Target {
    pub fn is_broadcast(&self) -> bool {
        matches!(self, Target::Broadcast(_))
    }

    pub fn port(&self) -> u16 {
        match self {
            Target::Broadcast(addr) => addr.port(),
            Target::Unicast { port, .. } => *port,
        }
    }

    /// Resolves the target to a socket address, preferring IPv4 when a host
    /// has both families.
    pub async fn resolve(&self) -> AppResult<SocketAddr> {
        match self {
            Target::Broadcast(addr) => Ok(SocketAddr::V4(*addr)),
            Target::Unicast { host, port } => {
                let addrs: Vec<SocketAddr> = lookup_host((host.as_str(), *port))
                    .await
                    .map_err(|e| AppError::AddressResolution(format!("{}: {}", host, e)))?
                    .collect();
                trace!("resolved {} to {:?}", host, addrs);
                addrs
                    .iter()
                    .find(|addr| addr.is_ipv4())
                    .or_else(|| addrs.first())
                    .copied()
                    .ok_or_else(|| {
                        AppError::AddressResolution(format!("{}: no address found", host))
                    })
            }
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Broadcast(addr) => write!(f, "broadcast {}", addr),
            Target::Unicast { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// Sends one datagram to one target.
pub trait DatagramSender {
    async fn send_to(&self, payload: &[u8], target: &Target) -> AppResult<()>;
}

/// UDP implementation backed by a fresh tokio socket per send.
///
/// In [`BindMode::WellKnown`] every socket binds the protocol port, so sends
/// sharing this sender (and its clones) take turns on an async mutex.
#[derive(Debug, Clone)]
pub struct UdpSender {
    port: u16,
    bind_mode: BindMode,
    bind_lock: Arc<Mutex<()>>,
}

impl UdpSender {
    pub fn new(network: &NetworkConfig) -> Self {
        UdpSender {
            port: network.port,
            bind_mode: network.bind_mode,
            bind_lock: Arc::new(Mutex::new(())),
        }
    }

    fn local_addr(&self, peer: &SocketAddr) -> SocketAddr {
        let port = match self.bind_mode {
            BindMode::Ephemeral => 0,
            BindMode::WellKnown => self.port,
        };
        match peer {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
        }
    }

    async fn open_socket(&self, peer: &SocketAddr, broadcast: bool) -> AppResult<UdpSocket> {
        let local = self.local_addr(peer);
        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| AppError::Socket(format!("bind {}: {}", local, e)))?;
        if broadcast {
            socket
                .set_broadcast(true)
                .map_err(|e| AppError::Socket(format!("enable broadcast: {}", e)))?;
        }
        Ok(socket)
    }
}

impl DatagramSender for UdpSender {
    async fn send_to(&self, payload: &[u8], target: &Target) -> AppResult<()> {
        let peer = target.resolve().await?;

        let _bind_guard = match self.bind_mode {
            BindMode::WellKnown => Some(self.bind_lock.lock().await),
            BindMode::Ephemeral => None,
        };
        // dropped at the end of this scope on every path
        let socket = self.open_socket(&peer, target.is_broadcast()).await?;

        let sent = socket
            .send_to(payload, peer)
            .await
            .map_err(|e| AppError::Transmission(format!("{} ({}): {}", target, peer, e)))?;
        if sent != payload.len() {
            return Err(AppError::Transmission(format!(
                "{} ({}): sent {} of {} bytes",
                target,
                peer,
                sent,
                payload.len()
            )));
        }
        debug!("sent {} bytes to {} ({})", sent, target, peer);
        Ok(())
    }
}
