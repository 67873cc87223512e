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


use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::recipients::normalize_recipient;
use super::report::{NotifyReport, RecipientFailure};
use crate::network::{DatagramSender, Target};
use crate::protocol::{Command, Frame, Identity};
use crate::service::{NotifierConfig, Shutdown};
use crate::{AppError, AppResult};

/// Sends build notifications to IP Messenger clients.
///
/// One notification is a broadcast presence probe, a settling delay and
/// then one unicast message per recipient, strictly in the given order.
/// Delivery is fire-and-forget: nothing is retried or acknowledged.
#[derive(Debug)]
pub struct Notifier<S> {
    sender: S,
    identity: Identity,
    port: u16,
    broadcast_addr: Ipv4Addr,
    settle_delay: Duration,
}

impl<S: DatagramSender> Notifier<S> {
    pub fn new(sender: S, identity: Identity, config: &NotifierConfig) -> Self {
        Notifier {
            sender,
            identity,
            port: config.network.port,
            broadcast_addr: config.network.broadcast_addr,
            settle_delay: config.notify.settle_delay(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Broadcasts a `NOOPERATION` frame so receivers learn we are around.
    pub async fn send_probe(&self) -> AppResult<()> {
        let payload = Frame::encode_new(Command::NoOperation, None, &self.identity)?;
        let target = Target::Broadcast(SocketAddrV4::new(self.broadcast_addr, self.port));
        self.sender.send_to(&payload, &target).await
    }

    /// Sends `body` to a single host. Whitespace inside `to_host` is ignored.
    pub async fn send_message(&self, body: &str, to_host: &str) -> AppResult<()> {
        let host = normalize_recipient(to_host)
            .ok_or_else(|| AppError::AddressResolution("empty host name".to_string()))?;
        let payload = Frame::encode_new(Command::SendMsg, Some(body), &self.identity)?;
        let target = Target::Unicast {
            host,
            port: self.port,
        };
        self.sender.send_to(&payload, &target).await
    }

    /// Runs a whole notification. Never fails: probe and recipient errors are
    /// logged and collected in the report, and an interruption leaves the
    /// remaining recipients unattempted.
    pub async fn notify_all<R: AsRef<str>>(
        &self,
        body: &str,
        recipients: &[R],
        shutdown: &mut Shutdown,
    ) -> NotifyReport {
        let mut report = NotifyReport::default();

        match shutdown.run_until("presence probe", self.send_probe()).await {
            Ok(Ok(())) => debug!("presence probe sent"),
            Ok(Err(e)) => {
                warn!("presence probe failed, sending messages anyway: {}", e);
                report.probe_error = Some(e.to_string());
            }
            Err(e) => return self.interrupted(report, e, recipients),
        }

        debug!("waiting {:?} before sending messages", self.settle_delay);
        if let Err(e) = shutdown
            .run_until("settling delay", tokio::time::sleep(self.settle_delay))
            .await
        {
            return self.interrupted(report, e, recipients);
        }

        for (i, to_host) in recipients.iter().enumerate() {
            let to_host = to_host.as_ref();
            match shutdown
                .run_until("message send", self.send_message(body, to_host))
                .await
            {
                Ok(Ok(())) => {
                    debug!("message sent to {}", to_host);
                    report.delivered.push(to_host.to_string());
                }
                Ok(Err(e)) => {
                    error!("send message to {} failed: {}", to_host, e);
                    report.failed.push(RecipientFailure {
                        host: to_host.to_string(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return self.interrupted(report, e, &recipients[i..]),
            }
        }

        info!("notification finished: {}", report);
        report
    }

    fn interrupted<R: AsRef<str>>(
        &self,
        mut report: NotifyReport,
        error: AppError,
        remaining: &[R],
    ) -> NotifyReport {
        warn!("notification abandoned: {}", error);
        report.interrupted = true;
        report
            .skipped
            .extend(remaining.iter().map(|host| host.as_ref().to_string()));
        report
    }
}
