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

use std::future::Future;

use tokio::sync::broadcast;

use super::{AppError, AppResult};

/// Listens for the caller abandoning a notification.
///
/// A closed channel counts as a shutdown signal, so the sender half has to
/// outlive the notification.
#[derive(Debug)]
pub struct Shutdown {
    is_shutdown: bool,
    notify: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new(notify: broadcast::Receiver<()>) -> Shutdown {
        Shutdown {
            is_shutdown: false,
            notify,
        }
    }
    pub fn is_shutdown(&self) -> bool {
        self.is_shutdown
    }

    pub async fn recv(&mut self) {
        if self.is_shutdown {
            return;
        }
        let _ = self.notify.recv().await;
        self.is_shutdown = true;
    }

    /// Drives `fut` to completion unless the shutdown signal fires first,
    /// in which case `fut` is dropped and `Interrupted` is returned.
    pub async fn run_until<F: Future>(&mut self, what: &str, fut: F) -> AppResult<F::Output> {
        if self.is_shutdown {
            return Err(AppError::Interrupted(format!("{what} skipped after shutdown")));
        }
        tokio::select! {
            biased;
            _ = self.recv() => Err(AppError::Interrupted(format!("{what} cancelled"))),
            output = fut => Ok(output),
        }
    }
}
