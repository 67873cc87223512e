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


//! Build notifications for IP Messenger.
//!
//! Announces the sender with a broadcast `NOOPERATION` probe, waits for the
//! network to settle and then sends the status message to each recipient
//! over UDP. Delivery is best effort; errors are logged, never escalated.

pub mod network;
pub mod notify;
pub mod protocol;
pub mod service;

pub use network::{DatagramSender, Target, UdpSender};
pub use notify::{
    parse_recipients, status_message, BuildStatus, Notifier, NotifyReport, RecipientFailure,
};
pub use protocol::{Command, Frame, Identity};
pub use service::{setup_local_tracing, AppError, AppResult, NotifierConfig, Shutdown};
