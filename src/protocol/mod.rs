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


//! IP Messenger wire protocol.
//!
//! One datagram carries one frame: a colon separated text line
//! `version:serial:user:host:command:body` encoded as MS932. There is no
//! length prefix and no terminator, the datagram boundary ends the frame.

pub use charset::{decode_ms932, encode_ms932};
pub use command::Command;
pub use frame::{Frame, FIELD_COUNT};
pub use identity::{Identity, DEFAULT_USER_NAME};

mod charset;
mod command;
mod frame;
mod identity;

/// Protocol version written into every frame.
pub const IPMSG_VERSION: u32 = 1;
/// Well known port IP Messenger clients listen on.
pub const IPMSG_DEFAULT_PORT: u16 = 2425;
