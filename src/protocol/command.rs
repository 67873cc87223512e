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


use crate::{AppError, AppResult};

/// Command codes understood by IP Messenger clients.
///
/// Only the two commands needed to announce ourselves and deliver a message
/// are supported; the rest of the protocol is receiver side.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// `IPMSG_NOOPERATION`, broadcast as a presence probe without body
    NoOperation = 0x0000_0000,
    /// `IPMSG_SENDMSG`, body is the message text
    SendMsg = 0x0000_0020,
}

impl Command {
    pub fn from_u32(value: u32) -> AppResult<Self> {
        match value {
            0x0000_0000 => Ok(Command::NoOperation),
            0x0000_0020 => Ok(Command::SendMsg),
            invalid => Err(AppError::MalformedProtocol(format!(
                "command:{} is not supported",
                invalid
            ))),
        }
    }

    pub fn as_u32(&self) -> u32 {
        *self as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() -> AppResult<()> {
        assert_eq!(Command::NoOperation.as_u32(), 0);
        assert_eq!(Command::SendMsg.as_u32(), 32);
        assert_eq!(Command::from_u32(0x20)?, Command::SendMsg);
        assert_eq!(Command::from_u32(0)?, Command::NoOperation);
        Ok(())
    }

    #[test]
    fn test_unknown_command() {
        // IPMSG_BR_ENTRY is a real command, we just never send it
        assert!(matches!(
            Command::from_u32(0x01),
            Err(AppError::MalformedProtocol(_))
        ));
    }
}
