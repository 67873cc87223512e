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

use bytes::Bytes;
use rand::Rng;

use super::{decode_ms932, encode_ms932, Command, Identity, IPMSG_VERSION};
use crate::{AppError, AppResult};

/// Number of colon separated fields in a frame, the body being the last one.
pub const FIELD_COUNT: usize = 6;

/// A single IP Messenger packet.
///
/// Built per send and thrown away afterwards. The serial only helps the
/// receiver tell packets apart, so it is random and may repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub version: u32,
    pub serial: i32,
    pub sender_user: String,
    pub sender_host: String,
    pub command: Command,
    pub body: Option<String>,
}

impl Frame {
    pub fn new(command: Command, body: Option<&str>, identity: &Identity) -> Self {
        Frame {
            version: IPMSG_VERSION,
            serial: next_serial(),
            sender_user: identity.user_name().to_string(),
            sender_host: identity.from_host().to_string(),
            command,
            body: body.map(str::to_string),
        }
    }

    /// Builds a frame with a fresh serial and encodes it for the wire.
    pub fn encode_new(command: Command, body: Option<&str>, identity: &Identity) -> AppResult<Bytes> {
        Frame::new(command, body, identity).encode()
    }

    pub fn encode(&self) -> AppResult<Bytes> {
        encode_ms932(&self.to_string())
    }

    /// Parses a received datagram. The body keeps any colons it contains;
    /// an empty body reads back as `None`.
    pub fn parse(bytes: &[u8]) -> AppResult<Frame> {
        let text = decode_ms932(bytes)?;
        let fields: Vec<&str> = text.splitn(FIELD_COUNT, ':').collect();
        if fields.len() != FIELD_COUNT {
            return Err(AppError::MalformedProtocol(format!(
                "expected {} fields, got {}",
                FIELD_COUNT,
                fields.len()
            )));
        }
        let number = |name: &str, value: &str| {
            AppError::MalformedProtocol(format!("{} is not a number: {:?}", name, value))
        };
        let version = fields[0]
            .parse::<u32>()
            .map_err(|_| number("version", fields[0]))?;
        let serial = fields[1]
            .parse::<i32>()
            .map_err(|_| number("serial", fields[1]))?;
        let command = fields[4]
            .parse::<u32>()
            .map_err(|_| number("command", fields[4]))?;
        let body = match fields[5] {
            "" => None,
            body => Some(body.to_string()),
        };
        Ok(Frame {
            version,
            serial,
            sender_user: fields[2].to_string(),
            sender_host: fields[3].to_string(),
            command: Command::from_u32(command)?,
            body,
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}:{}:{}",
            self.version,
            self.serial,
            self.sender_user,
            self.sender_host,
            self.command.as_u32(),
            self.body.as_deref().unwrap_or_default()
        )
    }
}

/// Uniform over `[0, i32::MAX)`.
fn next_serial() -> i32 {
    rand::thread_rng().gen_range(0..i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new(Some("alice"), "ci-node-1")
    }

    #[test]
    fn test_message_frame_layout() -> AppResult<()> {
        let frame = Frame::new(Command::SendMsg, Some("BUILD FAILURE\nsee console"), &alice());
        let text = decode_ms932(&frame.encode()?)?;
        let fields: Vec<&str> = text.splitn(FIELD_COUNT, ':').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "1");
        assert_eq!(fields[1], frame.serial.to_string());
        assert_eq!(fields[2], "alice");
        assert_eq!(fields[3], "ci-node-1");
        assert_eq!(fields[4], "32");
        assert_eq!(fields[5], "BUILD FAILURE\nsee console");
        Ok(())
    }

    #[test]
    fn test_probe_keeps_trailing_separator() -> AppResult<()> {
        let mut frame = Frame::new(Command::NoOperation, None, &alice());
        frame.serial = 42;
        assert_eq!(&frame.encode()?[..], b"1:42:alice:ci-node-1:0:");
        Ok(())
    }

    #[test]
    fn test_fallback_user_in_frame() -> AppResult<()> {
        let identity = Identity::new(Some(""), "build01");
        let frame = Frame::parse(&Frame::encode_new(Command::SendMsg, Some("hi"), &identity)?)?;
        assert_eq!(frame.sender_user, "jenkins-ci");
        assert_eq!(frame.sender_host, "build01");
        Ok(())
    }

    #[test]
    fn test_body_with_colons_survives_parse() -> AppResult<()> {
        let body = "BUILD SUCCESS\nhttp://ci:8080/job/1/";
        let bytes = Frame::encode_new(Command::SendMsg, Some(body), &alice())?;
        let frame = Frame::parse(&bytes)?;
        assert_eq!(frame.command, Command::SendMsg);
        assert_eq!(frame.body.as_deref(), Some(body));
        Ok(())
    }

    #[test]
    fn test_serial_range() {
        for _ in 0..10_000 {
            let serial = Frame::new(Command::NoOperation, None, &alice()).serial;
            assert!((0..i32::MAX).contains(&serial));
        }
    }

    #[test]
    fn test_unencodable_body() {
        let result = Frame::encode_new(Command::SendMsg, Some("done ✅"), &alice());
        assert!(matches!(result, Err(AppError::Encoding(_))));
    }

    #[test]
    fn test_parse_rejects_short_frame() {
        assert!(matches!(
            Frame::parse(b"1:42:alice"),
            Err(AppError::MalformedProtocol(_))
        ));
        assert!(matches!(
            Frame::parse(b"1:x:alice:host:32:hi"),
            Err(AppError::MalformedProtocol(_))
        ));
    }
}
