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


use bytes::Bytes;
use encoding_rs::SHIFT_JIS;

use crate::{AppError, AppResult};

/// Encodes `text` as MS932 (Windows-31J), the code page IP Messenger clients
/// decode with. Characters outside the code page fail the whole frame
/// instead of being replaced.
pub fn encode_ms932(text: &str) -> AppResult<Bytes> {
    let (encoded, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors {
        let offending = text
            .chars()
            .find(|c| SHIFT_JIS.encode(c.encode_utf8(&mut [0; 4])).2)
            .map(|c| format!("{:?} (U+{:04X})", c, c as u32))
            .unwrap_or_default();
        return Err(AppError::Encoding(format!(
            "unmappable character {}",
            offending
        )));
    }
    Ok(Bytes::from(encoded.into_owned()))
}

pub fn decode_ms932(bytes: &[u8]) -> AppResult<String> {
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| AppError::MalformedProtocol("datagram is not valid MS932".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_is_unchanged() -> AppResult<()> {
        let bytes = encode_ms932("BUILD SUCCESS\nall green")?;
        assert_eq!(&bytes[..], b"BUILD SUCCESS\nall green");
        Ok(())
    }

    #[test]
    fn test_japanese_text() -> AppResult<()> {
        // "ビルド成功" in MS932
        let bytes = encode_ms932("ビルド成功")?;
        assert_eq!(
            &bytes[..],
            &[0x83, 0x72, 0x83, 0x8B, 0x83, 0x68, 0x90, 0xAC, 0x8C, 0xF7]
        );
        assert_eq!(decode_ms932(&bytes)?, "ビルド成功");
        Ok(())
    }

    #[test]
    fn test_unmappable_character() {
        let result = encode_ms932("deploy done 🚀");
        match result {
            Err(AppError::Encoding(msg)) => assert!(msg.contains("U+1F680")),
            other => panic!("expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_bytes() {
        assert!(decode_ms932(&[0x82]).is_err());
    }
}
