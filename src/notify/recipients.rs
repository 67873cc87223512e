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


/// Splits a newline separated recipient list. Whitespace anywhere inside an
/// entry is removed and blank lines are dropped; order and duplicates are
/// kept as given.
pub fn parse_recipients(input: &str) -> Vec<String> {
    input.lines().filter_map(normalize_recipient).collect()
}

/// Strips all whitespace from a single host entry, `None` when nothing is left.
pub fn normalize_recipient(entry: &str) -> Option<String> {
    let host: String = entry.chars().filter(|c| !c.is_whitespace()).collect();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recipients() {
        let input = " 10.0.0.5 \r\nbuild-mon\n\n  \n10.0.0.5\n dev box ";
        assert_eq!(
            parse_recipients(input),
            vec!["10.0.0.5", "build-mon", "10.0.0.5", "devbox"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients("\n \t\n").is_empty());
    }

    #[test]
    fn test_normalize_recipient() {
        assert_eq!(normalize_recipient("\tci-node-1 "), Some("ci-node-1".to_string()));
        assert_eq!(normalize_recipient("   "), None);
    }
}
