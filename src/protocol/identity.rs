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


use tracing::warn;

use crate::{AppError, AppResult};

/// User name shown by the receiver when none is configured.
pub const DEFAULT_USER_NAME: &str = "jenkins-ci";

/// Who a frame claims to come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_name: String,
    from_host: String,
}

impl Identity {
    /// An empty or missing `user_name` falls back to [`DEFAULT_USER_NAME`].
    pub fn new(user_name: Option<&str>, from_host: impl Into<String>) -> Self {
        let user_name = match user_name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_USER_NAME.to_string(),
        };
        Identity {
            user_name,
            from_host: from_host.into(),
        }
    }

    /// Builds the identity of this machine. A failed hostname lookup is
    /// logged and leaves the host field empty.
    pub fn local(user_name: Option<&str>) -> Self {
        let from_host = match local_hostname() {
            Ok(host) => host,
            Err(e) => {
                warn!("{}", e);
                String::new()
            }
        };
        Identity::new(user_name, from_host)
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn from_host(&self) -> &str {
        &self.from_host
    }
}

pub fn local_hostname() -> AppResult<String> {
    let host = hostname::get().map_err(|e| AppError::HostResolution(e.to_string()))?;
    host.into_string().map_err(|raw| {
        AppError::HostResolution(format!("hostname {:?} is not valid unicode", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn test_user_name_fallback(#[case] user_name: Option<&str>) {
        let identity = Identity::new(user_name, "build01");
        assert_eq!(identity.user_name(), "jenkins-ci");
        assert_eq!(identity.from_host(), "build01");
    }

    #[test]
    fn test_configured_user_name() {
        let identity = Identity::new(Some("alice"), "ci-node-1");
        assert_eq!(identity.user_name(), "alice");
        assert_eq!(identity.from_host(), "ci-node-1");
    }

    #[test]
    fn test_empty_host_is_tolerated() {
        let identity = Identity::new(Some("alice"), "");
        assert_eq!(identity.from_host(), "");
    }

    #[test]
    fn test_local_identity() {
        let identity = Identity::local(None);
        assert_eq!(identity.user_name(), DEFAULT_USER_NAME);
    }
}
