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

extern crate config as _;

use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AppError, AppResult};
use crate::protocol::IPMSG_DEFAULT_PORT;

pub const DEFAULT_SETTLE_DELAY_MS: u64 = 2500;
pub const ENV_PREFIX: &str = "IPMSG";

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SenderConfig {
    /// display name shown by the receiving client, empty means `jenkins-ci`
    pub user_name: String,
}

/// How the sending socket picks its local port.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BindMode {
    /// let the OS pick a free port for every send
    #[default]
    Ephemeral,
    /// bind the protocol port itself, sends are serialized to avoid bind conflicts
    WellKnown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NetworkConfig {
    pub port: u16,
    pub broadcast_addr: Ipv4Addr,
    pub bind_mode: BindMode,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            port: IPMSG_DEFAULT_PORT,
            broadcast_addr: Ipv4Addr::BROADCAST,
            bind_mode: BindMode::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    /// wait between the presence probe and the first unicast send
    pub settle_delay_ms: u64,
    /// recipients that are notified on every run, in addition to the command line ones
    pub recipients: Vec<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        NotifyConfig {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            recipients: Vec::new(),
        }
    }
}

impl NotifyConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// directory for a daily rolling log file; stdout only when unset
    pub dir: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotifierConfig {
    pub sender: SenderConfig,
    pub network: NetworkConfig,
    pub notify: NotifyConfig,
    pub log: LogConfig,
}

impl NotifierConfig {
    /// Loads the config file at `path` (missing file is fine) and applies
    /// `IPMSG__SECTION__KEY` environment overrides on top of it.
    pub fn set_up_config<P: AsRef<Path>>(path: P) -> AppResult<NotifierConfig> {
        let path_str = path
            .as_ref()
            .to_str()
            .ok_or(AppError::InvalidValue(format!(
                "config file path: {}",
                path.as_ref().to_string_lossy()
            )))?;
        let config = config::Config::builder()
            .add_source(config::File::with_name(path_str).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("notify.recipients")
                    .try_parsing(true),
            )
            .build()?;

        let notifier_config: NotifierConfig = config.try_deserialize()?;
        notifier_config.validate()?;
        Ok(notifier_config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.network.port == 0 {
            return Err(AppError::InvalidValue(
                "network.port must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> AppResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
