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

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// general errors
    #[error("illegal state: {0}")]
    IllegalStateError(String),

    #[error("malformed protocol : {0}")]
    MalformedProtocol(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("config file error: {0}")]
    ConfigFileError(#[from] config::ConfigError),

    #[error("config serialize error: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),

    /// notification errors, all of them are logged and never escalated
    #[error("can't get hostname of this machine: {0}")]
    HostResolution(String),

    #[error("message can't be encoded as MS932, change the message: {0}")]
    Encoding(String),

    #[error("socket error: {0}")]
    Socket(String),

    #[error("unknown host: {0}")]
    AddressResolution(String),

    #[error("transmission error: {0}")]
    Transmission(String),

    #[error("interrupted: {0}")]
    Interrupted(String),
}
