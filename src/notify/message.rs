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

/// Result of the build a notification is about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildStatus {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Unstable => "UNSTABLE",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::NotBuilt => "NOT_BUILT",
            BuildStatus::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// Prefixes `body` with the `BUILD <STATUS>` line receivers show first.
pub fn status_message(status: Option<BuildStatus>, body: &str) -> String {
    match status {
        Some(status) => format!("BUILD {}\n{}", status, body),
        None => format!("BUILD STATUS UNKNOWN\n{}", body),
    }
}
