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

/// A recipient the message could not be handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientFailure {
    pub host: String,
    pub error: String,
}

/// What happened during one notification. Failures end up here and in the
/// log, never as an error of the notification itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyReport {
    pub probe_error: Option<String>,
    pub delivered: Vec<String>,
    pub failed: Vec<RecipientFailure>,
    /// recipients never attempted because the notification was interrupted
    pub skipped: Vec<String>,
    pub interrupted: bool,
}

impl NotifyReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.probe_error.is_none() && self.failed.is_empty() && !self.interrupted
    }
}

impl fmt::Display for NotifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "delivered {}, failed {}, skipped {}",
            self.delivered.len(),
            self.failed.len(),
            self.skipped.len()
        )?;
        if self.probe_error.is_some() {
            f.write_str(", probe failed")?;
        }
        if self.interrupted {
            f.write_str(", interrupted")?;
        }
        Ok(())
    }
}
