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

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::{AppError, AppResult};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Maps the `-v` count of the command line to the default level;
/// `RUST_LOG` still wins when it is set.
pub fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber. With `log_dir` set the output also goes
/// to a daily rolling file; keep the returned guard alive until exit so the
/// file writer gets flushed.
pub fn setup_local_tracing(verbose: u8, log_dir: Option<&str>) -> AppResult<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level(verbose).into())
        .from_env_lossy();
    let timer = ChronoLocal::new(TIME_FORMAT.to_string());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "ipmsg-notify.log");
            let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);
            // write to stderr and the file at the same time
            let writer = non_blocking.and(std::io::stderr);
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_target(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(fmt_layer)
                .with(filter)
                .try_init()
                .map_err(|e| AppError::IllegalStateError(format!("tracing init: {e}")))?;
            Ok(Some(worker_guard))
        }
        None => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_timer(timer)
                .with_target(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(fmt_layer)
                .with(filter)
                .try_init()
                .map_err(|e| AppError::IllegalStateError(format!("tracing init: {e}")))?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, LevelFilter::WARN)]
    #[case(1, LevelFilter::INFO)]
    #[case(2, LevelFilter::DEBUG)]
    #[case(3, LevelFilter::TRACE)]
    #[case(9, LevelFilter::TRACE)]
    fn test_verbosity_level(#[case] verbose: u8, #[case] expected: LevelFilter) {
        assert_eq!(verbosity_level(verbose), expected);
    }
}
