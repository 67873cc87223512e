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


use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use ipmsg_notify::notify::normalize_recipient;
use ipmsg_notify::{
    parse_recipients, setup_local_tracing, status_message, AppError, AppResult, BuildStatus,
    Frame, Identity, Notifier, NotifierConfig, Shutdown, UdpSender,
};
use tokio::runtime;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(version, about)]
pub struct CommandLine {
    /// path to config file
    #[arg(short, long)]
    pub conf: Option<String>,
    #[command(subcommand)]
    pub command: Command,
    /// log level (v: info, vv: debug, vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Send a build notification
    Send(SendArgs),
    /// Print the effective configuration as TOML
    PrintConfig,
    /// Decode a captured datagram given as hex
    Decode { hex: String },
}

#[derive(Args)]
pub struct SendArgs {
    /// build result, the status line reads "STATUS UNKNOWN" without it
    #[arg(short, long, value_enum)]
    pub status: Option<BuildStatus>,
    /// message text below the status line
    #[arg(short, long, default_value = "")]
    pub message: String,
    /// recipient host or IP, may be repeated
    #[arg(short, long = "to")]
    pub to: Vec<String>,
    /// newline separated recipient list
    #[arg(short, long)]
    pub recipients: Option<String>,
    /// sender user name, overrides sender.user_name of the config file
    #[arg(short, long)]
    pub user: Option<String>,
}

fn main() -> ExitCode {
    dotenv().ok();

    let commandline = CommandLine::parse();
    match run(commandline) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ipmsg-notify: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(commandline: CommandLine) -> AppResult<()> {
    let config_path = commandline.conf.as_ref().map_or_else(
        || {
            let mut path = PathBuf::from("./");
            path.push("ipmsg.toml");
            path
        },
        PathBuf::from,
    );
    let config = NotifierConfig::set_up_config(config_path)?;
    let _log_guard = setup_local_tracing(commandline.verbose, config.log.dir.as_deref())?;

    match commandline.command {
        Command::PrintConfig => print!("{}", config.to_toml()?),
        Command::Decode { hex } => {
            let frame = Frame::parse(&decode_hex(&hex)?)?;
            println!("{:#?}", frame);
        }
        Command::Send(args) => {
            let rt = runtime::Builder::new_current_thread().enable_all().build()?;
            rt.block_on(send(config, args));
        }
    }
    Ok(())
}

/// Notification failures only show up in the log and the summary, the
/// process still exits successfully so the calling build is not failed.
async fn send(config: NotifierConfig, args: SendArgs) {
    let user_name = args
        .user
        .clone()
        .unwrap_or_else(|| config.sender.user_name.clone());
    let identity = Identity::local(Some(&user_name));

    let mut recipients: Vec<String> = args.to.iter().filter_map(|h| normalize_recipient(h)).collect();
    if let Some(list) = &args.recipients {
        recipients.extend(parse_recipients(list));
    }
    recipients.extend(
        config
            .notify
            .recipients
            .iter()
            .filter_map(|h| normalize_recipient(h)),
    );
    if recipients.is_empty() {
        warn!("no recipients given, only the presence probe is sent");
    }

    let body = status_message(args.status, &args.message);

    let (notify_shutdown, _) = broadcast::channel::<()>(1);
    let mut shutdown = Shutdown::new(notify_shutdown.subscribe());
    let ctrl_c_shutdown = notify_shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, abandoning notification");
            let _ = ctrl_c_shutdown.send(());
        }
    });

    info!(
        "notifying {} recipient(s) as {}@{}",
        recipients.len(),
        identity.user_name(),
        identity.from_host()
    );
    let notifier = Notifier::new(UdpSender::new(&config.network), identity, &config);
    let report = notifier.notify_all(&body, &recipients, &mut shutdown).await;

    for failure in &report.failed {
        error!("{}: {}", failure.host, failure.error);
    }
    println!("{}", report);
}

fn decode_hex(hex: &str) -> AppResult<Vec<u8>> {
    let digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(AppError::InvalidValue(format!(
            "hex input has odd length {}",
            digits.len()
        )));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16)
                .map_err(|_| AppError::InvalidValue(format!("not a hex byte: {}", byte)))
        })
        .collect()
}
