use std::net::Ipv4Addr;
use std::time::Duration;

use ipmsg_notify::service::BindMode;
use ipmsg_notify::{
    AppResult, Command, Frame, Identity, Notifier, NotifierConfig, Shutdown, UdpSender,
};
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tokio::time::{timeout, Instant};

async fn recv_frame(socket: &UdpSocket) -> AppResult<Frame> {
    let mut buf = vec![0u8; 64 * 1024];
    let (len, _) = timeout(Duration::from_secs(5), socket.recv_from(&mut buf))
        .await
        .expect("no datagram received")?;
    Frame::parse(&buf[..len])
}

/// A config pointing both the probe and the messages at a loopback receiver.
fn loopback_config(port: u16, settle_delay_ms: u64) -> NotifierConfig {
    let mut config = NotifierConfig::default();
    config.network.port = port;
    config.network.broadcast_addr = Ipv4Addr::LOCALHOST;
    config.notify.settle_delay_ms = settle_delay_ms;
    config
}

#[tokio::test]
async fn test_notify_over_loopback() -> AppResult<()> {
    let receiver = UdpSocket::bind("127.0.0.1:0").await?;
    let config = loopback_config(receiver.local_addr()?.port(), 200);

    let (notify_shutdown, _) = broadcast::channel::<()>(1);
    let mut shutdown = Shutdown::new(notify_shutdown.subscribe());
    let notifier = Notifier::new(
        UdpSender::new(&config.network),
        Identity::new(Some("alice"), "ci-node-1"),
        &config,
    );

    let body = "BUILD FAILURE\nsee console: http://ci:8080/job/42/";
    let started = Instant::now();
    let report = notifier
        .notify_all(body, &["127.0.0.1", "bad.invalid", "localhost"], &mut shutdown)
        .await;
    assert!(started.elapsed() >= Duration::from_millis(200));

    assert_eq!(report.delivered, vec!["127.0.0.1", "localhost"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].host, "bad.invalid");

    let probe = recv_frame(&receiver).await?;
    assert_eq!(probe.command, Command::NoOperation);
    assert_eq!(probe.body, None);
    assert_eq!(probe.sender_user, "alice");
    assert_eq!(probe.sender_host, "ci-node-1");

    for _ in 0..2 {
        let message = recv_frame(&receiver).await?;
        assert_eq!(message.command, Command::SendMsg);
        assert_eq!(message.body.as_deref(), Some(body));
        assert!(message.serial >= 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_japanese_message_reaches_receiver_as_ms932() -> AppResult<()> {
    let receiver = UdpSocket::bind("127.0.0.1:0").await?;
    let config = loopback_config(receiver.local_addr()?.port(), 0);

    let notifier = Notifier::new(
        UdpSender::new(&config.network),
        Identity::new(None, "build01"),
        &config,
    );
    notifier.send_message("BUILD SUCCESS\nビルド成功", "127.0.0.1").await?;

    let mut buf = [0u8; 1024];
    let (len, _) = receiver.recv_from(&mut buf).await?;
    let raw = &buf[..len];
    assert!(raw.ends_with(&[0x83, 0x72, 0x83, 0x8B, 0x83, 0x68, 0x90, 0xAC, 0x8C, 0xF7]));

    let frame = Frame::parse(raw)?;
    assert_eq!(frame.sender_user, "jenkins-ci");
    assert_eq!(frame.body.as_deref(), Some("BUILD SUCCESS\nビルド成功"));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_notifications_share_well_known_port() -> AppResult<()> {
    let receiver = UdpSocket::bind("127.0.0.1:0").await?;
    let port = receiver.local_addr()?.port();
    // sender and receiver can't both own the same port on one host,
    // so the senders bind a separate free port
    let bind_port = {
        let probe = std::net::UdpSocket::bind("0.0.0.0:0")?;
        probe.local_addr()?.port()
    };
    let mut config = loopback_config(port, 0);
    config.network.bind_mode = BindMode::WellKnown;

    let sender = UdpSender::new(&ipmsg_notify::service::NetworkConfig {
        port: bind_port,
        ..config.network.clone()
    });
    let first = Notifier::new(sender.clone(), Identity::new(Some("a"), "h"), &config);
    let second = Notifier::new(sender, Identity::new(Some("b"), "h"), &config);

    let (r1, r2) = tokio::join!(
        first.send_message("one", "127.0.0.1"),
        second.send_message("two", "127.0.0.1")
    );
    r1?;
    r2?;
    Ok(())
}
