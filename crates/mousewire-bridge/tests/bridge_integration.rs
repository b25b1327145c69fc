//! End-to-end integration tests for the bridge: real UDP datagrams in, real
//! device records in a backing file out.
//!
//! These use an ephemeral loopback socket as the datagram source and a temp
//! file standing in for the HID device, then run the full session loop in a
//! background task.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mousewire_bridge::application::session::{BridgeSession, SessionConfig};
use mousewire_bridge::infrastructure::{device::HidDevice, network::UdpDatagramSource};
use mousewire_core::protocol::{encode_absolute, encode_relative};
use mousewire_core::{AbsoluteReport, ProtocolMode, RelativeReport, ScreenBounds};
use tokio::net::UdpSocket;
use tokio::time::{sleep, timeout};

fn temp_device_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mousewire_e2e_{}_{}", std::process::id(), tag))
}

/// Polls the backing file until it holds at least `expected` bytes.
async fn wait_for_bytes(path: &Path, expected: usize) -> Vec<u8> {
    timeout(Duration::from_secs(5), async {
        loop {
            if let Ok(bytes) = std::fs::read(path) {
                if bytes.len() >= expected {
                    return bytes;
                }
            }
            sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("device file did not reach the expected size in time")
}

#[tokio::test]
async fn test_absolute_datagrams_become_device_records() {
    // Arrange
    let device_path = temp_device_path("absolute");
    std::fs::write(&device_path, b"").expect("create backing file");

    let source = UdpDatagramSource::bind("127.0.0.1", 0)
        .await
        .expect("bind source");
    let target = source.local_addr().expect("local addr");
    let sink = HidDevice::open(&device_path).await.expect("open device");

    let session = BridgeSession::new(
        SessionConfig {
            mode: ProtocolMode::Absolute,
            bounds: ScreenBounds { max_x: 4, max_y: 3 },
            max_step: 1,
            max_senders: 8,
        },
        source,
        sink,
    );
    let session_task = tokio::spawn(session.run());

    // The homing walk from bounds (4, 3) to the origin is 4 records.
    let after_homing = wait_for_bytes(&device_path, 12).await;
    assert_eq!(
        after_homing,
        vec![
            0x00, 0xFF, 0xFF, //
            0x00, 0xFF, 0xFF, //
            0x00, 0xFF, 0xFF, //
            0x00, 0xFF, 0x00,
        ]
    );

    // Act - one in-order absolute report targeting (2, 1) with a press
    let client = UdpSocket::bind("127.0.0.1:0").await.expect("client bind");
    let datagram = encode_absolute(&AbsoluteReport {
        seq: 1,
        x: 2,
        y: 1,
        buttons: 1,
    });
    client.send_to(&datagram, target).await.expect("send");

    // Assert - two zipped unit records follow the homing walk
    let bytes = wait_for_bytes(&device_path, 18).await;
    assert_eq!(&bytes[12..], &[0x01, 0x01, 0x01, 0x01, 0x01, 0x00]);

    session_task.abort();
    std::fs::remove_file(&device_path).ok();
}

#[tokio::test]
async fn test_relative_datagrams_pass_straight_through() {
    // Arrange
    let device_path = temp_device_path("relative");
    std::fs::write(&device_path, b"").expect("create backing file");

    let source = UdpDatagramSource::bind("127.0.0.1", 0)
        .await
        .expect("bind source");
    let target = source.local_addr().expect("local addr");
    let sink = HidDevice::open(&device_path).await.expect("open device");

    let session = BridgeSession::new(
        SessionConfig {
            mode: ProtocolMode::Relative,
            bounds: ScreenBounds {
                max_x: 1920,
                max_y: 1080,
            },
            max_step: 1,
            max_senders: 8,
        },
        source,
        sink,
    );
    let session_task = tokio::spawn(session.run());

    // Act - two in-order steps
    let client = UdpSocket::bind("127.0.0.1:0").await.expect("client bind");
    for (seq, dx, dy) in [(1u16, -1i8, 2i8), (2, 1, -2)] {
        let datagram = encode_relative(&RelativeReport {
            seq,
            buttons: 0,
            dx,
            dy,
        });
        client.send_to(&datagram, target).await.expect("send");
    }

    // Assert - no homing walk in relative mode, just the two records
    let bytes = wait_for_bytes(&device_path, 6).await;
    assert_eq!(bytes, vec![0x00, 0xFF, 0x02, 0x00, 0x01, 0xFE]);

    session_task.abort();
    std::fs::remove_file(&device_path).ok();
}

#[tokio::test]
async fn test_stale_datagram_produces_no_records() {
    // Arrange
    let device_path = temp_device_path("stale");
    std::fs::write(&device_path, b"").expect("create backing file");

    let source = UdpDatagramSource::bind("127.0.0.1", 0)
        .await
        .expect("bind source");
    let target = source.local_addr().expect("local addr");
    let sink = HidDevice::open(&device_path).await.expect("open device");

    let session = BridgeSession::new(
        SessionConfig {
            mode: ProtocolMode::Relative,
            bounds: ScreenBounds {
                max_x: 1920,
                max_y: 1080,
            },
            max_step: 1,
            max_senders: 8,
        },
        source,
        sink,
    );
    let session_task = tokio::spawn(session.run());

    let client = UdpSocket::bind("127.0.0.1:0").await.expect("client bind");

    // Act - sequence 0 is stale against the fresh baseline; sequence 1 is
    // applied and proves the stale one was skipped rather than queued.  The
    // stale report carries a distinctive step so it cannot be mistaken for
    // the applied one.
    for (seq, dx) in [(0u16, 9i8), (1, 1)] {
        let datagram = encode_relative(&RelativeReport {
            seq,
            buttons: 0,
            dx,
            dy: 1,
        });
        client.send_to(&datagram, target).await.expect("send");
    }

    // Assert - exactly one record, from the in-order report
    let bytes = wait_for_bytes(&device_path, 3).await;
    assert_eq!(bytes, vec![0x00, 0x01, 0x01]);

    session_task.abort();
    std::fs::remove_file(&device_path).ok();
}
