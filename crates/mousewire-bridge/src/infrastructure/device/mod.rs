//! HID device sink.
//!
//! # What is a HID device file? (for beginners)
//!
//! On Linux, a USB gadget or uinput mouse shows up as a writable device
//! file (for example `/dev/hidg0`). The kernel interprets every fixed-size
//! write to it as one discrete pointer event, so a 3-byte record of
//! `(buttons, dx, dy)` written to the file moves the pointer by one step.
//! Two consequences drive this module:
//!
//! - Writes must not be buffered. Coalescing two records into one write
//!   would merge two events; each record is flushed before the next.
//! - Write order is event order. The sink is handed records one at a time
//!   by the single session task and writes them in call order.

use std::path::Path;

use async_trait::async_trait;
use mousewire_core::DeviceRecord;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::application::session::{DeviceWriteError, RecordSink};

/// [`RecordSink`] implementation over an opened HID device file.
pub struct HidDevice {
    file: File,
}

impl HidDevice {
    /// Opens the device file for writing.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceWriteError::Open`] if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DeviceWriteError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .await
            .map_err(|source| DeviceWriteError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "opened HID device");
        Ok(Self { file })
    }
}

#[async_trait]
impl RecordSink for HidDevice {
    async fn write_record(&mut self, record: DeviceRecord) -> Result<(), DeviceWriteError> {
        self.file
            .write_all(&record.to_bytes())
            .await
            .map_err(DeviceWriteError::Write)?;
        // One flush per record: the device must see each write as its own
        // event.
        self.file.flush().await.map_err(DeviceWriteError::Write)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_device_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mousewire_dev_{}_{}", std::process::id(), tag))
    }

    #[tokio::test]
    async fn test_records_reach_the_file_in_order_and_layout() {
        // Arrange
        let path = temp_device_path("order");
        std::fs::write(&path, b"").expect("create backing file");
        let mut device = HidDevice::open(&path).await.expect("open must succeed");

        // Act
        device
            .write_record(DeviceRecord { buttons: 1, dx: -1, dy: 2 })
            .await
            .expect("write");
        device
            .write_record(DeviceRecord { buttons: 0, dx: 1, dy: -2 })
            .await
            .expect("write");

        // Assert - two 3-byte records, signed bytes as two's complement
        let bytes = std::fs::read(&path).expect("read back");
        assert_eq!(bytes, vec![0x01, 0xFF, 0x02, 0x00, 0x01, 0xFE]);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_open_missing_device_reports_the_path() {
        // Arrange
        let path = temp_device_path("missing");

        // Act
        let err = HidDevice::open(&path).await.err().expect("open must fail");

        // Assert
        match err {
            DeviceWriteError::Open { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Open error, got {other:?}"),
        }
    }
}
