//! Binary codec for MouseWire datagrams.
//!
//! Wire formats (all multi-byte integers little-endian):
//! ```text
//! absolute (7 bytes): [seq:u16][x:i16][y:i16][buttons:i8]
//! relative (5 bytes): [seq:u16][buttons:i8][dx:i8][dy:i8]
//! ```
//! Datagrams are fixed-size, so the only decode failure is a length that
//! does not match the configured variant. There is no header or version
//! byte: the variant is a deployment-time agreement between sender and
//! bridge, not something negotiated per packet.

use thiserror::Error;

use crate::protocol::messages::{
    AbsoluteReport, PointerReport, ProtocolMode, RelativeReport, ABSOLUTE_REPORT_LEN,
    RELATIVE_REPORT_LEN,
};

/// Errors that can occur while decoding a datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The datagram length does not match the configured variant's layout.
    #[error("{mode} reports are {expected} bytes, got {actual}")]
    LengthMismatch {
        mode: ProtocolMode,
        expected: usize,
        actual: usize,
    },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one datagram according to the configured wire variant.
///
/// # Errors
///
/// Returns [`DecodeError::LengthMismatch`] if `bytes` is not exactly the
/// fixed size of the variant's layout. Oversized datagrams are rejected,
/// not truncated.
pub fn decode_report(mode: ProtocolMode, bytes: &[u8]) -> Result<PointerReport, DecodeError> {
    match mode {
        ProtocolMode::Absolute => decode_absolute(bytes).map(PointerReport::Absolute),
        ProtocolMode::Relative => decode_relative(bytes).map(PointerReport::Relative),
    }
}

/// Decodes a 7-byte absolute-mode datagram.
///
/// # Errors
///
/// Returns [`DecodeError::LengthMismatch`] unless `bytes.len()` is exactly
/// [`ABSOLUTE_REPORT_LEN`].
pub fn decode_absolute(bytes: &[u8]) -> Result<AbsoluteReport, DecodeError> {
    if bytes.len() != ABSOLUTE_REPORT_LEN {
        return Err(DecodeError::LengthMismatch {
            mode: ProtocolMode::Absolute,
            expected: ABSOLUTE_REPORT_LEN,
            actual: bytes.len(),
        });
    }
    Ok(AbsoluteReport {
        seq: u16::from_le_bytes([bytes[0], bytes[1]]),
        x: i16::from_le_bytes([bytes[2], bytes[3]]),
        y: i16::from_le_bytes([bytes[4], bytes[5]]),
        buttons: bytes[6] as i8,
    })
}

/// Decodes a 5-byte relative-mode datagram.
///
/// # Errors
///
/// Returns [`DecodeError::LengthMismatch`] unless `bytes.len()` is exactly
/// [`RELATIVE_REPORT_LEN`].
pub fn decode_relative(bytes: &[u8]) -> Result<RelativeReport, DecodeError> {
    if bytes.len() != RELATIVE_REPORT_LEN {
        return Err(DecodeError::LengthMismatch {
            mode: ProtocolMode::Relative,
            expected: RELATIVE_REPORT_LEN,
            actual: bytes.len(),
        });
    }
    Ok(RelativeReport {
        seq: u16::from_le_bytes([bytes[0], bytes[1]]),
        buttons: bytes[2] as i8,
        dx: bytes[3] as i8,
        dy: bytes[4] as i8,
    })
}

/// Encodes an absolute report into its 7-byte wire layout.
pub fn encode_absolute(report: &AbsoluteReport) -> [u8; ABSOLUTE_REPORT_LEN] {
    let seq = report.seq.to_le_bytes();
    let x = report.x.to_le_bytes();
    let y = report.y.to_le_bytes();
    [seq[0], seq[1], x[0], x[1], y[0], y[1], report.buttons as u8]
}

/// Encodes a relative report into its 5-byte wire layout.
pub fn encode_relative(report: &RelativeReport) -> [u8; RELATIVE_REPORT_LEN] {
    let seq = report.seq.to_le_bytes();
    [
        seq[0],
        seq[1],
        report.buttons as u8,
        report.dx as u8,
        report.dy as u8,
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_report_round_trip() {
        // Arrange
        let report = AbsoluteReport {
            seq: 0x0201,
            x: 1234,
            y: -56,
            buttons: 1,
        };

        // Act
        let bytes = encode_absolute(&report);
        let decoded = decode_absolute(&bytes).expect("decode must succeed");

        // Assert
        assert_eq!(decoded, report);
    }

    #[test]
    fn test_absolute_wire_layout_is_little_endian() {
        // Arrange
        let report = AbsoluteReport {
            seq: 0x0102,
            x: 0x0304,
            y: -1,
            buttons: -2,
        };

        // Act
        let bytes = encode_absolute(&report);

        // Assert - low byte first for each field, signed bytes as two's complement
        assert_eq!(bytes, [0x02, 0x01, 0x04, 0x03, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn test_relative_report_round_trip() {
        let report = RelativeReport {
            seq: 65534,
            buttons: 0,
            dx: -1,
            dy: 1,
        };
        let decoded = decode_relative(&encode_relative(&report)).expect("decode must succeed");
        assert_eq!(decoded, report);
    }

    #[test]
    fn test_decode_report_dispatches_on_mode() {
        let abs = AbsoluteReport {
            seq: 1,
            x: 10,
            y: 20,
            buttons: 0,
        };
        let decoded = decode_report(ProtocolMode::Absolute, &encode_absolute(&abs))
            .expect("decode must succeed");
        assert_eq!(decoded, PointerReport::Absolute(abs));
    }

    #[test]
    fn test_decode_absolute_rejects_short_datagram() {
        let result = decode_absolute(&[0u8; 6]);
        assert_eq!(
            result,
            Err(DecodeError::LengthMismatch {
                mode: ProtocolMode::Absolute,
                expected: 7,
                actual: 6,
            })
        );
    }

    #[test]
    fn test_decode_absolute_rejects_oversized_datagram() {
        // An 8-byte datagram must not be silently truncated to 7.
        let result = decode_absolute(&[0u8; 8]);
        assert!(matches!(result, Err(DecodeError::LengthMismatch { .. })));
    }

    #[test]
    fn test_decode_relative_rejects_absolute_sized_datagram() {
        // A 7-byte absolute datagram arriving at a relative-mode bridge is
        // a misconfiguration and must be dropped, not reinterpreted.
        let result = decode_relative(&[0u8; 7]);
        assert_eq!(
            result,
            Err(DecodeError::LengthMismatch {
                mode: ProtocolMode::Relative,
                expected: 5,
                actual: 7,
            })
        );
    }

    #[test]
    fn test_decode_empty_datagram_fails() {
        assert!(decode_report(ProtocolMode::Absolute, &[]).is_err());
        assert!(decode_report(ProtocolMode::Relative, &[]).is_err());
    }

    #[test]
    fn test_negative_coordinates_survive_round_trip() {
        let report = AbsoluteReport {
            seq: 3,
            x: -100,
            y: -200,
            buttons: 0,
        };
        let decoded = decode_absolute(&encode_absolute(&report)).expect("decode must succeed");
        assert_eq!(decoded.x, -100);
        assert_eq!(decoded.y, -200);
    }
}
