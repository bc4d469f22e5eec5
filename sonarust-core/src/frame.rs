//! Frame structure and encoding/decoding
//!
//! # Frame Structure
//!
//! ```text
//! ┌──────┬──────┬──────┬────────┬────────┬───────┬───────┬────────┬──────────┐
//! │ Sync │ Cmd  │ Len  │ AddrHi │ AddrLo │ Data0 │ Data1 │ Status │ Checksum │
//! │ 1 B  │ 1 B  │ 1 B  │  1 B   │  1 B   │  1 B  │  1 B  │  1 B   │   1 B    │
//! └──────┴──────┴──────┴────────┴────────┴───────┴───────┴────────┴──────────┘
//! ```
//!
//! Multi-byte fields (address, data) are big-endian. The length byte is the
//! constant marker 0x09 in every observed frame; it is written on encode
//! and never parsed as a payload length. The checksum is the XOR fold of
//! bytes 0..=7.

use bytes::{Buf, BufMut, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::Command,
    error::{Error, Result},
};

/// One protocol frame
///
/// # Examples
///
/// ```
/// use sonarust_core::{Command, Frame};
///
/// let query = Frame::request(Command::ReadDistance, 0xFFFF, &[]);
/// let encoded = query.encode();
/// assert_eq!(&encoded[..], &[0x62, 0x33, 0x09, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x58]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Command this frame carries (fixes the sync/code byte pair)
    pub command: Command,

    /// Module address (0xFFFF = broadcast/unaddressed)
    pub address: u16,

    /// Data field, bytes 5..=6 (big-endian value for 16-bit quantities)
    pub data: [u8; 2],

    /// Status byte (byte 7); zero on requests, acknowledgement sentinel or
    /// value-bearing on responses
    pub status: u8,
}

impl Frame {
    /// Fixed frame size in bytes
    pub const SIZE: usize = 9;

    /// Constant length-marker byte (byte 2 of every frame)
    pub const LEN_MARKER: u8 = 0x09;

    /// Status sentinel a module returns when it accepted a configuration
    /// command
    pub const ACK: u8 = 0x66;

    /// Build a request frame
    ///
    /// `payload` fills the data bytes in order and may hold at most two
    /// bytes; the rest stay zero, as does the status byte.
    pub fn request(command: Command, address: u16, payload: &[u8]) -> Self {
        assert!(payload.len() <= 2, "request payload is at most two bytes");

        let mut data = [0u8; 2];
        data[..payload.len()].copy_from_slice(payload);

        Self {
            command,
            address,
            data,
            status: 0,
        }
    }

    /// Encode to the 9-byte wire form, checksum appended
    ///
    /// Pure and infallible: every field combination encodes.
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::SIZE);

        buf.put_u8(self.command.sync());
        buf.put_u8(self.command.code());
        buf.put_u8(Self::LEN_MARKER);
        buf.put_u16(self.address);
        buf.put_slice(&self.data);
        buf.put_u8(self.status);
        buf.put_u8(checksum::calculate(&buf));

        buf
    }

    /// Decode a frame, validating it against the command a response is
    /// awaited for
    ///
    /// # Errors
    ///
    /// - [`Error::FrameTooShort`] if fewer than 9 bytes are given
    /// - [`Error::UnexpectedSync`] / [`Error::UnexpectedCommand`] if the
    ///   leading byte pair does not match `expected`
    /// - [`Error::ChecksumMismatch`] if the trailing byte is not the XOR
    ///   fold of the first eight
    ///
    /// # Examples
    ///
    /// ```
    /// use sonarust_core::{Command, Frame};
    ///
    /// let original = Frame::request(Command::SetLed, 0x0001, &[0x01]);
    /// let decoded = Frame::decode(&original.encode(), Command::SetLed).unwrap();
    /// assert_eq!(original, decoded);
    /// ```
    pub fn decode(buf: &[u8], expected: Command) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::FrameTooShort {
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }

        let frame = &buf[..Self::SIZE];
        let (expected_sync, expected_code) = expected.pair();

        if frame[0] != expected_sync {
            return Err(Error::UnexpectedSync {
                expected: expected_sync,
                actual: frame[0],
            });
        }

        if frame[1] != expected_code {
            return Err(Error::UnexpectedCommand {
                expected: expected_code,
                actual: frame[1],
            });
        }

        if !checksum::verify(frame) {
            return Err(Error::ChecksumMismatch {
                expected: checksum::calculate(&frame[..Self::SIZE - 1]),
                received: frame[Self::SIZE - 1],
            });
        }

        // Skip sync, command, and the constant length marker
        let mut fields = &frame[3..];
        let address = fields.get_u16();
        let data = [fields.get_u8(), fields.get_u8()];
        let status = fields.get_u8();

        Ok(Self {
            command: expected,
            address,
            data,
            status,
        })
    }

    /// The data field as a big-endian 16-bit value (raw distance in
    /// millimeters on distance-bearing frames)
    pub fn value(&self) -> u16 {
        u16::from_be_bytes(self.data)
    }

    /// Check if the module acknowledged a configuration command
    pub fn is_ack(&self) -> bool {
        self.status == Self::ACK
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &self.command)
            .field("address", &format!("0x{:04X}", self.address))
            .field("value", &self.value())
            .field("status", &format!("0x{:02X}", self.status))
            .field("raw", &hex::encode(self.encode()))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame[{}](addr=0x{:04X}, value={}, status=0x{:02X})",
            self.command,
            self.address,
            self.value(),
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_broadcast_distance_query_bytes() {
        let frame = Frame::request(Command::ReadDistance, 0xFFFF, &[]);
        let encoded = frame.encode();

        assert_eq!(
            &encoded[..],
            &[0x62, 0x33, 0x09, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x58]
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let original = Frame::request(Command::SetUploadInterval, 0x0012, &[0x05]);
        let decoded = Frame::decode(&original.encode(), Command::SetUploadInterval).unwrap();

        assert_eq!(original, decoded);
        assert_eq!(decoded.address, 0x0012);
        assert_eq!(decoded.data, [0x05, 0x00]);
        assert_eq!(decoded.status, 0x00);
    }

    #[test]
    fn test_decode_reads_big_endian_fields() {
        // Hand-built distance response: addr 0x1234, distance 0x0457 = 1111 mm
        let mut raw = vec![0x62, 0x33, 0x09, 0x12, 0x34, 0x04, 0x57, 0x00];
        raw.push(checksum::calculate(&raw));

        let frame = Frame::decode(&raw, Command::ReadDistance).unwrap();
        assert_eq!(frame.address, 0x1234);
        assert_eq!(frame.value(), 1111);
    }

    #[test]
    fn test_decode_rejects_wrong_sync() {
        let mut raw = Frame::request(Command::ReadDistance, 0xFFFF, &[]).encode();
        raw[0] = 0x61;

        let result = Frame::decode(&raw, Command::ReadDistance);
        assert!(matches!(
            result,
            Err(Error::UnexpectedSync {
                expected: 0x62,
                actual: 0x61
            })
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_command() {
        let raw = Frame::request(Command::SetLed, 0x0001, &[0x01]).encode();

        let result = Frame::decode(&raw, Command::SetRelay);
        assert!(matches!(
            result,
            Err(Error::UnexpectedCommand {
                expected: 0x38,
                actual: 0x37
            })
        ));
    }

    #[test]
    fn test_decode_rejects_corrupted_checksum() {
        let mut raw = Frame::request(Command::ReadDistance, 0xFFFF, &[]).encode();
        raw[8] ^= 0xFF;

        let result = Frame::decode(&raw, Command::ReadDistance);
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_decode_too_short() {
        let result = Frame::decode(&[0x62, 0x33, 0x09], Command::ReadDistance);
        assert!(matches!(
            result,
            Err(Error::FrameTooShort {
                expected: 9,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_comm_mode_variant_a_uses_alternate_sync() {
        let frame = Frame::request(Command::SetCommModeA, 0xFFFF, &[0x01]);
        let encoded = frame.encode();

        assert_eq!(encoded[0], 0x61);
        assert_eq!(encoded[1], 0x30);
        assert!(Frame::decode(&encoded, Command::SetCommModeA).is_ok());
        // The same bytes are not a valid baud-rate response: code matches
        // but the sync byte differs
        assert!(matches!(
            Frame::decode(&encoded, Command::SetBaudRate),
            Err(Error::UnexpectedSync { .. })
        ));
    }

    #[test]
    fn test_ack_sentinel() {
        let mut raw = vec![0x62, 0x34, 0x09, 0x00, 0x01, 0x01, 0x00, 0x66];
        raw.push(checksum::calculate(&raw));

        let frame = Frame::decode(&raw, Command::SetUploadMode).unwrap();
        assert!(frame.is_ack());

        let request = Frame::request(Command::SetUploadMode, 0x0001, &[0x01]);
        assert!(!request.is_ack());
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            address in any::<u16>(),
            data in proptest::array::uniform2(any::<u8>()),
        ) {
            let original = Frame {
                command: Command::ReadDistance,
                address,
                data,
                status: 0,
            };

            let decoded = Frame::decode(&original.encode(), Command::ReadDistance).unwrap();
            prop_assert_eq!(original, decoded);
        }

        #[test]
        fn prop_any_single_bit_flip_is_rejected(
            address in any::<u16>(),
            data in proptest::array::uniform2(any::<u8>()),
            byte_idx in 0usize..8,
            bit in 0u8..8,
        ) {
            let frame = Frame {
                command: Command::ReadDistance,
                address,
                data,
                status: 0,
            };

            let mut raw = frame.encode();
            raw[byte_idx] ^= 1 << bit;

            // A flip in the sync/command bytes surfaces as a mismatched
            // pair, anywhere else as a checksum failure; never a clean
            // decode
            prop_assert!(Frame::decode(&raw, Command::ReadDistance).is_err());
        }
    }
}
