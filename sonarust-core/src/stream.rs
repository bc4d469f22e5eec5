//! Byte-stream resynchronization for auto-upload mode
//!
//! In auto-upload mode the module pushes distance frames unsolicited, so
//! frames arrive on a continuous, self-clocking byte stream with nothing
//! bracketing them. The decoder keeps a window over the buffered stream and
//! attempts one decode per poll against its first nine bytes. On a
//! mismatch it discards exactly one byte, so a frame boundary offset by a
//! small shift is found again within at most one frame length, and a single
//! corrupted or dropped byte can never desynchronize the stream for good.

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::{command::Command, frame::Frame};
use sonarust_types::DistanceSample;

/// Incremental decoder over the auto-upload byte stream
///
/// Feed it raw bytes as they arrive with [`extend`](Self::extend), then call
/// [`try_decode`](Self::try_decode) once per poll.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: BytesMut,
    discarded: u64,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes drained from the transport
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes currently buffered
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes dropped during resynchronization since creation
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Drop all buffered bytes (e.g. after leaving auto-upload mode)
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// One decode attempt against the front of the buffer
    ///
    /// Returns a sample when the first nine buffered bytes form a valid
    /// distance frame, consuming them. On a mismatch exactly one byte is
    /// discarded and `None` is returned; the shifted window is retried on
    /// the next poll. With fewer than nine bytes buffered this is a no-op.
    pub fn try_decode(&mut self) -> Option<DistanceSample> {
        if self.buf.len() < Frame::SIZE {
            return None;
        }

        match Frame::decode(&self.buf[..Frame::SIZE], Command::ReadDistance) {
            Ok(frame) => {
                self.buf.advance(Frame::SIZE);

                let sample = DistanceSample::new(frame.address, frame.value());
                trace!(%sample, "Decoded streamed frame");

                Some(sample)
            }
            Err(err) => {
                self.buf.advance(1);
                self.discarded += 1;

                trace!(
                    error = %err,
                    discarded = self.discarded,
                    "Stream out of alignment, dropped one byte"
                );

                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn distance_frame(address: u16, distance_mm: u16) -> BytesMut {
        Frame {
            command: Command::ReadDistance,
            address,
            data: distance_mm.to_be_bytes(),
            status: 0,
        }
        .encode()
    }

    #[test]
    fn test_decodes_clean_stream() {
        let mut decoder = StreamDecoder::new();
        decoder.extend(&distance_frame(0x0001, 250));
        decoder.extend(&distance_frame(0x0001, 251));

        assert_eq!(
            decoder.try_decode(),
            Some(DistanceSample::new(0x0001, 250))
        );
        assert_eq!(
            decoder.try_decode(),
            Some(DistanceSample::new(0x0001, 251))
        );
        assert_eq!(decoder.try_decode(), None);
        assert_eq!(decoder.discarded(), 0);
    }

    #[test]
    fn test_partial_frame_is_left_buffered() {
        let mut decoder = StreamDecoder::new();
        let frame = distance_frame(0x0001, 500);

        decoder.extend(&frame[..5]);
        assert_eq!(decoder.try_decode(), None);
        assert_eq!(decoder.buffered(), 5);

        decoder.extend(&frame[5..]);
        assert_eq!(
            decoder.try_decode(),
            Some(DistanceSample::new(0x0001, 500))
        );
    }

    #[test]
    fn test_one_byte_discard_per_poll() {
        let mut decoder = StreamDecoder::new();

        // Three garbage bytes ahead of a valid frame
        decoder.extend(&[0x00, 0x11, 0x22]);
        decoder.extend(&distance_frame(0x0001, 777));

        assert_eq!(decoder.try_decode(), None);
        assert_eq!(decoder.try_decode(), None);
        assert_eq!(decoder.try_decode(), None);
        assert_eq!(decoder.discarded(), 3);

        assert_eq!(
            decoder.try_decode(),
            Some(DistanceSample::new(0x0001, 777))
        );
    }

    #[test]
    fn test_corrupted_frame_recovery_is_bounded() {
        let mut decoder = StreamDecoder::new();

        let mut corrupted = distance_frame(0x0001, 100);
        corrupted[8] ^= 0xFF;

        decoder.extend(&distance_frame(0x0001, 99));
        decoder.extend(&corrupted);
        decoder.extend(&distance_frame(0x0001, 101));

        // The intact leading frame decodes first
        assert_eq!(decoder.try_decode(), Some(DistanceSample::new(0x0001, 99)));

        // The corrupted frame costs at most one frame length of single-byte
        // discards before lock is regained
        let mut polls = 0;
        let recovered = loop {
            polls += 1;
            assert!(polls <= Frame::SIZE + 1, "recovery must be bounded");
            if let Some(sample) = decoder.try_decode() {
                break sample;
            }
        };

        assert_eq!(recovered, DistanceSample::new(0x0001, 101));
        assert_eq!(decoder.discarded(), Frame::SIZE as u64);
    }

    #[test]
    fn test_dropped_byte_mid_frame_recovers_on_next_frame() {
        let mut decoder = StreamDecoder::new();

        // Simulate a lost byte: frame arrives without its third byte
        let mut truncated = distance_frame(0x0001, 400).to_vec();
        truncated.remove(2);

        decoder.extend(&truncated);
        decoder.extend(&distance_frame(0x0001, 401));

        let mut samples = Vec::new();
        for _ in 0..32 {
            if let Some(sample) = decoder.try_decode() {
                samples.push(sample);
            }
        }

        assert_eq!(samples, vec![DistanceSample::new(0x0001, 401)]);
        assert_eq!(decoder.discarded(), truncated.len() as u64);
    }

    #[test]
    fn test_clear_drops_pending_bytes() {
        let mut decoder = StreamDecoder::new();
        decoder.extend(&distance_frame(0x0001, 123));
        decoder.clear();

        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.try_decode(), None);
    }
}
