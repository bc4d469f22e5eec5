//! Frame checksum algorithm
//!
//! Every frame carries an XOR fold of its first 8 bytes as its final byte.
//! XOR is self-inverse, so folding a complete well-formed 9-byte frame
//! (checksum included) yields zero.

use tracing::trace;

/// XOR-fold a byte slice
///
/// Callers pass the 8-byte frame prefix; the result is the frame's ninth
/// byte.
///
/// # Examples
///
/// ```
/// use sonarust_core::checksum;
///
/// let prefix = [0x62, 0x33, 0x09, 0xFF, 0xFF, 0x00, 0x00, 0x00];
/// assert_eq!(checksum::calculate(&prefix), 0x58);
/// ```
pub fn calculate(bytes: &[u8]) -> u8 {
    let checksum = bytes.iter().fold(0u8, |acc, &b| acc ^ b);

    trace!(
        len = bytes.len(),
        checksum = format!("0x{:02X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify a complete frame's trailing checksum byte
///
/// Returns `false` for an empty slice.
pub fn verify(frame: &[u8]) -> bool {
    match frame.split_last() {
        Some((&received, body)) => calculate(body) == received,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_checksum_broadcast_distance_query() {
        // sync ^ cmd ^ len ^ addrHi ^ addrLo over a broadcast distance query
        let prefix = [0x62, 0x33, 0x09, 0xFF, 0xFF, 0x00, 0x00, 0x00];
        assert_eq!(calculate(&prefix), 0x58);
    }

    #[test]
    fn test_checksum_empty() {
        assert_eq!(calculate(&[]), 0);
        assert!(!verify(&[]));
    }

    #[test]
    fn test_verify_accepts_appended_checksum() {
        let prefix = [0x62, 0x34, 0x09, 0x00, 0x01, 0x01, 0x00, 0x66];
        let mut frame = prefix.to_vec();
        frame.push(calculate(&prefix));
        assert!(verify(&frame));
    }

    #[test]
    fn test_verify_rejects_altered_checksum() {
        let prefix = [0x62, 0x34, 0x09, 0x00, 0x01, 0x01, 0x00, 0x66];
        let mut frame = prefix.to_vec();
        frame.push(calculate(&prefix) ^ 0x01);
        assert!(!verify(&frame));
    }

    proptest! {
        #[test]
        fn prop_fold_of_complete_frame_is_zero(prefix in proptest::array::uniform8(any::<u8>())) {
            let mut frame = prefix.to_vec();
            frame.push(calculate(&prefix));
            // Self-inverse: folding all nine bytes cancels out
            prop_assert_eq!(calculate(&frame), 0);
            prop_assert!(verify(&frame));
        }

        #[test]
        fn prop_single_bit_flip_is_detected(
            prefix in proptest::array::uniform8(any::<u8>()),
            byte_idx in 0usize..8,
            bit in 0u8..8,
        ) {
            let mut frame = prefix.to_vec();
            frame.push(calculate(&prefix));
            frame[byte_idx] ^= 1 << bit;
            prop_assert!(!verify(&frame));
        }
    }
}
