//! # Payload Descramble
//!
//! The host's payload transform, kept as the reference path. Payloads are
//! stored as a scrambled concatenation of the ciphertext body and a
//! detached key fragment; the identifier seeds the segment permutation.
//!
//! Steps:
//! - Seed the segment generator with the CRC-32 (ISO-HDLC) of the
//!   identifier, with segment lengths clamped around 1-2% of the total size
//!   (floor 1000).
//! - Split the `ciphertext ++ key_fragment` range into variable-length
//!   segments.
//! - Permute every segment except the first, which holds the container
//!   header and must stay put.
//! - Copy the input sequentially into the permuted segment positions.
//!
//! The output length is always exactly `ciphertext.len() +
//! key_fragment.len()`, and the transform is deterministic for identical
//! inputs.

use crc::Crc;
use std::ops::Range;

const CRC32: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// Typical upper bound on segment count; capacity hint only
const SEGMENT_HINT: usize = 100;

/// Smallest allowed segment span in bytes
const MIN_SEGMENT_SPAN: u32 = 1000;

/// CRC-32 (ISO-HDLC) of the identifier bytes; the permutation seed
pub fn identifier_checksum(identifier: &[u8]) -> u32 {
    CRC32.checksum(identifier)
}

/// Multiplicative congruential generator producing segment lengths.
///
/// The recurrence and constants are part of the payload format: the same
/// sequence must come out of every implementation, native or reference.
pub(crate) struct SegmentRng {
    state: i64,
    seed: i64,
    span: i64,
}

impl SegmentRng {
    pub(crate) fn new(seed: u32, total_size: usize) -> Self {
        Self {
            state: 0x3f_ff_ff_ef_ff_ff_ff,
            seed: i64::from(seed),
            span: i64::from(((total_size / 100) as u32).max(MIN_SEGMENT_SPAN)),
        }
    }

    /// Next segment length, in `1..2 * span`
    pub(crate) fn next(&mut self) -> usize {
        // Signed remainder is intentional: a negative intermediate yields a
        // value below `span`, and that asymmetry is baked into the format.
        self.state = (self
            .state
            .wrapping_mul(self.seed)
            .wrapping_add(self.state)
            % self.span)
            .wrapping_add(self.span);
        self.state as usize
    }
}

/// Reassemble a scrambled `(ciphertext, key_fragment)` pair into `output`.
///
/// `output.len()` must equal `ciphertext.len() + key_fragment.len()`.
pub fn descramble(identifier: &[u8], ciphertext: &[u8], key_fragment: &[u8], output: &mut [u8]) {
    let total_size = ciphertext.len() + key_fragment.len();
    debug_assert_eq!(output.len(), total_size);

    let mut rng = SegmentRng::new(identifier_checksum(identifier), total_size);

    // Segment the combined range.
    let mut segments: Vec<Range<usize>> = Vec::with_capacity(SEGMENT_HINT);
    let mut offset = 0;
    while offset < total_size {
        let end = (offset + rng.next()).min(total_size);
        segments.push(offset..end);
        offset = end;
    }

    // Permute everything after the first segment (container header).
    let count = segments.len();
    for i in 1..count {
        let j = rng.next() % (count - 1) + 1;
        segments.swap(i, j);
    }

    // Sequential read across ciphertext then fragment, written at each
    // segment's permuted position.
    let mut cursor = 0;
    for segment in &segments {
        for slot in &mut output[segment.clone()] {
            *slot = if cursor < ciphertext.len() {
                ciphertext[cursor]
            } else {
                key_fragment[cursor - ciphertext.len()]
            };
            cursor += 1;
        }
    }
}
