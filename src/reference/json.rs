//! # In-Place JSON Writer
//!
//! Serializes a [`StateSnapshot`] straight into the reusable buffer with no
//! heap allocation, matching `serde_json`'s compact output byte for byte
//! (same field order, no whitespace). The first-call diagnostic relies on
//! that equality to validate the native serializer against `serde_json`.
//!
//! On overflow the writer truncates and the write is reported through the
//! same sentinel path the native module uses, so downstream handling is
//! identical for both serializers.

use crate::buffer::SerialBuffer;
use crate::error::Result;
use crate::loader::module::OVERFLOW_SENTINEL;
use crate::snapshot::StateSnapshot;

/// Serialize `snapshot` into `buffer` and return the number of bytes
/// written, or [`crate::error::BridgeError::BufferOverflow`] if the output
/// does not fit.
pub fn write_snapshot(snapshot: &StateSnapshot, buffer: &mut SerialBuffer) -> Result<usize> {
    let written = {
        let mut writer = JsonWriter::new(buffer.storage_mut());
        writer.raw(b"{");
        writer.field_u64(b"\"frame\":", snapshot.frame);
        writer.raw(b",");
        writer.field_u64(b"\"session_ms\":", snapshot.session_ms);
        writer.raw(b",");
        writer.field_u64(b"\"player_count\":", u64::from(snapshot.player_count));
        writer.raw(b",");
        writer.field_u64(b"\"ping_ms\":", u64::from(snapshot.ping_ms));
        writer.raw(b",");
        writer.field_u64(b"\"health_pct\":", u64::from(snapshot.health_pct));
        writer.raw(b",");
        writer.field_u64(b"\"stamina_pct\":", u64::from(snapshot.stamina_pct));
        writer.raw(b",");
        writer.field_bool(b"\"menu_open\":", snapshot.menu_open);
        writer.raw(b",");
        writer.field_bool(b"\"muted\":", snapshot.muted);
        writer.raw(b"}");
        writer.finish()
    };
    buffer.record_write(written)
}

/// Cursor over a fixed byte slice; truncates on overflow instead of growing.
struct JsonWriter<'a> {
    out: &'a mut [u8],
    pos: usize,
    overflowed: bool,
}

impl<'a> JsonWriter<'a> {
    fn new(out: &'a mut [u8]) -> Self {
        Self {
            out,
            pos: 0,
            overflowed: false,
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        if self.overflowed {
            return;
        }
        if self.pos + bytes.len() > self.out.len() {
            self.overflowed = true;
            return;
        }
        self.out[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn field_u64(&mut self, key: &[u8], value: u64) {
        self.raw(key);
        // Digits are built back to front in a stack buffer; u64::MAX is 20
        // digits.
        let mut digits = [0u8; 20];
        let mut len = 0;
        let mut rest = value;
        loop {
            digits[digits.len() - 1 - len] = b'0' + (rest % 10) as u8;
            len += 1;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        let start = digits.len() - len;
        self.raw(&digits[start..]);
    }

    fn field_bool(&mut self, key: &[u8], value: bool) {
        self.raw(key);
        self.raw(if value { &b"true"[..] } else { &b"false"[..] });
    }

    fn finish(self) -> usize {
        if self.overflowed {
            OVERFLOW_SENTINEL
        } else {
            self.pos
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matches_serde_json_output() {
        let snapshot = StateSnapshot {
            frame: 18_446_744_073_709_551_615,
            session_ms: 0,
            player_count: 12,
            ping_ms: 250,
            health_pct: 100,
            stamina_pct: 7,
            menu_open: false,
            muted: true,
        };
        let mut buffer = SerialBuffer::with_capacity(16 * 1024);

        let written = write_snapshot(&snapshot, &mut buffer).expect("fits");
        let expected = serde_json::to_string(&snapshot).expect("serde_json");

        assert_eq!(buffer.contents_str().expect("utf8"), expected);
        assert_eq!(written, expected.len());
    }

    #[test]
    fn test_matches_serde_json_for_default() {
        let snapshot = StateSnapshot::default();
        let mut buffer = SerialBuffer::with_capacity(16 * 1024);
        write_snapshot(&snapshot, &mut buffer).expect("fits");
        assert_eq!(
            buffer.contents_str().expect("utf8"),
            serde_json::to_string(&snapshot).expect("serde_json")
        );
    }

    #[test]
    fn test_overflow_truncates_without_corruption() {
        let snapshot = StateSnapshot::default();
        let mut buffer = SerialBuffer::with_capacity(10);

        let result = write_snapshot(&snapshot, &mut buffer);
        assert!(matches!(result, Err(BridgeError::BufferOverflow { .. })));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_rewrites_in_place() {
        let mut buffer = SerialBuffer::with_capacity(16 * 1024);
        let before = {
            let first = StateSnapshot {
                frame: 1,
                ..StateSnapshot::default()
            };
            write_snapshot(&first, &mut buffer).expect("fits");
            buffer.contents().as_ptr()
        };

        let second = StateSnapshot {
            frame: 2,
            ..StateSnapshot::default()
        };
        write_snapshot(&second, &mut buffer).expect("fits");
        assert_eq!(before, buffer.contents().as_ptr());
        assert!(buffer.contents_str().expect("utf8").contains("\"frame\":2"));
    }
}
