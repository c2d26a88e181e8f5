//! The serialize call into the reusable buffer.

use crate::buffer::SerialBuffer;
use crate::error::Result;
use crate::loader::module::SerializeFn;
use crate::snapshot::StateSnapshot;

/// Invoke the serialize entry point over `snapshot`, writing into the
/// reusable buffer, and return the number of bytes written.
///
/// The buffer's capacity is passed alongside its pointer; the native side
/// must truncate rather than write past it and report truncation with the
/// overflow sentinel, which [`SerialBuffer::record_write`] turns into
/// [`crate::error::BridgeError::BufferOverflow`]. A rejected write is not
/// published downstream.
pub fn call_serialize(
    serialize: SerializeFn,
    snapshot: &StateSnapshot,
    buffer: &mut SerialBuffer,
) -> Result<usize> {
    let capacity = buffer.capacity();

    // SAFETY: the snapshot is `#[repr(C)]` with the layout the ABI contract
    // fixes, borrowed for the duration of the call. The buffer's backing
    // storage is owned, stable, and at least `capacity` bytes; the callee
    // overwrites from the start and must not write past `capacity`. No
    // pointer survives this expression.
    let written = unsafe { serialize(snapshot, buffer.as_mut_ptr(), capacity) };

    buffer.record_write(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::loader::module::OVERFLOW_SENTINEL;

    /// Stand-in for a native serializer: writes a fixed marker that encodes
    /// the frame counter, truncating at capacity.
    unsafe extern "C" fn fixed_writer(
        snapshot: *const StateSnapshot,
        buf_ptr: *mut u8,
        buf_cap: usize,
    ) -> usize {
        let frame = (*snapshot).frame;
        let text = format!("frame={frame}");
        if text.len() > buf_cap {
            return OVERFLOW_SENTINEL;
        }
        std::ptr::copy_nonoverlapping(text.as_ptr(), buf_ptr, text.len());
        text.len()
    }

    #[test]
    fn test_serialize_records_written_length() {
        let snapshot = StateSnapshot {
            frame: 42,
            ..StateSnapshot::default()
        };
        let mut buffer = SerialBuffer::with_capacity(64);

        let written = call_serialize(fixed_writer, &snapshot, &mut buffer).expect("fits");
        assert_eq!(written, 8);
        assert_eq!(buffer.contents_str().expect("utf8"), "frame=42");
    }

    #[test]
    fn test_serialize_overflow_sentinel_maps_to_error() {
        let snapshot = StateSnapshot {
            frame: 123_456_789,
            ..StateSnapshot::default()
        };
        let mut buffer = SerialBuffer::with_capacity(4);

        let result = call_serialize(fixed_writer, &snapshot, &mut buffer);
        assert!(matches!(result, Err(BridgeError::BufferOverflow { .. })));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn test_serialize_overwrites_in_place() {
        let mut buffer = SerialBuffer::with_capacity(64);
        let before = buffer.as_mut_ptr();

        for frame in 0..100 {
            let snapshot = StateSnapshot {
                frame,
                ..StateSnapshot::default()
            };
            call_serialize(fixed_writer, &snapshot, &mut buffer).expect("fits");
        }

        assert_eq!(buffer.contents_str().expect("utf8"), "frame=99");
        assert_eq!(before, buffer.as_mut_ptr());
    }
}
