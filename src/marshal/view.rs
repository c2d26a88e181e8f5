//! Borrowed (pointer, length) views over caller-owned memory.

/// A non-owning view of caller memory exposed to a native call.
///
/// The lifetime ties the view to its backing slice, so the address and
/// length are guaranteed stable for as long as the view exists. The native
/// callee must treat the memory as read-only; the view hands out only
/// `*const` pointers.
#[derive(Debug, Clone, Copy)]
pub struct InputView<'a> {
    data: &'a [u8],
}

impl<'a> InputView<'a> {
    /// View over a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// View over a string's UTF-8 bytes, for identifier inputs
    pub fn from_str(text: &'a str) -> Self {
        Self {
            data: text.as_bytes(),
        }
    }

    /// Raw pointer for the native call; valid only while the view lives
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_exposes_backing_slice() {
        let data = [1u8, 2, 3];
        let view = InputView::new(&data);
        assert_eq!(view.as_ptr(), data.as_ptr());
        assert_eq!(view.len(), 3);
        assert!(!view.is_empty());
    }

    #[test]
    fn test_str_view_uses_utf8_length() {
        let view = InputView::from_str("abcé");
        assert_eq!(view.len(), 5);
    }
}
