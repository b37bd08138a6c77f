use crate::{decode, Decoded, DecodeError, Header, Packed};
use core::ops::Range;

/// A fully encoded log statement, ready to be handed to a sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub(crate) format: String,
    pub(crate) placeholders: Vec<Range<usize>>,
    pub(crate) packed: Packed,
}

impl Message {
    /// The rewritten format string. Privacy annotations are removed, `%%` is
    /// collapsed to `%`, and specifiers whose precision or width is carried
    /// by a `count` command use `*` in its place.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Byte ranges of each specifier in the rewritten format, in the order
    /// their commands appear in the buffer.
    pub fn placeholders(&self) -> &[Range<usize>] {
        &self.placeholders
    }

    /// The header followed by the encoded commands.
    pub fn buffer(&self) -> &[u8] {
        self.packed.buffer()
    }

    pub fn len(&self) -> usize {
        self.packed.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packed.buffer().is_empty()
    }

    pub fn header(&self) -> Header {
        self.packed.header()
    }

    /// Returns true if any argument was dropped because the buffer size or
    /// command ceiling was reached. The buffer is still a valid stream.
    pub fn is_truncated(&self) -> bool {
        self.packed.is_truncated()
    }

    /// Decode the command buffer.
    pub fn decode(&self) -> Result<Decoded<'_>, DecodeError> {
        decode(self.buffer())
    }
}
